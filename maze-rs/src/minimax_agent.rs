//! Picks moves with paranoid minimax over the linear [EvaluationWeights]

use std::{fmt::Debug, time::Instant};

use maze_game_types::types::{
    AdversaryIDGettableGame, Move, MoveGeneratableGame, PelletGettableGame, ScoreGettableGame,
    ShortestPathGame, SimulableGame, TerminationDeterminableGame, ThreatGettableGame,
};
use maze_minimax::{
    evaluation::EvaluationWeights,
    paranoid::{MinimaxAgent, MinimaxOptions},
};
use serde::Deserialize;

use crate::{MazeAgent, Result};

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct MinimaxMazeAgent {
    pub weights: EvaluationWeights,
    pub options: MinimaxOptions,
}

impl MinimaxMazeAgent {
    pub fn new(weights: EvaluationWeights, options: MinimaxOptions) -> Self {
        Self { weights, options }
    }
}

impl<T> MazeAgent<T> for MinimaxMazeAgent
where
    T: AdversaryIDGettableGame
        + MoveGeneratableGame
        + SimulableGame
        + TerminationDeterminableGame
        + ScoreGettableGame
        + PelletGettableGame
        + ShortestPathGame
        + ThreatGettableGame
        + Clone
        + Debug,
{
    fn name(&self) -> String {
        "minimax".to_owned()
    }

    /// The search always runs to the configured depth, the deadline isn't consulted
    fn make_move(&self, game: &T, _deadline: Instant) -> Result<Move> {
        let agent = MinimaxAgent::<T, i64, EvaluationWeights>::new(
            game.clone(),
            self.weights,
            "minimax",
            self.options,
        );

        Ok(agent.choose_move())
    }
}
