//! Cheap move providers used to play games forward during MCTS rollouts

use std::time::Instant;

use maze_game_types::types::{
    AdversaryIDGettableGame, AdversaryMoves, Agent, Move, RandomReasonableMovesGame,
    ShortestPathGame, ThreatGettableGame,
};
use rand::Rng;
use serde::Deserialize;

/// Picks a move for you
pub trait YouPolicy<T> {
    fn you_move<R: Rng + ?Sized>(&self, game: &T, deadline: Instant, rng: &mut R) -> Move;
}

/// Picks a move for every adversary at once
pub trait AdversaryPolicy<T> {
    fn adversary_moves<R: Rng + ?Sized>(
        &self,
        game: &T,
        deadline: Instant,
        rng: &mut R,
    ) -> AdversaryMoves;
}

/// Uniformly random legal moves for everyone
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReasonable;

impl<T: RandomReasonableMovesGame> YouPolicy<T> for RandomReasonable {
    fn you_move<R: Rng + ?Sized>(&self, game: &T, _deadline: Instant, rng: &mut R) -> Move {
        game.random_reasonable_move_for_you(rng)
    }
}

impl<T: RandomReasonableMovesGame> AdversaryPolicy<T> for RandomReasonable {
    fn adversary_moves<R: Rng + ?Sized>(
        &self,
        game: &T,
        _deadline: Instant,
        rng: &mut R,
    ) -> AdversaryMoves {
        game.random_reasonable_move_for_each_adversary(rng)
    }
}

/// Hostile adversaries usually chase you down the shortest path, fleeing ones run away
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Pursuers {
    /// Chance a hostile adversary chases instead of wandering randomly
    pub aggression: f64,
}

impl Default for Pursuers {
    fn default() -> Self {
        Self { aggression: 0.9 }
    }
}

impl<T> AdversaryPolicy<T> for Pursuers
where
    T: RandomReasonableMovesGame + AdversaryIDGettableGame + ThreatGettableGame + ShortestPathGame,
{
    fn adversary_moves<R: Rng + ?Sized>(
        &self,
        game: &T,
        _deadline: Instant,
        rng: &mut R,
    ) -> AdversaryMoves {
        let you = game.you_position();

        game.random_reasonable_move_for_each_adversary(rng)
            .into_iter()
            .map(|(id, random_move)| {
                let position = game.position_of(Agent::Adversary(id));

                let chosen = if game.lair_time(id) > 0 {
                    None
                } else if game.is_fleeing(id) {
                    game.next_move_away_from(&position, &you)
                } else if rng.gen_bool(self.aggression.clamp(0.0, 1.0)) {
                    game.next_move_towards(&position, &you)
                } else {
                    None
                };

                (id, chosen.unwrap_or(random_move))
            })
            .collect()
    }
}
