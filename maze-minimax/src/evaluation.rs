//! The default static evaluation used at the leaves of the minimax tree

use maze_game_types::types::{
    AdversaryIDGettableGame, AdversaryId, Agent, PelletGettableGame, ScoreGettableGame,
    ShortestPathGame, TerminationDeterminableGame, ThreatGettableGame,
};
use serde::Deserialize;
use tracing::debug;

use crate::paranoid::{Scorable, WrappedScore};

/// The reciprocal distance term can't divide by zero, so a hostile adversary sharing your cell
/// contributes as if it were a tenth of a step away
pub const TOUCHING_HOSTILE_RECIPROCAL: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
/// Weights of the linear evaluation
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use maze_minimax::evaluation::EvaluationWeights;
///
/// let defaults: EvaluationWeights = Default::default();
///
/// assert_eq!(defaults.score, 1.0);
/// assert_eq!(defaults.nearest_pellet, -1.5);
/// assert_eq!(defaults.nearest_hostile_reciprocal, -2.0);
/// assert_eq!(defaults.nearest_fleeing, -2.0);
/// assert_eq!(defaults.power_pellets_left, -20.0);
/// assert_eq!(defaults.pellets_left, -4.0);
/// ```
pub struct EvaluationWeights {
    /// Applied to the current game score
    pub score: f64,
    /// Applied to the walking distance to the nearest pellet
    pub nearest_pellet: f64,
    /// Applied to `1 / d` where `d` is the distance to the nearest hostile adversary
    pub nearest_hostile_reciprocal: f64,
    /// Applied to the distance to the nearest fleeing adversary
    pub nearest_fleeing: f64,
    /// Applied to the number of power pellets left
    pub power_pellets_left: f64,
    /// Applied to the number of regular pellets left
    pub pellets_left: f64,
}

impl Default for EvaluationWeights {
    fn default() -> Self {
        Self {
            score: 1.0,
            nearest_pellet: -1.5,
            nearest_hostile_reciprocal: -2.0,
            nearest_fleeing: -2.0,
            power_pellets_left: -20.0,
            pellets_left: -4.0,
        }
    }
}

impl EvaluationWeights {
    /// Score a maze, saturating to [WrappedScore::Lose] whenever you were just eaten, even with
    /// lives to spare, and to [WrappedScore::Win] once the maze is cleared
    pub fn evaluate<GameType>(&self, game: &GameType) -> WrappedScore<i64>
    where
        GameType: TerminationDeterminableGame
            + ScoreGettableGame
            + PelletGettableGame
            + ShortestPathGame
            + ThreatGettableGame
            + AdversaryIDGettableGame,
    {
        if game.was_you_eaten() {
            return WrappedScore::Lose;
        }

        if game.is_over() {
            return WrappedScore::Win;
        }

        WrappedScore::Scored(self.weighted_sum(game))
    }

    /// The linear combination of the game features, truncated towards zero
    ///
    /// Distances to sets that are empty or unreachable leave their term out entirely
    pub fn weighted_sum<GameType>(&self, game: &GameType) -> i64
    where
        GameType: ScoreGettableGame
            + PelletGettableGame
            + ShortestPathGame
            + ThreatGettableGame
            + AdversaryIDGettableGame,
    {
        let you = game.you_position();
        let nearest = |targets: Vec<GameType::NativePositionType>| {
            targets
                .iter()
                .filter_map(|target| game.shortest_path_distance(&you, target))
                .min()
        };

        let adversaries = game
            .adversary_ids()
            .into_iter()
            .filter(|id| game.lair_time(*id) == 0);
        let (fleeing, hostile): (Vec<_>, Vec<_>) = adversaries.partition(|id| game.is_fleeing(*id));
        let positions = |ids: Vec<AdversaryId>| -> Vec<GameType::NativePositionType> {
            ids.into_iter()
                .map(|id| game.position_of(Agent::Adversary(id)))
                .collect()
        };

        let mut total = self.score * game.current_score() as f64
            + self.power_pellets_left * game.power_pellet_count() as f64
            + self.pellets_left * game.pellet_count() as f64;

        match nearest(game.pellet_positions()) {
            Some(d) => total += self.nearest_pellet * d as f64,
            None => debug!("No reachable pellets, skipping the nearest pellet term"),
        }

        match nearest(positions(hostile)) {
            Some(d) => total += self.hostile_term(d),
            None => debug!("No hostile adversaries, skipping the hostile term"),
        }

        if let Some(d) = nearest(positions(fleeing)) {
            total += self.nearest_fleeing * d as f64;
        }

        total as i64
    }

    fn hostile_term(&self, distance: u32) -> f64 {
        let reciprocal = match distance {
            0 => TOUCHING_HOSTILE_RECIPROCAL,
            d => 1.0 / d as f64,
        };

        self.nearest_hostile_reciprocal * reciprocal
    }
}

impl<GameType> Scorable<GameType, i64> for EvaluationWeights
where
    GameType: ScoreGettableGame
        + PelletGettableGame
        + ShortestPathGame
        + ThreatGettableGame
        + AdversaryIDGettableGame,
{
    fn score(&self, game: &GameType) -> i64 {
        self.weighted_sum(game)
    }
}

#[cfg(test)]
mod test {
    use maze_game_types::{
        compact_representation::CompactMaze,
        types::{Move, SimulableGame},
        wire_representation::Game,
    };

    use super::*;

    fn maze_from(json: &str) -> CompactMaze {
        let game = serde_json::from_str::<Game>(json).unwrap();
        CompactMaze::convert_from_game(&game).unwrap()
    }

    #[test]
    fn test_weighted_sum() {
        // You are 1 step from a pellet and 2 steps from a hostile adversary
        let game = maze_from(r##"{ "board": { "layout": ["#P.1o#"], "score": 30 } }"##);

        let expected = 30.0 - 1.5 * 1.0 - 2.0 * (1.0 / 2.0) - 20.0 * 1.0 - 4.0 * 1.0;
        assert_eq!(
            EvaluationWeights::default().weighted_sum(&game),
            expected as i64
        );
    }

    #[test]
    fn test_touching_hostile_saturates() {
        let weights = EvaluationWeights::default();

        assert_eq!(weights.hostile_term(0), -2.0 * TOUCHING_HOSTILE_RECIPROCAL);
        assert_eq!(weights.hostile_term(4), -0.5);
    }

    #[test]
    fn test_lair_adversaries_are_not_threats() {
        let weights = EvaluationWeights {
            score: 0.0,
            nearest_pellet: 0.0,
            nearest_hostile_reciprocal: -2.0,
            nearest_fleeing: 0.0,
            power_pellets_left: 0.0,
            pellets_left: 0.0,
        };
        let mut game = maze_from(
            r##"{ "board": { "layout": ["#P 1.#"], "adversaries": [{ "lair_time": 1 }] } }"##,
        );

        assert_eq!(weights.weighted_sum(&game), 0);

        game.advance(Move::Neutral, &[(AdversaryId(0), Move::Left)]);
        assert_eq!(game.lair_time(AdversaryId(0)), 0);
        assert_eq!(weights.weighted_sum(&game), (-2.0f64 / 2.0) as i64);
    }

    #[test]
    fn test_fleeing_adversary_pulls_you_in() {
        let game = maze_from(
            r##"{ "board": { "layout": ["#P 1.#"], "adversaries": [{ "fleeing_time": 5 }] } }"##,
        );
        let weights = EvaluationWeights {
            nearest_pellet: 0.0,
            pellets_left: 0.0,
            ..Default::default()
        };

        assert_eq!(weights.weighted_sum(&game), -4);
    }

    #[test]
    fn test_terminal_saturation() {
        let weights = EvaluationWeights::default();

        let mut won = maze_from(r##"{ "board": { "layout": ["#P.#"] } }"##);
        won.advance(Move::Right, &[]);
        assert_eq!(weights.evaluate(&won), WrappedScore::Win);

        let mut lost = maze_from(r##"{ "board": { "layout": ["#P1..#"], "lives": 1 } }"##);
        lost.advance(Move::Right, &[]);
        assert_eq!(weights.evaluate(&lost), WrappedScore::Lose);

        let mut caught = maze_from(r##"{ "board": { "layout": ["#P1..#"], "lives": 3 } }"##);
        caught.advance(Move::Right, &[]);
        assert!(!caught.is_over());
        assert_eq!(weights.evaluate(&caught), WrappedScore::Lose);
    }

    #[test]
    fn test_empty_sets_contribute_nothing() {
        let weights = EvaluationWeights::default();
        let game = maze_from(r###"{ "board": { "layout": ["#P #", "#.##"] } }"###);

        // No adversaries at all and one pellet one step away
        assert_eq!(weights.weighted_sum(&game), (-1.5f64 - 4.0) as i64);
        assert!(matches!(weights.evaluate(&game), WrappedScore::Scored(_)));
    }
}
