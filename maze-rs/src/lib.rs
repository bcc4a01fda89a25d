use std::time::Instant;

use tracing::warn;

pub use anyhow::Result;
pub use maze_game_types::compact_representation::CompactMaze;
pub use maze_game_types::types::Move;
pub use maze_game_types::wire_representation::Game;

use maze_game_types::types::{Agent, MoveGeneratableGame};

pub mod corridor;
pub mod mcts_agent;
pub mod minimax_agent;
pub mod policy;

/// Anything that can pick a move for you once per tick
pub trait MazeAgent<T: MoveGeneratableGame> {
    fn name(&self) -> String;

    /// Pick a move, failing if the agent can't make sense of the maze
    fn make_move(&self, game: &T, deadline: Instant) -> Result<Move>;

    /// The move used when [MazeAgent::make_move] fails
    fn fallback_move(&self, game: &T) -> Move {
        game.possible_moves(Agent::You)
            .first()
            .copied()
            .unwrap_or(Move::Neutral)
    }

    /// Always produces a move. Errors are logged and replaced with [MazeAgent::fallback_move]
    fn decide(&self, game: &T, deadline: Instant) -> Move {
        match self.make_move(game, deadline) {
            Ok(m) => m,
            Err(e) => {
                let fallback = self.fallback_move(game);
                warn!(agent = %self.name(), error = %e, %fallback, "Falling back");

                fallback
            }
        }
    }
}

/// Parse a maze from its JSON wire representation
pub fn compact_maze_from_json(json: &str) -> Result<CompactMaze> {
    let game: Game = serde_json::from_str(json)?;

    Ok(CompactMaze::convert_from_game(&game)?)
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    struct Failing;

    impl MazeAgent<CompactMaze> for Failing {
        fn name(&self) -> String {
            "failing".to_owned()
        }

        fn make_move(&self, _game: &CompactMaze, _deadline: Instant) -> Result<Move> {
            anyhow::bail!("nope")
        }
    }

    #[test]
    fn test_decide_falls_back() {
        let fixture = include_str!("../fixtures/bent_corridor.json");
        let game = compact_maze_from_json(fixture).unwrap();

        let chosen = Failing.decide(&game, Instant::now() + Duration::from_millis(10));

        assert_eq!(chosen, Move::Right);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(compact_maze_from_json("{}").is_err());
        assert!(compact_maze_from_json(r#"{ "board": { "layout": [] } }"#).is_err());
    }
}
