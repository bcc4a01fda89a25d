//! There are multiple multiplayer variations to minimax, this module is for the `paranoid`
//! variant.
//!
//! This variant assumes all the adversaries are working together to minimize your score. Each
//! ply you move first and then every adversary moves in turn, one at a time, while everyone else
//! stands still. The implementation can optionally use Alpha-Beta pruning to be efficient
//!
//! This variant works by always scoring nodes as 'yourself'.
//! When propagating scores up the tree, it chooses the highest score when its your turn
//! and the lowest score when its an adversary's turn.
//!
//! ```rust
//! use maze_minimax::{
//!     evaluation::EvaluationWeights,
//!     paranoid::{MinimaxAgent, MinimaxOptions, Pruning},
//! };
//! use maze_game_types::{compact_representation::CompactMaze, wire_representation::Game};
//!
//! // This fixture data is the JSON description of a small maze with two adversaries
//! let fixture = include_str!("../../../maze-rs/fixtures/small_maze.json");
//!
//! // First we parse the 'wire' representation of the maze
//! let wire_game: Game = serde_json::from_str(fixture).unwrap();
//!
//! // and then build the compact representation that the search simulates on
//! let compact_game = CompactMaze::convert_from_game(&wire_game).unwrap();
//!
//! let options = MinimaxOptions {
//!     depth: 1,
//!     pruning: Pruning::AlphaBeta,
//! };
//!
//! let minimax_agent = MinimaxAgent::new(
//!     compact_game,
//!     EvaluationWeights::default(),
//!     "minimax_agent",
//!     options,
//! );
//!
//! // Now we can use the minimax agent to pick the next move!
//! let (nodes_visited, result) = minimax_agent.single_minimax(options.depth);
//! assert!(nodes_visited > 0);
//! assert!(result.your_best_move().is_some());
//! ```

mod score;
pub use score::{Scorable, WrappedScorable, WrappedScore};

mod minimax_return;
pub use minimax_return::{MinMaxReturn, Turn};

mod eval;
pub use eval::{MinimaxAgent, MinimaxOptions, Pruning};
