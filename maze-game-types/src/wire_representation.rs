//! The JSON shape mazes are stored in on disk.
//!
//! The layout is a list of equally long rows:
//!
//! | char | meaning |
//! |------|---------|
//! | `#`  | wall |
//! | `.`  | pellet |
//! | `o`  | power pellet |
//! | ` `  | empty floor |
//! | `P`  | you, standing on empty floor |
//! | `1`-`9` | an adversary, standing on empty floor |

use serde::{Deserialize, Serialize};

use crate::types::Move;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Game {
    #[serde(default)]
    pub id: String,
    /// Milliseconds the controller gives us per decision
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    pub board: Board,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Board {
    pub layout: Vec<String>,
    #[serde(default = "default_lives")]
    pub lives: u8,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub you_last_move: Option<Move>,
    /// Extra state for adversaries, in the order of their digits in the layout
    #[serde(default)]
    pub adversaries: Vec<Adversary>,
    /// How long adversaries flee after a power pellet is eaten
    #[serde(default = "default_fleeing_duration")]
    pub fleeing_duration: u32,
    /// How long an eaten adversary waits before re-entering the maze
    #[serde(default = "default_lair_duration")]
    pub lair_duration: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Adversary {
    #[serde(default)]
    pub fleeing_time: u32,
    #[serde(default)]
    pub lair_time: u32,
    #[serde(default)]
    pub last_move: Option<Move>,
}

fn default_timeout() -> u64 {
    40
}

fn default_lives() -> u8 {
    3
}

fn default_fleeing_duration() -> u32 {
    40
}

fn default_lair_duration() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let game: Game = serde_json::from_str(r##"{ "board": { "layout": ["#P.#"] } }"##).unwrap();

        assert_eq!(game.timeout, 40);
        assert_eq!(game.board.lives, 3);
        assert_eq!(game.board.fleeing_duration, 40);
        assert!(game.board.adversaries.is_empty());
        assert_eq!(game.board.you_last_move, None);
    }

    #[test]
    fn test_adversary_state() {
        let game: Game = serde_json::from_str(
            r##"{
                "board": {
                    "layout": ["#P.1#"],
                    "you_last_move": "left",
                    "adversaries": [{ "fleeing_time": 7, "last_move": "up" }]
                }
            }"##,
        )
        .unwrap();

        assert_eq!(game.board.you_last_move, Some(Move::Left));
        assert_eq!(game.board.adversaries[0].fleeing_time, 7);
        assert_eq!(game.board.adversaries[0].lair_time, 0);
        assert_eq!(game.board.adversaries[0].last_move, Some(Move::Up));
    }
}
