//! The traits the search code is written against.
//!
//! Each trait covers one capability of a maze game so that search code only asks for what it
//! needs. [crate::compact_representation::CompactMaze] implements all of them.

use std::{fmt, hash::Hash};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A direction an agent can travel in. `Neutral` means "stay put / no preference"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    /// Towards row 0
    Up,
    /// Towards the last column
    Right,
    /// Towards the last row
    Down,
    /// Towards column 0
    Left,
    /// No movement
    Neutral,
}

impl Move {
    /// The four real directions, in the order moves are enumerated everywhere
    pub const fn all() -> [Move; 4] {
        [Move::Up, Move::Right, Move::Down, Move::Left]
    }

    /// The direction that undoes this one. `Neutral` is its own opposite
    pub fn opposite(&self) -> Move {
        match self {
            Move::Up => Move::Down,
            Move::Right => Move::Left,
            Move::Down => Move::Up,
            Move::Left => Move::Right,
            Move::Neutral => Move::Neutral,
        }
    }

    pub fn as_index(&self) -> usize {
        match self {
            Move::Up => 0,
            Move::Right => 1,
            Move::Down => 2,
            Move::Left => 3,
            Move::Neutral => 4,
        }
    }

    pub fn from_index(index: usize) -> Move {
        match index {
            0 => Move::Up,
            1 => Move::Right,
            2 => Move::Down,
            3 => Move::Left,
            _ => Move::Neutral,
        }
    }

    /// Row and column offsets for this move
    pub fn to_vector(&self) -> (i32, i32) {
        match self {
            Move::Up => (-1, 0),
            Move::Right => (0, 1),
            Move::Down => (1, 0),
            Move::Left => (0, -1),
            Move::Neutral => (0, 0),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Move::Up => "up",
            Move::Right => "right",
            Move::Down => "down",
            Move::Left => "left",
            Move::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// Identifies one of the pursuing agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AdversaryId(pub u8);

impl AdversaryId {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AdversaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adversary-{}", self.0)
    }
}

/// Any agent in the maze: the one we control, or one of the adversaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Agent {
    You,
    Adversary(AdversaryId),
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::You => write!(f, "you"),
            Agent::Adversary(id) => write!(f, "{}", id),
        }
    }
}

/// Moves for every adversary for a single tick. Adversaries that are missing move `Neutral`
pub type AdversaryMoves = Vec<(AdversaryId, Move)>;

pub trait PositionGettableGame {
    type NativePositionType: Copy + Eq + Hash + fmt::Debug;

    fn position_of(&self, agent: Agent) -> Self::NativePositionType;

    fn you_position(&self) -> Self::NativePositionType {
        self.position_of(Agent::You)
    }
}

pub trait AdversaryIDGettableGame {
    /// Ids of every adversary, in turn order
    fn adversary_ids(&self) -> Vec<AdversaryId>;

    /// Number of agents taking a turn each ply, including you
    fn agent_count(&self) -> usize {
        self.adversary_ids().len() + 1
    }
}

pub trait MoveGeneratableGame {
    /// Legal moves for the given agent from where it currently stands
    fn possible_moves(&self, agent: Agent) -> Vec<Move>;
}

pub trait SimulableGame {
    /// Advance the game a single tick, mutating it in place
    fn advance(&mut self, you_move: Move, adversary_moves: &[(AdversaryId, Move)]);
}

pub trait TerminationDeterminableGame {
    fn is_over(&self) -> bool;

    /// Were you caught during the most recent tick
    fn was_you_eaten(&self) -> bool;
}

pub trait LivesGettableGame {
    fn lives_remaining(&self) -> u8;
}

pub trait PelletGettableGame: PositionGettableGame {
    fn pellet_positions(&self) -> Vec<Self::NativePositionType>;
    fn power_pellet_positions(&self) -> Vec<Self::NativePositionType>;

    fn pellet_count(&self) -> usize {
        self.pellet_positions().len()
    }

    fn power_pellet_count(&self) -> usize {
        self.power_pellet_positions().len()
    }
}

pub trait ThreatGettableGame {
    /// Ticks left during which the adversary is fleeing and can be eaten
    fn fleeing_time(&self, id: AdversaryId) -> u32;

    /// Ticks left before the adversary leaves its lair
    fn lair_time(&self, id: AdversaryId) -> u32;

    fn is_fleeing(&self, id: AdversaryId) -> bool {
        self.fleeing_time(id) > 0
    }
}

pub trait LastMoveGettableGame {
    fn last_move(&self, agent: Agent) -> Move;
}

pub trait ScoreGettableGame {
    fn current_score(&self) -> i64;
}

pub trait JunctionQueryableGame: PositionGettableGame {
    fn is_junction(&self, pos: &Self::NativePositionType) -> bool;
}

pub trait ShortestPathGame: PositionGettableGame {
    /// Walking distance through the maze. `None` when `to` can't be reached
    fn shortest_path_distance(
        &self,
        from: &Self::NativePositionType,
        to: &Self::NativePositionType,
    ) -> Option<u32>;

    /// The first step of a shortest path from `from` to `to`
    fn next_move_towards(
        &self,
        from: &Self::NativePositionType,
        to: &Self::NativePositionType,
    ) -> Option<Move>;

    /// The step from `from` that ends furthest away from `to`
    fn next_move_away_from(
        &self,
        from: &Self::NativePositionType,
        to: &Self::NativePositionType,
    ) -> Option<Move>;
}

pub trait RandomReasonableMovesGame {
    fn random_reasonable_move_for_you<R: Rng + ?Sized>(&self, rng: &mut R) -> Move;

    fn random_reasonable_move_for_each_adversary<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> AdversaryMoves;
}
