use std::fmt::{self, Debug};

use maze_game_types::types::{AdversaryId, Agent, Move};
use text_trees::StringTreeNode;

use super::WrappedScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Whose move it is at a node of the game tree
pub enum Turn {
    /// You are moving, and pick the highest scoring option
    Maximizer,
    /// The given adversary is moving, and picks the lowest scoring option
    Adversary(AdversaryId),
}

impl Turn {
    /// Is this the maximizing player
    pub fn is_maximizer(&self) -> bool {
        matches!(self, Turn::Maximizer)
    }
}

impl From<Turn> for Agent {
    fn from(turn: Turn) -> Self {
        match turn {
            Turn::Maximizer => Agent::You,
            Turn::Adversary(id) => Agent::Adversary(id),
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Agent::from(*self))
    }
}

#[derive(Debug, Clone)]
/// This is returned from an iteration of the minimax algorithm
/// It contains all the information we generated about the game tree
pub enum MinMaxReturn<ScoreType: Clone + Debug + PartialOrd + Ord + Copy> {
    /// This is a non-leaf node in the game tree
    /// We have information about all the options we looked at as well as the chosen score
    Node {
        /// Who was moving at this node
        turn: Turn,
        /// A 'recursive' look at all the moves under us
        /// This array is sorted best first for whoever was moving, ties keep the order the moves
        /// were explored in. The first element is always the chosen move at this node
        options: Vec<(Move, Self)>,
        /// The chosen score
        /// This always matches the score of the first element in `options`
        score: WrappedScore<ScoreType>,
        /// Plies left to search below this node
        depth: usize,
        /// Whether alpha-beta pruning skipped some of the moves at this node
        alpha_beta_cutoff: bool,
    },
    /// Represents a leaf node in the game tree
    /// This happens when we reach a terminal state or when we reach the maximum depth
    Leaf {
        #[allow(missing_docs)]
        score: WrappedScore<ScoreType>,
    },
}

impl<ScoreType> MinMaxReturn<ScoreType>
where
    ScoreType: Clone + Debug + PartialOrd + Ord + Copy,
{
    /// Returns the score for this node
    pub fn score(&self) -> &WrappedScore<ScoreType> {
        match self {
            MinMaxReturn::Node { score, .. } => score,
            MinMaxReturn::Leaf { score } => score,
        }
    }

    /// Returns the direction you should move to maximize the score
    /// If we are a leaf node, this will return None
    ///
    /// We take advantage of the fact that the moves are sorted by score, so we can just return the
    /// first option where you are moving
    pub fn your_best_move(&self) -> Option<Move> {
        self.first_options_for_you()
            .and_then(|options| options.first().map(|x| x.0))
    }

    /// Return the first set of move options where you were moving
    pub fn first_options_for_you(&self) -> Option<&Vec<(Move, Self)>> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node { turn, options, .. } => {
                if turn.is_maximizer() {
                    Some(options)
                } else {
                    let chosen = options.first()?;
                    chosen.1.first_options_for_you()
                }
            }
        }
    }

    /// Check if the move you want to pick is certain elimination or not
    pub fn your_move_is_death(&self, potential_move: Move) -> bool {
        if let Some(options) = self.first_options_for_you() {
            matches!(
                options
                    .iter()
                    .find(|(move_, _)| *move_ == potential_move)
                    .map(|(_, r)| r.score()),
                Some(WrappedScore::Lose) | None,
            )
        } else {
            false
        }
    }

    /// Did pruning skip any options anywhere in this tree
    pub fn had_alpha_beta_cutoff(&self) -> bool {
        match self {
            MinMaxReturn::Leaf { .. } => false,
            MinMaxReturn::Node {
                options,
                alpha_beta_cutoff,
                ..
            } => *alpha_beta_cutoff || options.iter().any(|(_, r)| r.had_alpha_beta_cutoff()),
        }
    }

    /// Returns all the moves in the 'route' through the game tree that minimax took
    /// This is useful for debugging as it shows each of the moves we and the adversaries made
    /// during the search
    pub fn chosen_route(&self) -> Vec<(Turn, Move)> {
        match self {
            MinMaxReturn::Leaf { .. } => vec![],
            MinMaxReturn::Node { turn, options, .. } => {
                if let Some(chosen) = options.first() {
                    let mut tail = chosen.1.chosen_route();
                    tail.insert(0, (*turn, chosen.0));
                    tail
                } else {
                    vec![]
                }
            }
        }
    }

    /// This returns a visual representation of the game tree that minimax generated
    /// It shows the chosen score, the moving agent and the chosen move at each level
    pub fn to_text_tree(&self) -> Option<String> {
        let tree_node = self.to_text_tree_node("".to_owned())?;
        Some(format!("{}", tree_node))
    }

    fn to_text_tree_node(&self, label: String) -> Option<StringTreeNode> {
        match self {
            MinMaxReturn::Leaf { .. } => None,
            MinMaxReturn::Node {
                turn,
                options,
                score,
                ..
            } => {
                let mut node = StringTreeNode::new(format!("{} {:?}", label, score));
                for (m, result) in options {
                    if let Some(next_node) = result.to_text_tree_node(format!("{} {}", m, turn)) {
                        node.push_node(next_node);
                    }
                }

                Some(node)
            }
        }
    }
}
