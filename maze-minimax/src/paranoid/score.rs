use std::fmt::Debug;

use maze_game_types::types::TerminationDeterminableGame;

#[derive(Debug, Clone, PartialOrd, Ord, PartialEq, Eq, Copy)]
/// The wrapped score type. This takes into account the score provided by the score function, but
/// wraps it with a Score based on the game state. This allows us to say that finishing the maze
/// is better than any score and being eliminated is worse than any score
pub enum WrappedScore<ScoreType>
where
    ScoreType: PartialOrd + Ord + Debug + Clone + Copy,
{
    /// You were eaten, whether or not lives remain
    Lose,
    /// We order this based on the score provided by the score function
    Scored(ScoreType),
    /// The game ended and you were not eliminated
    Win,
}

impl<ScoreType> WrappedScore<ScoreType>
where
    ScoreType: PartialOrd + Ord + Debug + Clone + Copy,
{
    /// Returns the best possible score
    ///
    /// No WrappedScore can be higher than this given the Ord
    pub fn best_possible_score() -> Self {
        WrappedScore::Win
    }

    /// Returns the worst possible score
    ///
    /// No WrappedScore can be lower than this given the Ord
    pub fn worst_possible_score() -> Self {
        WrappedScore::Lose
    }

    /// Was this score produced by a finished game
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Scored(_))
    }
}

/// This trait is used to control something that can return a score from a game board
///
/// We use this trait to be able to layer in different scoring approaches
pub trait Scorable<GameType, ScoreType> {
    /// Convert the given GameType into a ScoreType
    fn score(&self, game: &GameType) -> ScoreType;
}

impl<GameType, ScoreType, FnLike: Fn(&GameType) -> ScoreType> Scorable<GameType, ScoreType>
    for FnLike
{
    fn score(&self, game: &GameType) -> ScoreType {
        (self)(game)
    }
}

/// Provides an implementation for `wrapped_score` if the implementer implements the `score`
/// function.
///
/// `wrapped_score` takes into account if the node is an end state so that the underlying scoring
/// functions don't need to worry about this
pub trait WrappedScorable<GameType, ScoreType>
where
    ScoreType: PartialOrd + Ord + Copy + Debug,
    GameType: TerminationDeterminableGame,
{
    /// The score for all non end state nodes will be defined by this score
    fn score(&self, node: &GameType) -> ScoreType;

    /// Checks the game board and decides if this is a leaf in our Minimax tree. Getting eaten is
    /// always a leaf scored [WrappedScore::Lose], and clearing the maze is [WrappedScore::Win]. If
    /// we've run out of depth, we use the scoring function provided by `score`
    fn wrapped_score(
        &self,
        node: &GameType,
        remaining_depth: usize,
    ) -> Option<WrappedScore<ScoreType>> {
        // Losing a life ends the line even when lives remain
        if node.was_you_eaten() {
            return Some(WrappedScore::Lose);
        }

        if node.is_over() {
            return Some(WrappedScore::Win);
        }

        if remaining_depth == 0 {
            return Some(WrappedScore::Scored(self.score(node)));
        }

        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrapped_score_ordering() {
        let lose: WrappedScore<i64> = WrappedScore::Lose;
        let win: WrappedScore<i64> = WrappedScore::Win;

        assert!(lose < WrappedScore::Scored(i64::MIN));
        assert!(win > WrappedScore::Scored(i64::MAX));
        assert!(WrappedScore::Scored(-3) < WrappedScore::Scored(4));
        assert_eq!(WrappedScore::<i64>::worst_possible_score(), lose);
        assert!(win.is_terminal());
        assert!(!WrappedScore::Scored(0).is_terminal());
    }
}
