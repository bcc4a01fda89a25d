use std::{fmt::Debug, marker::PhantomData};

use derivative::Derivative;
use itertools::Itertools;
use maze_game_types::types::{
    AdversaryIDGettableGame, Move, MoveGeneratableGame, SimulableGame,
    TerminationDeterminableGame,
};
use serde::Deserialize;
use tracing::{info, info_span, warn};

use super::{score::Scorable, MinMaxReturn, Turn, WrappedScorable, WrappedScore};

#[derive(Derivative, Clone)]
#[derivative(Debug)]
/// This is the struct that wraps a maze and a scoring function and can be used to run
/// minimax
///
/// It also outputs traces using the [tracing] crate.
pub struct MinimaxAgent<GameType, ScoreType, ScorableType>
where
    ScorableType: Scorable<GameType, ScoreType>,
{
    /// The maze we are picking a move for
    pub game: GameType,
    #[derivative(Debug = "ignore")]
    score_function: ScorableType,
    /// Used to label traces
    pub name: &'static str,
    options: MinimaxOptions,
    _phantom: PhantomData<ScoreType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Whether the search may skip subtrees that can't change the result
pub enum Pruning {
    /// Every move of every agent is explored
    Disabled,
    /// Alpha-Beta pruning. Picks the same move with the same score as [Pruning::Disabled]
    AlphaBeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
/// Optional properties that can be defined for a [MinimaxAgent]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use maze_minimax::paranoid::{MinimaxOptions, Pruning};
///
/// let defaults: MinimaxOptions = Default::default();
///
/// assert_eq!(defaults.depth, 2);
/// assert_eq!(defaults.pruning, Pruning::AlphaBeta);
/// ```
pub struct MinimaxOptions {
    /// How many full plies to search, where a ply is you and every adversary moving once
    ///
    /// Defaults to 2
    pub depth: usize,
    /// Defaults to [Pruning::AlphaBeta]
    pub pruning: Pruning,
}

impl Default for MinimaxOptions {
    fn default() -> Self {
        Self {
            depth: 2,
            pruning: Pruning::AlphaBeta,
        }
    }
}

impl<GameType, ScoreType, ScorableType> WrappedScorable<GameType, ScoreType>
    for MinimaxAgent<GameType, ScoreType, ScorableType>
where
    ScoreType: Debug + PartialOrd + Ord + Copy,
    GameType: TerminationDeterminableGame,
    ScorableType: Scorable<GameType, ScoreType>,
{
    fn score(&self, node: &GameType) -> ScoreType {
        self.score_function.score(node)
    }
}

impl<GameType, ScoreType>
    MinimaxAgent<GameType, ScoreType, &'static (dyn Fn(&GameType) -> ScoreType + Send + Sync)>
where
    GameType: 'static,
{
    /// Construct a new `MinimaxAgent` from a plain scoring function, using the default
    /// [MinimaxOptions]
    ///
    /// ```rust
    /// use maze_minimax::paranoid::MinimaxAgent;
    /// use maze_game_types::{compact_representation::CompactMaze, wire_representation::Game};
    ///
    /// let fixture = include_str!("../../../maze-rs/fixtures/small_maze.json");
    /// let wire_game: Game = serde_json::from_str(fixture).unwrap();
    /// let compact_game = CompactMaze::convert_from_game(&wire_game).unwrap();
    ///
    /// // Here it just returns a constant but would ideally contain some logic to decide which
    /// // mazes are better than others
    /// fn score_function(_maze: &CompactMaze) -> i32 { 4 }
    ///
    /// let minimax_agent = MinimaxAgent::from_fn(compact_game, &score_function, "constant");
    /// ```
    pub fn from_fn(
        game: GameType,
        score_function: &'static (dyn Fn(&GameType) -> ScoreType + Send + Sync),
        name: &'static str,
    ) -> Self {
        Self {
            game,
            score_function,
            name,
            options: Default::default(),
            _phantom: Default::default(),
        }
    }
}

impl<GameType, ScoreType, ScorableType> MinimaxAgent<GameType, ScoreType, ScorableType>
where
    GameType: AdversaryIDGettableGame
        + MoveGeneratableGame
        + SimulableGame
        + TerminationDeterminableGame
        + Clone
        + Debug,
    ScoreType: Clone + Debug + PartialOrd + Ord + Copy + Default,
    ScorableType: Scorable<GameType, ScoreType>,
{
    /// Construct a new `MinimaxAgent`
    pub fn new(
        game: GameType,
        score_function: ScorableType,
        name: &'static str,
        options: MinimaxOptions,
    ) -> Self {
        Self {
            game,
            score_function,
            name,
            options,
            _phantom: Default::default(),
        }
    }

    /// The options this agent searches with
    pub fn options(&self) -> &MinimaxOptions {
        &self.options
    }

    /// Pick the next move to make
    ///
    /// This runs [MinimaxAgent::single_minimax()] to the configured depth. When the search can't
    /// produce a move for you, because the game is already over or the depth is zero, this falls
    /// back to [Move::Neutral]
    pub fn choose_move(&self) -> Move {
        info_span!(
            "minimax",
            agent_name = self.name,
            depth = self.options.depth,
            pruning = ?self.options.pruning,
            chosen_score = tracing::field::Empty,
            chosen_direction = tracing::field::Empty,
            nodes_visited = tracing::field::Empty,
        )
        .in_scope(|| {
            let (nodes_visited, result) = self.single_minimax(self.options.depth);

            let current_span = tracing::Span::current();
            current_span.record("nodes_visited", &nodes_visited);
            current_span.record("chosen_score", format!("{:?}", result.score()).as_str());

            match result.your_best_move() {
                Some(m) => {
                    current_span.record("chosen_direction", format!("{}", m).as_str());
                    info!(nodes_visited, "finished minimax");
                    m
                }
                None => {
                    warn!("Minimax didn't produce a move for you, standing still");
                    Move::Neutral
                }
            }
        })
    }

    /// Run minimax to exactly `depth` plies
    ///
    /// Returns the number of nodes the search visited along with the full game tree it built.
    /// With [Pruning::AlphaBeta] the node count is never larger than without pruning
    pub fn single_minimax(&self, depth: usize) -> (usize, MinMaxReturn<ScoreType>) {
        let players = std::iter::once(Turn::Maximizer)
            .chain(self.game.adversary_ids().into_iter().map(Turn::Adversary))
            .collect_vec();
        let mut nodes_visited = 0;

        let result = self.minimax(
            &self.game,
            &players,
            0,
            depth,
            WrappedScore::worst_possible_score(),
            WrappedScore::best_possible_score(),
            &mut nodes_visited,
        );

        (nodes_visited, result)
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        node: &GameType,
        players: &[Turn],
        turn_index: usize,
        remaining_depth: usize,
        alpha: WrappedScore<ScoreType>,
        beta: WrappedScore<ScoreType>,
        nodes_visited: &mut usize,
    ) -> MinMaxReturn<ScoreType> {
        let mut alpha = alpha;
        let mut beta = beta;
        *nodes_visited += 1;

        // Once the last adversary has moved the ply is over
        let (turn_index, remaining_depth) = if turn_index == players.len() {
            (0, remaining_depth.saturating_sub(1))
        } else {
            (turn_index, remaining_depth)
        };

        if let Some(score) = self.wrapped_score(node, remaining_depth) {
            return MinMaxReturn::Leaf { score };
        }

        let turn = players[turn_index];
        let is_maximizing = turn.is_maximizer();
        let possible_moves = node.possible_moves(turn.into());

        if possible_moves.is_empty() {
            let score = WrappedScore::Scored(ScoreType::default());

            return MinMaxReturn::Node {
                turn,
                options: vec![(Move::Neutral, MinMaxReturn::Leaf { score })],
                score,
                depth: remaining_depth,
                alpha_beta_cutoff: false,
            };
        }

        let mut options: Vec<(Move, MinMaxReturn<ScoreType>)> =
            Vec::with_capacity(possible_moves.len());
        let mut best: Option<WrappedScore<ScoreType>> = None;
        let mut alpha_beta_cutoff = false;

        for dir in possible_moves {
            let mut next = node.clone();
            match turn {
                Turn::Maximizer => next.advance(dir, &[]),
                Turn::Adversary(id) => next.advance(Move::Neutral, &[(id, dir)]),
            }

            let next_move_return = self.minimax(
                &next,
                players,
                turn_index + 1,
                remaining_depth,
                alpha,
                beta,
                nodes_visited,
            );
            let value = *next_move_return.score();
            options.push((dir, next_move_return));

            let best_value = match best {
                Some(b) if (is_maximizing && value <= b) || (!is_maximizing && value >= b) => b,
                _ => value,
            };
            best = Some(best_value);

            if self.options.pruning == Pruning::AlphaBeta {
                if is_maximizing {
                    if best_value >= beta {
                        alpha_beta_cutoff = true;
                        break;
                    }

                    alpha = std::cmp::max(alpha, best_value);
                } else {
                    if best_value <= alpha {
                        alpha_beta_cutoff = true;
                        break;
                    }

                    beta = std::cmp::min(beta, best_value);
                }
            }
        }

        // Stable sorts, so equal scores stay in the order they were explored
        if is_maximizing {
            options.sort_by(|(_, a), (_, b)| b.score().cmp(a.score()));
        } else {
            options.sort_by(|(_, a), (_, b)| a.score().cmp(b.score()));
        }
        let chosen_score = *options[0].1.score();

        MinMaxReturn::Node {
            turn,
            options,
            score: chosen_score,
            depth: remaining_depth,
            alpha_beta_cutoff,
        }
    }
}

#[cfg(test)]
mod test {
    use maze_game_types::{
        compact_representation::CompactMaze, types::AdversaryId, wire_representation::Game,
    };

    use crate::evaluation::EvaluationWeights;

    use super::*;

    fn agent(
        fixture: &str,
        options: MinimaxOptions,
    ) -> MinimaxAgent<CompactMaze, i64, EvaluationWeights> {
        let game = serde_json::from_str::<Game>(fixture).unwrap();
        let game = CompactMaze::convert_from_game(&game).unwrap();

        MinimaxAgent::new(game, EvaluationWeights::default(), "test", options)
    }

    #[test]
    fn test_alpha_beta_matches_minimax() {
        let fixtures = [
            include_str!("../../../maze-rs/fixtures/small_maze.json"),
            include_str!("../../../maze-rs/fixtures/crossroads.json"),
        ];

        for fixture in fixtures {
            for depth in 1..=3 {
                let plain = agent(
                    fixture,
                    MinimaxOptions {
                        depth,
                        pruning: Pruning::Disabled,
                    },
                );
                let pruned = agent(
                    fixture,
                    MinimaxOptions {
                        depth,
                        pruning: Pruning::AlphaBeta,
                    },
                );

                let (plain_nodes, plain_result) = plain.single_minimax(depth);
                let (pruned_nodes, pruned_result) = pruned.single_minimax(depth);

                assert_eq!(plain_result.score(), pruned_result.score());
                assert_eq!(plain_result.your_best_move(), pruned_result.your_best_move());
                assert!(pruned_nodes <= plain_nodes);
                assert!(!plain_result.had_alpha_beta_cutoff());

                if depth == 3 {
                    assert!(
                        pruned_nodes < plain_nodes,
                        "pruning visited {} nodes, plain minimax {}",
                        pruned_nodes,
                        plain_nodes
                    );
                }
            }
        }
    }

    #[test]
    fn test_losing_a_life_is_never_chosen() {
        let fixture = r##"{ "board": { "layout": ["# P1.#"], "lives": 3 } }"##;

        for pruning in [Pruning::Disabled, Pruning::AlphaBeta] {
            let agent = agent(fixture, MinimaxOptions { depth: 1, pruning });
            let (_, result) = agent.single_minimax(1);

            assert!(result.your_move_is_death(Move::Right));
            assert_eq!(result.your_best_move(), Some(Move::Left));
            assert_eq!(agent.choose_move(), Move::Left);
        }
    }

    #[test]
    fn test_avoids_elimination() {
        let fixture = include_str!("../../../maze-rs/fixtures/two_way_choice.json");

        for pruning in [Pruning::Disabled, Pruning::AlphaBeta] {
            let agent = agent(fixture, MinimaxOptions { depth: 1, pruning });
            let (_, result) = agent.single_minimax(1);

            assert!(result.your_move_is_death(Move::Left));
            assert_eq!(result.your_best_move(), Some(Move::Right));
            assert_eq!(agent.choose_move(), Move::Right);
        }
    }

    #[test]
    fn test_chosen_route_alternates_turns() {
        let fixture = include_str!("../../../maze-rs/fixtures/two_way_choice.json");
        let agent = agent(fixture, Default::default());

        let (_, result) = agent.single_minimax(2);
        let turns = result.chosen_route().into_iter().map(|(t, _)| t).collect_vec();

        assert_eq!(
            turns,
            vec![
                Turn::Maximizer,
                Turn::Adversary(AdversaryId(0)),
                Turn::Maximizer,
                Turn::Adversary(AdversaryId(0)),
            ]
        );
    }

    #[test]
    fn test_finished_game_falls_back_to_neutral() {
        let agent = agent(
            r##"{ "board": { "layout": ["#P#"] } }"##,
            Default::default(),
        );

        let (nodes_visited, result) = agent.single_minimax(3);

        assert_eq!(nodes_visited, 1);
        assert_eq!(*result.score(), WrappedScore::Win);
        assert_eq!(agent.choose_move(), Move::Neutral);
    }

    #[test]
    fn test_no_legal_moves_scores_zero() {
        let agent = agent(
            r####"{ "board": { "layout": ["###", "#P#", "###", "#.#"] } }"####,
            Default::default(),
        );

        let (_, result) = agent.single_minimax(1);

        assert_eq!(*result.score(), WrappedScore::Scored(0));
        assert_eq!(result.your_best_move(), Some(Move::Neutral));
    }

    #[test]
    fn test_from_fn() {
        let fixture = include_str!("../../../maze-rs/fixtures/small_maze.json");
        let game = serde_json::from_str::<Game>(fixture).unwrap();
        let game = CompactMaze::convert_from_game(&game).unwrap();

        fn constant(_: &CompactMaze) -> i64 {
            4
        }

        let agent = MinimaxAgent::from_fn(game, &constant, "constant");
        let (_, result) = agent.single_minimax(1);

        assert_eq!(*result.score(), WrappedScore::Scored(4));
        assert!(format!("{:?}", agent).contains("constant"));
    }
}
