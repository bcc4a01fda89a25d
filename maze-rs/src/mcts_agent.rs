//! Monte Carlo Tree Search over the junctions of the maze.
//!
//! Nodes of the tree are junctions rather than single cells. Expanding a node follows the chosen
//! corridor until the next junction, so one edge of the tree is usually several ticks of the
//! game. The agent only searches while standing on a junction and otherwise follows the
//! corridor it committed to, evading hostile adversaries that get close.

use std::{
    cell::RefCell,
    sync::atomic::{AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use atomic_float::AtomicF64;
use decorum::N64;
use maze_game_types::types::{
    AdversaryIDGettableGame, Agent, JunctionQueryableGame, LastMoveGettableGame,
    LivesGettableGame, Move, MoveGeneratableGame, PelletGettableGame, PositionGettableGame,
    RandomReasonableMovesGame, ShortestPathGame, SimulableGame, TerminationDeterminableGame,
    ThreatGettableGame,
};
use rand::{seq::SliceRandom, Rng};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};
pub use typed_arena::Arena;

use crate::{
    corridor::{follow_corridor, follow_corridor_evading},
    policy::{AdversaryPolicy, YouPolicy},
    MazeAgent, Result,
};

/// Everything the search needs from a maze
pub trait MctsGame:
    Clone
    + AdversaryIDGettableGame
    + MoveGeneratableGame
    + SimulableGame
    + TerminationDeterminableGame
    + LivesGettableGame
    + PelletGettableGame
    + ThreatGettableGame
    + LastMoveGettableGame
    + JunctionQueryableGame
    + ShortestPathGame
    + RandomReasonableMovesGame
{
}

impl<T> MctsGame for T where
    T: Clone
        + AdversaryIDGettableGame
        + MoveGeneratableGame
        + SimulableGame
        + TerminationDeterminableGame
        + LivesGettableGame
        + PelletGettableGame
        + ThreatGettableGame
        + LastMoveGettableGame
        + JunctionQueryableGame
        + ShortestPathGame
        + RandomReasonableMovesGame
{
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
/// Tuning knobs for [MctsAgent]
///
/// The defaults (as implemented by [Default]) are as follows:
/// ```
/// use std::time::Duration;
/// use maze_rs::mcts_agent::MctsOptions;
///
/// let defaults: MctsOptions = Default::default();
///
/// assert_eq!(defaults.exploration_constant, 1.0 / 2f64.sqrt());
/// assert_eq!(defaults.threat_radius, 9);
/// assert_eq!(defaults.hunt_radius, 25);
/// assert_eq!(defaults.expansion_limit, 35);
/// assert_eq!(defaults.search_time(), Duration::from_millis(50));
/// assert_eq!(defaults.simulation_steps, 30);
/// assert_eq!(defaults.implausible_distance, 100);
/// assert_eq!(defaults.transition_step_limit, 200);
/// ```
pub struct MctsOptions {
    /// `C` in the UCT formula
    pub exploration_constant: f64,
    /// Hostile adversaries closer than this make you leave the corridor you're following
    pub threat_radius: u32,
    /// Fleeing adversaries closer than this are chased instead of searching
    pub hunt_radius: u32,
    /// The search stops once it has added more children than this
    pub expansion_limit: usize,
    /// Upper bound on the time spent searching, the decision deadline can cut it shorter
    pub search_time_ms: u64,
    /// Maximum ticks played in a single rollout
    pub simulation_steps: usize,
    /// Eating a power pellet while every adversary is further away than this wastes it
    pub implausible_distance: u32,
    /// Maximum ticks spent following a corridor to the next junction during expansion
    pub transition_step_limit: usize,
}

impl Default for MctsOptions {
    fn default() -> Self {
        Self {
            exploration_constant: 1.0 / 2f64.sqrt(),
            threat_radius: 9,
            hunt_radius: 25,
            expansion_limit: 35,
            search_time_ms: 50,
            simulation_steps: 30,
            implausible_distance: 100,
            transition_step_limit: 200,
        }
    }
}

impl MctsOptions {
    pub fn search_time(&self) -> Duration {
        Duration::from_millis(self.search_time_ms)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MctsError {
    #[error("selection reached a fully expanded node without any children")]
    SelectionDeadEnd,
}

/// What happened while travelling from the parent's junction to this node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The root didn't travel anywhere
    Root,
    /// You were eaten on the way
    Eaten,
    /// A power pellet was eaten with no adversary anywhere near
    WastedPowerPellet,
    /// Nothing was eaten on the way
    Survived,
    /// At least one pellet was eaten on the way
    Collected,
}

impl TransitionOutcome {
    pub fn reward(&self) -> f64 {
        match self {
            TransitionOutcome::Root
            | TransitionOutcome::Eaten
            | TransitionOutcome::WastedPowerPellet => 0.0,
            TransitionOutcome::Survived => 0.2,
            TransitionOutcome::Collected => 1.0,
        }
    }
}

/// `mean + c * sqrt(2 ln(parent_visits) / child_visits)`, infinite for unvisited children
pub fn uct_value(mean: f64, parent_visits: usize, child_visits: usize, c: f64) -> f64 {
    if child_visits == 0 {
        return f64::INFINITY;
    }

    let parent_visits = parent_visits.max(1) as f64;
    let child_visits = child_visits as f64;

    mean + c * (2.0 * parent_visits.ln() / child_visits).sqrt()
}

#[derive(Debug, Clone)]
pub struct MctsAgent<Y, A> {
    pub options: MctsOptions,
    you_policy: Y,
    adversary_policy: A,
}

/// Either a freshly added child, or an existing node to run the rollout from
enum Expansion<'arena, T: PositionGettableGame> {
    Child(&'arena Node<'arena, T>),
    Revisit(&'arena Node<'arena, T>),
}

impl<Y, A> MctsAgent<Y, A> {
    pub fn new(options: MctsOptions, you_policy: Y, adversary_policy: A) -> Self {
        Self {
            options,
            you_policy,
            adversary_policy,
        }
    }

    /// Move towards the first fleeing adversary within the hunt radius
    pub fn hunt<T: MctsGame>(&self, game: &T) -> Option<Move> {
        let you = game.you_position();

        game.adversary_ids()
            .into_iter()
            .filter(|id| game.is_fleeing(*id))
            .find_map(|id| {
                let target = game.position_of(Agent::Adversary(id));
                let distance = game.shortest_path_distance(&you, &target)?;

                if distance < self.options.hunt_radius {
                    debug!(%id, distance, "Hunting");
                    game.next_move_towards(&you, &target)
                } else {
                    None
                }
            })
    }

    fn adversaries_implausibly_far<T: MctsGame>(&self, game: &T) -> bool {
        let you = game.you_position();

        game.adversary_ids().into_iter().all(|id| {
            game.shortest_path_distance(&you, &game.position_of(Agent::Adversary(id)))
                .map_or(true, |d| d > self.options.implausible_distance)
        })
    }
}

impl<Y, A> MctsAgent<Y, A> {
    /// Run the search until `deadline`, or the configured search time, and pick the root child
    /// with the best average reward
    pub fn search<T>(&self, game: &T, deadline: Instant) -> Result<Move>
    where
        T: MctsGame,
        Y: YouPolicy<T>,
        A: AdversaryPolicy<T>,
    {
        self.search_with_rng(game, deadline, &mut rand::thread_rng())
    }

    pub fn search_with_rng<T, R>(&self, game: &T, deadline: Instant, rng: &mut R) -> Result<Move>
    where
        T: MctsGame,
        Y: YouPolicy<T>,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let start = Instant::now();
        let budget = self
            .options
            .search_time()
            .min(deadline.saturating_duration_since(start));
        let expansion_limit = self.options.expansion_limit;

        let while_condition = |_root: &Node<T>, _iterations: usize, expansions: usize| {
            start.elapsed() < budget && expansions <= expansion_limit
        };

        let arena = Arena::new();
        let root_node = self.mcts(game, &while_condition, &arena, rng, deadline)?;

        match root_node
            .highest_average_reward_child()
            .and_then(|child| child.chosen_move())
        {
            Some(m) => Ok(m),
            None => {
                debug!("The root has no children, using the baseline policy");
                Ok(self.you_policy.you_move(game, deadline, rng))
            }
        }
    }

    /// Runs exactly `max_iterations` iterations, no matter how long they take
    pub fn mcts_bench<'arena, T, R>(
        &self,
        game: &T,
        max_iterations: usize,
        arena: &'arena Arena<Node<'arena, T>>,
        rng: &mut R,
    ) -> Result<&'arena Node<'arena, T>>
    where
        T: MctsGame,
        Y: YouPolicy<T>,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let while_condition = |_root: &Node<T>, iterations: usize, _expansions: usize| {
            iterations < max_iterations
        };
        let deadline = Instant::now() + self.options.search_time();

        Ok(self.mcts(game, &while_condition, arena, rng, deadline)?)
    }

    #[tracing::instrument(
        level = "info",
        skip_all,
        fields(total_number_of_iterations, expansions, total_reward)
    )]
    fn mcts<'arena, T, R>(
        &self,
        game: &T,
        while_condition: &dyn Fn(&Node<T>, usize, usize) -> bool,
        arena: &'arena Arena<Node<'arena, T>>,
        rng: &mut R,
        deadline: Instant,
    ) -> std::result::Result<&'arena Node<'arena, T>, MctsError>
    where
        T: MctsGame,
        Y: YouPolicy<T>,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let current_span = tracing::Span::current();

        let root_node: &'arena Node<'arena, T> = arena.alloc(Node::new(game.clone()));

        let mut total_number_of_iterations = 0;
        let mut expansions = 0;

        while while_condition(root_node, total_number_of_iterations, expansions) {
            total_number_of_iterations += 1;

            let selected = self.select(root_node, arena, rng, deadline, &mut expansions)?;

            let reward = self.simulate(selected, rng, deadline);

            selected.backpropagate(reward);
        }

        current_span.record("total_number_of_iterations", &total_number_of_iterations);
        current_span.record("expansions", &expansions);
        current_span.record(
            "total_reward",
            &root_node.total_reward.load(Ordering::Relaxed),
        );

        Ok(root_node)
    }

    /// Walk down the tree by UCT until reaching a node that can still be expanded
    fn select<'arena, T, R>(
        &self,
        root: &'arena Node<'arena, T>,
        arena: &'arena Arena<Node<'arena, T>>,
        rng: &mut R,
        deadline: Instant,
        expansions: &mut usize,
    ) -> std::result::Result<&'arena Node<'arena, T>, MctsError>
    where
        T: MctsGame,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let mut node = root;

        while !node.is_terminal() {
            if !node.is_fully_expanded() {
                return Ok(match self.expand(node, arena, rng, deadline) {
                    Expansion::Child(child) => {
                        *expansions += 1;
                        child
                    }
                    Expansion::Revisit(node) => node,
                });
            }

            node = node
                .best_child(self.options.exploration_constant)
                .ok_or(MctsError::SelectionDeadEnd)?;
        }

        Ok(node)
    }

    fn expand<'arena, T, R>(
        &self,
        node: &'arena Node<'arena, T>,
        arena: &'arena Arena<Node<'arena, T>>,
        rng: &mut R,
        deadline: Instant,
    ) -> Expansion<'arena, T>
    where
        T: MctsGame,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let next = match node.untried_moves().choose(rng) {
            Some(m) => *m,
            None => return Expansion::Revisit(node),
        };
        node.tried_moves.borrow_mut().push(next);

        // Turning back the way we came is never explored
        if next == node.game_state.last_move(Agent::You).opposite() {
            return Expansion::Revisit(node);
        }

        let (game_state, outcome) = self.transition(&node.game_state, next, rng, deadline);
        let child: &'arena Node<'arena, T> =
            arena.alloc(Node::new_with_parent(game_state, node, next, outcome));
        node.children.borrow_mut().push(child);

        Expansion::Child(child)
    }

    /// Follow the corridor starting with `first_move` until the next junction
    fn transition<T, R>(
        &self,
        game: &T,
        first_move: Move,
        rng: &mut R,
        deadline: Instant,
    ) -> (T, TransitionOutcome)
    where
        T: MctsGame,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        let mut state = game.clone();
        let from = state.you_position();
        let lives_before = state.lives_remaining();
        let pellets_before = state.pellet_count();
        let power_pellets_before = state.power_pellet_count();

        let mut direction = first_move;
        for _ in 0..self.options.transition_step_limit {
            direction = match follow_corridor(&state, direction) {
                Ok(m) => m,
                Err(e) => {
                    debug!(error = %e, "Corridor ended before a junction");
                    break;
                }
            };

            let adversary_moves = self
                .adversary_policy
                .adversary_moves(&state, deadline, rng);
            state.advance(direction, &adversary_moves);

            let current = state.you_position();
            if state.was_you_eaten()
                || state.is_over()
                || (current != from && state.is_junction(&current))
            {
                break;
            }
        }

        let outcome = if state.was_you_eaten() || state.lives_remaining() < lives_before {
            TransitionOutcome::Eaten
        } else if state.power_pellet_count() < power_pellets_before
            && self.adversaries_implausibly_far(&state)
        {
            TransitionOutcome::WastedPowerPellet
        } else if state.pellet_count() == pellets_before
            && state.power_pellet_count() == power_pellets_before
        {
            TransitionOutcome::Survived
        } else {
            TransitionOutcome::Collected
        };

        (state, outcome)
    }

    /// Play the game forward from `node` with the rollout policies
    fn simulate<T, R>(&self, node: &Node<T>, rng: &mut R, deadline: Instant) -> f64
    where
        T: MctsGame,
        Y: YouPolicy<T>,
        A: AdversaryPolicy<T>,
        R: Rng,
    {
        if node.outcome == TransitionOutcome::Eaten {
            return 0.0;
        }

        let mut state = node.game_state.clone();
        let lives_before = state.lives_remaining();
        let pellets_before = state.pellet_count();

        for _ in 0..self.options.simulation_steps {
            if state.is_over() {
                break;
            }

            let you_move = self.you_policy.you_move(&state, deadline, rng);
            let adversary_moves = self
                .adversary_policy
                .adversary_moves(&state, deadline, rng);
            state.advance(you_move, &adversary_moves);

            if state.was_you_eaten() {
                break;
            }
        }

        if state.lives_remaining() < lives_before {
            return 0.0;
        }

        let pellets_after = state.pellet_count();
        if pellets_after == 0 {
            return 1.0;
        }

        1.0 - pellets_after as f64 / pellets_before as f64
    }
}

impl<T, Y, A> MazeAgent<T> for MctsAgent<Y, A>
where
    T: MctsGame,
    Y: YouPolicy<T>,
    A: AdversaryPolicy<T>,
{
    fn name(&self) -> String {
        "mcts".to_owned()
    }

    fn make_move(&self, game: &T, deadline: Instant) -> Result<Move> {
        if let Some(m) = self.hunt(game) {
            return Ok(m);
        }

        if game.is_junction(&game.you_position()) {
            let chosen = self.search(game, deadline)?;
            info!(%chosen, "Searched from a junction");

            return Ok(chosen);
        }

        let last_move = game.last_move(Agent::You);
        Ok(follow_corridor_evading(
            game,
            last_move,
            self.options.threat_radius,
        )?)
    }

    fn fallback_move(&self, game: &T) -> Move {
        self.you_policy
            .you_move(game, Instant::now(), &mut rand::thread_rng())
    }
}

struct TreeContext<'arena, T: PositionGettableGame> {
    parent: &'arena Node<'arena, T>,
    r#move: Move,
}

pub struct Node<'arena, T: PositionGettableGame> {
    game_state: T,
    junction: T::NativePositionType,
    outcome: TransitionOutcome,
    total_reward: AtomicF64,
    number_of_visits: AtomicUsize,
    tried_moves: RefCell<Vec<Move>>,
    children: RefCell<Vec<&'arena Node<'arena, T>>>,
    tree_context: Option<TreeContext<'arena, T>>,
}

impl<'arena, T: PositionGettableGame> Node<'arena, T> {
    fn new(game_state: T) -> Self {
        Self {
            junction: game_state.you_position(),
            game_state,
            outcome: TransitionOutcome::Root,
            total_reward: AtomicF64::new(0.0),
            number_of_visits: AtomicUsize::new(0),
            tried_moves: RefCell::new(vec![]),
            children: RefCell::new(vec![]),
            tree_context: None,
        }
    }

    /// The transition reward seeds the total, rollouts are added on top
    fn new_with_parent(
        game_state: T,
        parent: &'arena Self,
        r#move: Move,
        outcome: TransitionOutcome,
    ) -> Self {
        Self {
            junction: game_state.you_position(),
            game_state,
            outcome,
            total_reward: AtomicF64::new(outcome.reward()),
            number_of_visits: AtomicUsize::new(0),
            tried_moves: RefCell::new(vec![]),
            children: RefCell::new(vec![]),
            tree_context: Some(TreeContext { parent, r#move }),
        }
    }

    pub fn junction(&self) -> T::NativePositionType {
        self.junction
    }

    pub fn outcome(&self) -> TransitionOutcome {
        self.outcome
    }

    pub fn number_of_visits(&self) -> usize {
        self.number_of_visits.load(Ordering::Relaxed)
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward.load(Ordering::Relaxed)
    }

    /// The move out of the parent's junction that led here
    pub fn chosen_move(&self) -> Option<Move> {
        self.tree_context.as_ref().map(|t| t.r#move)
    }

    pub fn children(&self) -> Vec<&'arena Node<'arena, T>> {
        self.children.borrow().clone()
    }

    fn average_reward(&self) -> Option<f64> {
        let number_of_visits = self.number_of_visits();

        if number_of_visits == 0 {
            return None;
        }

        Some(self.total_reward() / number_of_visits as f64)
    }

    fn uct_score(&self, c: f64) -> f64 {
        let parent_visits = self
            .tree_context
            .as_ref()
            .map_or(0, |t| t.parent.number_of_visits());

        match self.average_reward() {
            Some(mean) => uct_value(mean, parent_visits, self.number_of_visits(), c),
            None => f64::INFINITY,
        }
    }

    /// Ties go to the child added last
    fn best_child(&self, c: f64) -> Option<&'arena Node<'arena, T>> {
        self.children
            .borrow()
            .iter()
            .copied()
            .max_by_key(|child| N64::from(child.uct_score(c)))
    }

    fn highest_average_reward_child(&self) -> Option<&'arena Node<'arena, T>> {
        self.children
            .borrow()
            .iter()
            .copied()
            .max_by_key(|child| child.average_reward().map(N64::from))
    }

    fn backpropagate(&self, reward: f64) {
        self.number_of_visits.fetch_add(1, Ordering::Relaxed);
        self.total_reward.fetch_add(reward, Ordering::Relaxed);

        if let Some(tree_context) = &self.tree_context {
            tree_context.parent.backpropagate(reward)
        }
    }
}

impl<'arena, T> Node<'arena, T>
where
    T: MoveGeneratableGame + TerminationDeterminableGame + PelletGettableGame,
{
    fn legal_moves(&self) -> Vec<Move> {
        self.game_state.possible_moves(Agent::You)
    }

    pub fn untried_moves(&self) -> Vec<Move> {
        let tried = self.tried_moves.borrow();

        self.legal_moves()
            .into_iter()
            .filter(|m| !tried.contains(m))
            .collect()
    }

    pub fn is_fully_expanded(&self) -> bool {
        let children = self.children.borrow();
        if children.is_empty() {
            return false;
        }

        let legal_moves = self.legal_moves().len();
        legal_moves == children.len() || legal_moves == self.tried_moves.borrow().len()
    }

    pub fn is_terminal(&self) -> bool {
        self.game_state.was_you_eaten() || self.game_state.pellet_count() == 0
    }
}

#[cfg(test)]
mod test {
    use maze_game_types::compact_representation::CompactMaze;
    use rand::{rngs::StdRng, SeedableRng};

    use crate::{
        compact_maze_from_json,
        policy::{Pursuers, RandomReasonable},
    };

    use super::*;

    fn agent() -> MctsAgent<RandomReasonable, RandomReasonable> {
        MctsAgent::new(Default::default(), RandomReasonable, RandomReasonable)
    }

    fn crossroads() -> CompactMaze {
        compact_maze_from_json(include_str!("../fixtures/crossroads.json")).unwrap()
    }

    fn soon() -> Instant {
        Instant::now() + Duration::from_millis(40)
    }

    #[test]
    fn test_uct_unvisited_is_infinite() {
        assert_eq!(uct_value(0.5, 10, 0, 1.0), f64::INFINITY);

        let game = crossroads();
        let n = Node::new(game);
        assert_eq!(n.uct_score(1.0), f64::INFINITY);
    }

    #[test]
    fn test_uct_monotonic() {
        let c = 1.0 / 2f64.sqrt();

        assert!(uct_value(0.5, 10, 2, c) > uct_value(0.5, 10, 3, c));
        assert!(uct_value(0.5, 10, 3, c) > uct_value(0.5, 10, 9, c));
        assert!(uct_value(0.5, 20, 3, c) > uct_value(0.5, 10, 3, c));
        assert_eq!(uct_value(0.5, 1, 1, c), 0.5);
        assert_eq!(uct_value(0.5, 100, 4, 0.0), 0.5);
    }

    #[test]
    fn test_average_reward() {
        let n = Node::new(crossroads());
        assert_eq!(n.average_reward(), None);

        n.number_of_visits.store(2, Ordering::Relaxed);
        n.total_reward.store(1.5, Ordering::Relaxed);
        assert_eq!(n.average_reward(), Some(0.75));
    }

    #[test]
    fn test_backpropagate_path() {
        let game = crossroads();

        let root = Node::new(game.clone());
        let child = Node::new_with_parent(game.clone(), &root, Move::Left, TransitionOutcome::Root);
        let grandchild =
            Node::new_with_parent(game, &child, Move::Up, TransitionOutcome::Survived);

        grandchild.backpropagate(0.5);

        assert_eq!(grandchild.number_of_visits(), 1);
        assert_eq!(grandchild.total_reward(), 0.2 + 0.5);
        assert_eq!(child.number_of_visits(), 1);
        assert_eq!(child.total_reward(), 0.5);
        assert_eq!(root.number_of_visits(), 1);
        assert_eq!(root.total_reward(), 0.5);

        child.backpropagate(1.0);
        assert_eq!(root.number_of_visits(), 2);
        assert_eq!(root.total_reward(), 1.5);
        assert_eq!(grandchild.number_of_visits(), 1);
    }

    #[test]
    fn test_expansion_until_fully_expanded() {
        let agent = agent();
        let arena = Arena::new();
        let mut rng = StdRng::seed_from_u64(3);
        let root: &Node<CompactMaze> = arena.alloc(Node::new(crossroads()));

        assert_eq!(root.untried_moves(), vec![Move::Right, Move::Down, Move::Left]);
        assert!(!root.is_fully_expanded());

        let mut children = 0;
        for _ in 0..3 {
            assert!(!root.is_fully_expanded());
            if let Expansion::Child(child) = agent.expand(root, &arena, &mut rng, soon()) {
                children += 1;
                assert!(child.chosen_move() != Some(Move::Down));
                assert!(child.game_state.is_junction(&child.junction()));
            }
        }

        // Down reverses the last move, so it gets tried without adding a child
        assert_eq!(children, 2);
        assert!(root.untried_moves().is_empty());
        assert!(root.is_fully_expanded());
        assert!(matches!(
            agent.expand(root, &arena, &mut rng, soon()),
            Expansion::Revisit(_)
        ));
    }

    #[test]
    fn test_transition_outcomes() {
        let agent = agent();
        let mut rng = StdRng::seed_from_u64(3);

        let game = crossroads();
        let (state, outcome) = agent.transition(&game, Move::Left, &mut rng, soon());
        assert_eq!(outcome, TransitionOutcome::Collected);
        assert!(state.is_junction(&state.you_position()));

        let game = compact_maze_from_json(
            r########"{ "board": { "layout": ["#######", "#P  . #", "### ###", "#######"] } }"########,
        )
        .unwrap();
        let (state, outcome) = agent.transition(&game, Move::Right, &mut rng, soon());
        assert_eq!(outcome, TransitionOutcome::Survived);
        assert_eq!(state.last_move(Agent::You), Move::Right);
        assert!(state.is_junction(&state.you_position()));

        let game =
            compact_maze_from_json(r####"{ "board": { "layout": ["#Po #", "#.###"] } }"####).unwrap();
        let (_, outcome) = agent.transition(&game, Move::Right, &mut rng, soon());
        assert_eq!(outcome, TransitionOutcome::WastedPowerPellet);

        let game =
            compact_maze_from_json(include_str!("../fixtures/two_way_choice.json")).unwrap();
        let (state, outcome) = agent.transition(&game, Move::Left, &mut rng, soon());
        assert_eq!(outcome, TransitionOutcome::Eaten);
        assert!(state.was_you_eaten());
    }

    #[test]
    fn test_eaten_nodes_simulate_to_zero() {
        let agent = agent();
        let mut rng = StdRng::seed_from_u64(3);
        let game = crossroads();

        let root = Node::new(game.clone());
        let eaten = Node::new_with_parent(game, &root, Move::Left, TransitionOutcome::Eaten);

        assert_eq!(agent.simulate(&eaten, &mut rng, soon()), 0.0);

        let reward = agent.simulate(&root, &mut rng, soon());
        assert!((0.0..=1.0).contains(&reward));
    }

    #[test]
    fn test_avoids_the_trap() {
        let fixture = include_str!("../fixtures/fork_with_trap.json");
        let game = compact_maze_from_json(fixture).unwrap();
        let agent = MctsAgent::new(Default::default(), RandomReasonable, Pursuers::default());
        let mut rng = StdRng::seed_from_u64(11);

        let arena = Arena::new();
        let root = agent.mcts_bench(&game, 100, &arena, &mut rng).unwrap();
        let best = root.highest_average_reward_child().unwrap();

        assert_eq!(root.children().len(), 2);
        assert_eq!(best.chosen_move(), Some(Move::Right));
        assert_eq!(best.outcome(), TransitionOutcome::Collected);
        assert_eq!(root.number_of_visits(), 100);
    }

    #[test]
    fn test_zero_budget_still_moves() {
        let game = crossroads();
        let agent = agent();

        let chosen = agent.search(&game, Instant::now()).unwrap();

        assert!(game.possible_moves(Agent::You).contains(&chosen));
    }

    #[test]
    fn test_decide_at_junction() {
        let game = crossroads();
        let agent = agent();

        let chosen = agent.decide(&game, soon());

        assert!(game.possible_moves(Agent::You).contains(&chosen));
    }

    #[test]
    fn test_decide_in_corridor_evades() {
        let fixture = include_str!("../fixtures/bent_corridor.json");
        let game = compact_maze_from_json(fixture).unwrap();

        assert_eq!(agent().decide(&game, soon()), Move::Left);
    }

    #[test]
    fn test_decide_hunts_fleeing_adversaries() {
        let game = compact_maze_from_json(
            r##"{ "board": {
                "layout": ["#.1..P..#"],
                "you_last_move": "right",
                "adversaries": [{ "fleeing_time": 10 }]
            } }"##,
        )
        .unwrap();

        assert_eq!(agent().hunt(&game), Some(Move::Left));
        assert_eq!(agent().decide(&game, soon()), Move::Left);
    }
}
