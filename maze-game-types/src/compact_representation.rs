//! A compact grid maze, cheap to clone, that implements every trait in [crate::types].
//!
//! Walls and the all-pairs distance table never change during a game so they live behind an
//! [Arc] shared by every copy. Everything a tick can change is owned by the [CompactMaze] itself.

use std::{cmp::Reverse, collections::VecDeque, fmt, sync::Arc};

use itertools::Itertools;
use rand::{seq::SliceRandom, Rng};
use thiserror::Error;

use crate::{
    types::*,
    wire_representation::{Adversary, Game},
};

const PELLET_POINTS: i64 = 10;
const POWER_PELLET_POINTS: i64 = 50;
const ADVERSARY_POINTS: i64 = 200;

const UNREACHABLE: u16 = u16::MAX;

/// The distance table is `cells * cells` so mazes are capped
pub const MAX_CELLS: usize = 2048;

/// Index of a cell in row-major order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex(pub u16);

impl CellIndex {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("layout has no rows")]
    EmptyLayout,
    #[error("row {row} is {got} cells wide, expected {expected}")]
    RaggedLayout {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("unknown cell '{character}' at row {row}, column {column}")]
    UnknownCell {
        character: char,
        row: usize,
        column: usize,
    },
    #[error("layout does not place you ('P')")]
    MissingYou,
    #[error("layout places you more than once")]
    DuplicateYou,
    #[error("adversary {digit} appears more than once")]
    DuplicateAdversary { digit: u32 },
    #[error("layout has {cells} cells, at most {max} are supported")]
    TooLarge { cells: usize, max: usize },
}

#[derive(Debug, PartialEq)]
pub struct MazeLayout {
    width: usize,
    height: usize,
    open: Vec<bool>,
    junctions: Vec<bool>,
    distances: Vec<u16>,
    you_start: CellIndex,
    adversary_starts: Vec<CellIndex>,
}

impl MazeLayout {
    fn new(
        width: usize,
        height: usize,
        open: Vec<bool>,
        you_start: CellIndex,
        adversary_starts: Vec<CellIndex>,
    ) -> Self {
        let mut layout = Self {
            width,
            height,
            open,
            junctions: vec![],
            distances: vec![],
            you_start,
            adversary_starts,
        };

        layout.junctions = (0..layout.cell_count())
            .map(|i| {
                let cell = CellIndex(i as u16);
                layout.open[i] && layout.open_moves(cell).len() > 2
            })
            .collect();
        layout.distances = layout.all_pairs_distances();

        layout
    }

    fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell(&self, row: usize, column: usize) -> CellIndex {
        CellIndex((row * self.width + column) as u16)
    }

    pub fn row_column(&self, cell: CellIndex) -> (usize, usize) {
        (cell.as_usize() / self.width, cell.as_usize() % self.width)
    }

    pub fn is_open(&self, cell: CellIndex) -> bool {
        self.open.get(cell.as_usize()).copied().unwrap_or(false)
    }

    /// The cell one step away in the given direction, if it isn't a wall
    pub fn neighbor(&self, cell: CellIndex, m: Move) -> Option<CellIndex> {
        if m == Move::Neutral {
            return None;
        }

        let (row, column) = self.row_column(cell);
        let (d_row, d_column) = m.to_vector();
        let row = row as i32 + d_row;
        let column = column as i32 + d_column;

        if row < 0 || column < 0 || row >= self.height as i32 || column >= self.width as i32 {
            return None;
        }

        let next = self.cell(row as usize, column as usize);
        self.is_open(next).then_some(next)
    }

    pub fn open_moves(&self, cell: CellIndex) -> Vec<Move> {
        Move::all()
            .into_iter()
            .filter(|m| self.neighbor(cell, *m).is_some())
            .collect()
    }

    pub fn distance(&self, from: CellIndex, to: CellIndex) -> Option<u32> {
        let index = from.as_usize() * self.cell_count() + to.as_usize();
        match self.distances.get(index) {
            Some(&d) if d != UNREACHABLE => Some(d as u32),
            _ => None,
        }
    }

    fn all_pairs_distances(&self) -> Vec<u16> {
        let n = self.cell_count();
        let mut distances = vec![UNREACHABLE; n * n];

        for source in (0..n).filter(|&i| self.open[i]) {
            let row = &mut distances[source * n..(source + 1) * n];
            let mut queue = VecDeque::new();
            row[source] = 0;
            queue.push_back(CellIndex(source as u16));

            while let Some(cell) = queue.pop_front() {
                let next_distance = row[cell.as_usize()] + 1;
                for m in Move::all() {
                    if let Some(neighbor) = self.neighbor(cell, m) {
                        if row[neighbor.as_usize()] == UNREACHABLE {
                            row[neighbor.as_usize()] = next_distance;
                            queue.push_back(neighbor);
                        }
                    }
                }
            }
        }

        distances
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AdversaryState {
    position: CellIndex,
    last_move: Move,
    fleeing_time: u32,
    lair_time: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompactMaze {
    layout: Arc<MazeLayout>,
    you: CellIndex,
    you_last_move: Move,
    adversaries: Vec<AdversaryState>,
    pellets: Vec<CellIndex>,
    power_pellets: Vec<CellIndex>,
    score: i64,
    lives: u8,
    you_eaten: bool,
    fleeing_duration: u32,
    lair_duration: u32,
}

impl CompactMaze {
    pub fn convert_from_game(game: &Game) -> Result<Self, WireError> {
        let rows = &game.board.layout;
        let height = rows.len();
        let width = rows.first().ok_or(WireError::EmptyLayout)?.chars().count();

        if width * height > MAX_CELLS {
            return Err(WireError::TooLarge {
                cells: width * height,
                max: MAX_CELLS,
            });
        }

        let mut open = Vec::with_capacity(width * height);
        let mut pellets = vec![];
        let mut power_pellets = vec![];
        let mut you = None;
        let mut adversaries: Vec<(u32, CellIndex)> = vec![];

        for (row, line) in rows.iter().enumerate() {
            let got = line.chars().count();
            if got != width {
                return Err(WireError::RaggedLayout {
                    row,
                    expected: width,
                    got,
                });
            }

            for (column, character) in line.chars().enumerate() {
                let cell = CellIndex((row * width + column) as u16);
                open.push(character != '#');

                match character {
                    '#' | ' ' => {}
                    '.' => pellets.push(cell),
                    'o' => power_pellets.push(cell),
                    'P' => {
                        if you.replace(cell).is_some() {
                            return Err(WireError::DuplicateYou);
                        }
                    }
                    c if c.is_ascii_digit() && c != '0' => {
                        let digit = c.to_digit(10).unwrap_or_default();
                        if adversaries.iter().any(|(d, _)| *d == digit) {
                            return Err(WireError::DuplicateAdversary { digit });
                        }
                        adversaries.push((digit, cell));
                    }
                    _ => {
                        return Err(WireError::UnknownCell {
                            character,
                            row,
                            column,
                        })
                    }
                }
            }
        }

        let you = you.ok_or(WireError::MissingYou)?;
        adversaries.sort_by_key(|(digit, _)| *digit);
        let adversary_starts = adversaries.iter().map(|(_, cell)| *cell).collect_vec();

        let adversary_states = adversary_starts
            .iter()
            .enumerate()
            .map(|(i, position)| {
                let info: Adversary = game.board.adversaries.get(i).cloned().unwrap_or_default();
                AdversaryState {
                    position: *position,
                    last_move: info.last_move.unwrap_or(Move::Neutral),
                    fleeing_time: info.fleeing_time,
                    lair_time: info.lair_time,
                }
            })
            .collect_vec();

        let layout = MazeLayout::new(width, height, open, you, adversary_starts);

        Ok(Self {
            layout: Arc::new(layout),
            you,
            you_last_move: game.board.you_last_move.unwrap_or(Move::Neutral),
            adversaries: adversary_states,
            pellets,
            power_pellets,
            score: game.board.score,
            lives: game.board.lives,
            you_eaten: false,
            fleeing_duration: game.board.fleeing_duration,
            lair_duration: game.board.lair_duration,
        })
    }

    pub fn layout(&self) -> &MazeLayout {
        &self.layout
    }

    fn eat_pellets(&mut self) {
        if let Ok(i) = self.pellets.binary_search(&self.you) {
            self.pellets.remove(i);
            self.score += PELLET_POINTS;
        }

        if let Ok(i) = self.power_pellets.binary_search(&self.you) {
            self.power_pellets.remove(i);
            self.score += POWER_PELLET_POINTS;

            let fleeing_duration = self.fleeing_duration;
            for adversary in self.adversaries.iter_mut().filter(|a| a.lair_time == 0) {
                adversary.fleeing_time = fleeing_duration;
            }
        }
    }

    /// Adversaries catch you by sharing your cell, or by swapping cells with you this tick
    fn resolve_collisions(&mut self, you_before: CellIndex, adversaries_before: &[CellIndex]) {
        for index in 0..self.adversaries.len() {
            let adversary = self.adversaries[index];
            if adversary.lair_time > 0 {
                continue;
            }

            let crossed =
                adversary.position == you_before && adversaries_before[index] == self.you;
            if adversary.position != self.you && !crossed {
                continue;
            }

            if adversary.fleeing_time > 0 {
                self.score += ADVERSARY_POINTS;
                self.adversaries[index] = AdversaryState {
                    position: self.layout.adversary_starts[index],
                    last_move: Move::Neutral,
                    fleeing_time: 0,
                    lair_time: self.lair_duration,
                };
            } else {
                self.lose_life();
                return;
            }
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.you_eaten = true;
        self.you = self.layout.you_start;
        self.you_last_move = Move::Neutral;

        for (adversary, start) in self
            .adversaries
            .iter_mut()
            .zip(self.layout.adversary_starts.iter())
        {
            *adversary = AdversaryState {
                position: *start,
                last_move: Move::Neutral,
                fleeing_time: 0,
                lair_time: 0,
            };
        }
    }
}

impl PositionGettableGame for CompactMaze {
    type NativePositionType = CellIndex;

    fn position_of(&self, agent: Agent) -> CellIndex {
        match agent {
            Agent::You => self.you,
            Agent::Adversary(id) => self.adversaries[id.as_usize()].position,
        }
    }
}

impl AdversaryIDGettableGame for CompactMaze {
    fn adversary_ids(&self) -> Vec<AdversaryId> {
        (0..self.adversaries.len())
            .map(|i| AdversaryId(i as u8))
            .collect()
    }
}

impl MoveGeneratableGame for CompactMaze {
    fn possible_moves(&self, agent: Agent) -> Vec<Move> {
        match agent {
            Agent::You => self.layout.open_moves(self.you),
            Agent::Adversary(id) => match self.adversaries.get(id.as_usize()) {
                Some(adversary) if adversary.lair_time > 0 => vec![Move::Neutral],
                Some(adversary) => self.layout.open_moves(adversary.position),
                None => vec![],
            },
        }
    }
}

impl SimulableGame for CompactMaze {
    fn advance(&mut self, you_move: Move, adversary_moves: &[(AdversaryId, Move)]) {
        if self.is_over() {
            return;
        }

        self.you_eaten = false;
        for adversary in self.adversaries.iter_mut() {
            adversary.fleeing_time = adversary.fleeing_time.saturating_sub(1);
        }

        let you_before = self.you;
        if let Some(next) = self.layout.neighbor(self.you, you_move) {
            self.you = next;
            self.you_last_move = you_move;
        }
        self.eat_pellets();

        let adversaries_before = self.adversaries.iter().map(|a| a.position).collect_vec();
        for (index, adversary) in self.adversaries.iter_mut().enumerate() {
            if adversary.lair_time > 0 {
                adversary.lair_time -= 1;
                continue;
            }

            let m = adversary_moves
                .iter()
                .find(|(id, _)| id.as_usize() == index)
                .map(|(_, m)| *m)
                .unwrap_or(Move::Neutral);

            if let Some(next) = self.layout.neighbor(adversary.position, m) {
                adversary.position = next;
                adversary.last_move = m;
            }
        }

        self.resolve_collisions(you_before, &adversaries_before);
    }
}

impl TerminationDeterminableGame for CompactMaze {
    fn is_over(&self) -> bool {
        self.lives == 0 || self.pellets.is_empty()
    }

    fn was_you_eaten(&self) -> bool {
        self.you_eaten
    }
}

impl LivesGettableGame for CompactMaze {
    fn lives_remaining(&self) -> u8 {
        self.lives
    }
}

impl PelletGettableGame for CompactMaze {
    fn pellet_positions(&self) -> Vec<CellIndex> {
        self.pellets.clone()
    }

    fn power_pellet_positions(&self) -> Vec<CellIndex> {
        self.power_pellets.clone()
    }

    fn pellet_count(&self) -> usize {
        self.pellets.len()
    }

    fn power_pellet_count(&self) -> usize {
        self.power_pellets.len()
    }
}

impl ThreatGettableGame for CompactMaze {
    fn fleeing_time(&self, id: AdversaryId) -> u32 {
        self.adversaries
            .get(id.as_usize())
            .map_or(0, |a| a.fleeing_time)
    }

    fn lair_time(&self, id: AdversaryId) -> u32 {
        self.adversaries.get(id.as_usize()).map_or(0, |a| a.lair_time)
    }
}

impl LastMoveGettableGame for CompactMaze {
    fn last_move(&self, agent: Agent) -> Move {
        match agent {
            Agent::You => self.you_last_move,
            Agent::Adversary(id) => self
                .adversaries
                .get(id.as_usize())
                .map_or(Move::Neutral, |a| a.last_move),
        }
    }
}

impl ScoreGettableGame for CompactMaze {
    fn current_score(&self) -> i64 {
        self.score
    }
}

impl JunctionQueryableGame for CompactMaze {
    fn is_junction(&self, pos: &CellIndex) -> bool {
        self.layout
            .junctions
            .get(pos.as_usize())
            .copied()
            .unwrap_or(false)
    }
}

impl ShortestPathGame for CompactMaze {
    fn shortest_path_distance(&self, from: &CellIndex, to: &CellIndex) -> Option<u32> {
        self.layout.distance(*from, *to)
    }

    fn next_move_towards(&self, from: &CellIndex, to: &CellIndex) -> Option<Move> {
        if from == to {
            return None;
        }

        self.layout
            .open_moves(*from)
            .into_iter()
            .filter_map(|m| {
                let next = self.layout.neighbor(*from, m)?;
                Some((m, self.layout.distance(next, *to)?))
            })
            .min_by_key(|(_, d)| *d)
            .map(|(m, _)| m)
    }

    fn next_move_away_from(&self, from: &CellIndex, to: &CellIndex) -> Option<Move> {
        self.layout
            .open_moves(*from)
            .into_iter()
            .filter_map(|m| {
                let next = self.layout.neighbor(*from, m)?;
                Some((m, self.layout.distance(next, *to)?))
            })
            .min_by_key(|(_, d)| Reverse(*d))
            .map(|(m, _)| m)
    }
}

impl RandomReasonableMovesGame for CompactMaze {
    fn random_reasonable_move_for_you<R: Rng + ?Sized>(&self, rng: &mut R) -> Move {
        self.possible_moves(Agent::You)
            .choose(rng)
            .copied()
            .unwrap_or(Move::Neutral)
    }

    fn random_reasonable_move_for_each_adversary<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> AdversaryMoves {
        self.adversary_ids()
            .into_iter()
            .map(|id| {
                let m = self
                    .possible_moves(Agent::Adversary(id))
                    .choose(rng)
                    .copied()
                    .unwrap_or(Move::Neutral);
                (id, m)
            })
            .collect()
    }
}

impl fmt::Display for CompactMaze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.layout.height {
            for column in 0..self.layout.width {
                let cell = self.layout.cell(row, column);
                let adversary = self.adversaries.iter().position(|a| a.position == cell);

                let c = if cell == self.you {
                    'P'
                } else if let Some(i) = adversary {
                    char::from_digit((i + 1) as u32, 10).unwrap_or('?')
                } else if !self.layout.is_open(cell) {
                    '#'
                } else if self.pellets.binary_search(&cell).is_ok() {
                    '.'
                } else if self.power_pellets.binary_search(&cell).is_ok() {
                    'o'
                } else {
                    ' '
                };
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
