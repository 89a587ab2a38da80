//! Board representation for the sliding-tile puzzle.
//!
//! This module defines the state space every search engine walks:
//! - `Direction`: the four ways the blank can move.
//! - `EdgeCosts`: per-axis move costs (unit by default).
//! - `StateKey`: the canonical identity of a tile arrangement, used for visited-state bookkeeping.
//! - `PuzzleState`: one board configuration with its path cost and incrementally
//!   maintained heuristic values, plus successor generation and the solvability check.
use crate::error::{PuzzleError, Result};
use crate::heuristics::{Heuristic, TileMove};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of the blank cell.
pub const BLANK: u8 = 0;

/// Smallest supported board side length.
pub const MIN_DIM: usize = 2;

/// Largest supported board side length; every tile value must fit in a `u8`.
pub const MAX_DIM: usize = 16;

/// Largest accepted cost for a single move.
///
/// At this cost the weighted Manhattan value of a `MAX_DIM` board stays below
/// `255 * 30 * MAX_EDGE_COST`, far inside `u32`.
pub const MAX_EDGE_COST: u32 = 1_000;

/// Direction the blank travels in a move.
///
/// The tile on the far side slides the opposite way into the blank's old cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Successor generation order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` delta applied to the blank.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// Cost of a single move, per axis.
///
/// A vertical move (blank goes up or down) costs `vertical`; a horizontal one
/// costs `horizontal`. The weighted Manhattan heuristic uses the same weights,
/// so it stays admissible for any positive costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeCosts {
    pub vertical: u32,
    pub horizontal: u32,
}

impl EdgeCosts {
    pub const UNIT: EdgeCosts = EdgeCosts {
        vertical: 1,
        horizontal: 1,
    };

    /// Creates a cost model, rejecting costs outside `1..=MAX_EDGE_COST`.
    pub fn new(vertical: u32, horizontal: u32) -> Result<Self> {
        let costs = EdgeCosts {
            vertical,
            horizontal,
        };
        costs.validate()?;
        Ok(costs)
    }

    pub fn validate(&self) -> Result<()> {
        let range = 1..=MAX_EDGE_COST;
        if !range.contains(&self.vertical) || !range.contains(&self.horizontal) {
            return Err(PuzzleError::EdgeCost {
                vertical: self.vertical,
                horizontal: self.horizontal,
            });
        }
        Ok(())
    }

    /// Cost of moving the blank in `direction`.
    pub fn cost(&self, direction: Direction) -> u32 {
        if direction.is_vertical() {
            self.vertical
        } else {
            self.horizontal
        }
    }

    pub fn is_unit(&self) -> bool {
        *self == EdgeCosts::UNIT
    }
}

impl Default for EdgeCosts {
    fn default() -> Self {
        EdgeCosts::UNIT
    }
}

/// Canonical identity of a tile arrangement: the row-major tile sequence.
///
/// Two states with identical tiles always produce equal keys, regardless of
/// their path cost.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey(Box<[u8]>);

impl StateKey {
    pub fn tiles(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, tile) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", tile)?;
        }
        Ok(())
    }
}

/// One configuration of a `dim x dim` sliding-tile board.
///
/// States are never mutated once built: [`PuzzleState::successors`] copies the
/// tile array for every child, so a child can never observe a change to its
/// parent. The Manhattan and Hamming values are carried along and updated for
/// the single tile that moves, and always equal a full recomputation.
///
/// # Examples
/// ```
/// use npuzzle_solver::engine::PuzzleState;
/// use npuzzle_solver::heuristics::Heuristic;
///
/// let state = PuzzleState::from_tiles(3, vec![1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
/// assert_eq!(state.blank(), (0, 1));
/// assert_eq!(state.heuristic_value(Heuristic::Manhattan), 1);
/// assert_eq!(state.successors().len(), 3);
/// assert!(state.successors().iter().any(|s| s.is_goal(Heuristic::Manhattan)));
/// ```
#[derive(Clone, Debug)]
pub struct PuzzleState {
    dim: usize,
    tiles: Box<[u8]>,
    blank_row: usize,
    blank_col: usize,
    g: u32,
    manhattan: u32,
    hamming: u32,
    costs: EdgeCosts,
}

impl PuzzleState {
    /// The solved board: tiles in row-major order with the blank in the top-left cell.
    pub fn goal(dim: usize) -> Result<Self> {
        check_dim(dim)?;
        let tiles: Vec<u8> = (0..dim * dim).map(|tile| tile as u8).collect();
        Ok(Self::from_valid(dim, tiles.into_boxed_slice(), EdgeCosts::UNIT))
    }

    /// Shuffles a board with `rng`, retrying until the shuffle is solvable.
    pub fn random<R: Rng + ?Sized>(dim: usize, rng: &mut R) -> Result<Self> {
        check_dim(dim)?;
        let mut tiles: Vec<u8> = (0..dim * dim).map(|tile| tile as u8).collect();
        loop {
            tiles.shuffle(rng);
            if tiles_solvable(&tiles, dim) {
                break;
            }
        }
        Ok(Self::from_valid(dim, tiles.into_boxed_slice(), EdgeCosts::UNIT))
    }

    /// Reproducible variant of [`PuzzleState::random`].
    pub fn random_with_seed(dim: usize, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        Self::random(dim, &mut rng)
    }

    /// Builds a state from a row-major tile array.
    ///
    /// # Errors
    /// Fails if `tiles` is not a permutation of `0..dim * dim`, or if the
    /// permutation cannot reach the goal.
    pub fn from_tiles(dim: usize, tiles: Vec<u8>) -> Result<Self> {
        let state = Self::from_permutation(dim, tiles)?;
        if !state.is_solvable() {
            return Err(PuzzleError::Unsolvable);
        }
        Ok(state)
    }

    /// Builds a state from a row-major tile array without the solvability check.
    ///
    /// Searching an unsolvable board only terminates through A*'s frontier
    /// running dry or through [`crate::solver::SearchLimits`].
    pub fn from_permutation(dim: usize, tiles: Vec<u8>) -> Result<Self> {
        check_dim(dim)?;
        let cells = dim * dim;
        if tiles.len() != cells {
            return Err(PuzzleError::TileCount {
                dim,
                expected: cells,
                found: tiles.len(),
            });
        }
        let mut seen = vec![false; cells];
        for &tile in &tiles {
            let index = tile as usize;
            if index >= cells {
                return Err(PuzzleError::TileOutOfRange { tile: index, cells });
            }
            if seen[index] {
                return Err(PuzzleError::DuplicateTile(tile));
            }
            seen[index] = true;
        }
        Ok(Self::from_valid(dim, tiles.into_boxed_slice(), EdgeCosts::UNIT))
    }

    /// Returns this state priced under `costs`; the Manhattan value is recomputed.
    pub fn with_edge_costs(mut self, costs: EdgeCosts) -> Result<Self> {
        costs.validate()?;
        self.costs = costs;
        self.manhattan = Heuristic::Manhattan.compute(&self);
        Ok(self)
    }

    fn from_valid(dim: usize, tiles: Box<[u8]>, costs: EdgeCosts) -> Self {
        let blank = tiles
            .iter()
            .position(|&tile| tile == BLANK)
            .unwrap_or_default();
        let manhattan = Heuristic::Manhattan.compute_tiles(&tiles, dim, costs);
        let hamming = Heuristic::Hamming.compute_tiles(&tiles, dim, costs);
        PuzzleState {
            dim,
            tiles,
            blank_row: blank / dim,
            blank_col: blank % dim,
            g: 0,
            manhattan,
            hamming,
            costs,
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Row-major tile values; `0` is the blank.
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn tile(&self, row: usize, col: usize) -> u8 {
        self.tiles[row * self.dim + col]
    }

    /// `(row, col)` of the blank.
    pub fn blank(&self) -> (usize, usize) {
        (self.blank_row, self.blank_col)
    }

    /// Path cost from the initial state.
    pub fn g(&self) -> u32 {
        self.g
    }

    pub fn edge_costs(&self) -> EdgeCosts {
        self.costs
    }

    pub fn manhattan(&self) -> u32 {
        self.manhattan
    }

    pub fn hamming(&self) -> u32 {
        self.hamming
    }

    /// Cached estimate for `heuristic`.
    pub fn heuristic_value(&self, heuristic: Heuristic) -> u32 {
        match heuristic {
            Heuristic::Manhattan => self.manhattan,
            Heuristic::Hamming => self.hamming,
        }
    }

    /// `f = g + h` for `heuristic`.
    pub fn evaluation_value(&self, heuristic: Heuristic) -> u32 {
        self.g.saturating_add(self.heuristic_value(heuristic))
    }

    /// True iff the estimate is zero, which for both heuristics means the tiles
    /// are in goal order.
    pub fn is_goal(&self, heuristic: Heuristic) -> bool {
        self.heuristic_value(heuristic) == 0
    }

    /// Number of pairs `i < j` of non-blank tiles with `tiles[i] > tiles[j]`.
    pub fn inversions(&self) -> usize {
        count_inversions(&self.tiles)
    }

    /// Whether the goal is reachable from this arrangement.
    ///
    /// On odd widths a move never changes inversion parity, so the count must
    /// be even like the goal's. On even widths a vertical move flips inversion
    /// parity and the blank's row together, so `inversions + blank_row` must be even.
    pub fn is_solvable(&self) -> bool {
        tiles_solvable(&self.tiles, self.dim)
    }

    pub fn canonical_key(&self) -> StateKey {
        StateKey(self.tiles.clone())
    }

    /// The state reached by moving the blank in `direction`, if it stays on the board.
    pub fn successor(&self, direction: Direction) -> Option<Self> {
        let (dr, dc) = direction.offset();
        let row = self.blank_row.checked_add_signed(dr)?;
        let col = self.blank_col.checked_add_signed(dc)?;
        if row >= self.dim || col >= self.dim {
            return None;
        }

        let from = row * self.dim + col;
        let to = self.blank_row * self.dim + self.blank_col;
        let mv = TileMove {
            tile: self.tiles[from],
            from: (row, col),
            to: (self.blank_row, self.blank_col),
        };

        let mut tiles = self.tiles.clone();
        tiles.swap(from, to);
        let next = PuzzleState {
            dim: self.dim,
            tiles,
            blank_row: row,
            blank_col: col,
            g: self.g.saturating_add(self.costs.cost(direction)),
            manhattan: Heuristic::Manhattan.apply_move(self.manhattan, mv, self.dim, self.costs),
            hamming: Heuristic::Hamming.apply_move(self.hamming, mv, self.dim, self.costs),
            costs: self.costs,
        };
        debug_assert_eq!(
            next.manhattan,
            Heuristic::Manhattan.compute(&next),
            "incremental manhattan diverged after moving tile {}",
            mv.tile
        );
        debug_assert_eq!(
            next.hamming,
            Heuristic::Hamming.compute(&next),
            "incremental hamming diverged after moving tile {}",
            mv.tile
        );
        Some(next)
    }

    /// All states one move away: two in a corner, three on an edge, four inside.
    pub fn successors(&self) -> Vec<Self> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.successor(direction))
            .collect()
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.dim * self.dim - 1).to_string().len();
        for row in self.tiles.chunks(self.dim) {
            for (col, &tile) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                if tile == BLANK {
                    write!(f, "{:>width$}", "_", width = width)?;
                } else {
                    write!(f, "{:>width$}", tile, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn check_dim(dim: usize) -> Result<()> {
    if (MIN_DIM..=MAX_DIM).contains(&dim) {
        Ok(())
    } else {
        Err(PuzzleError::Dimension(dim))
    }
}

fn count_inversions(tiles: &[u8]) -> usize {
    tiles
        .iter()
        .enumerate()
        .filter(|&(_, &tile)| tile != BLANK)
        .map(|(i, &tile)| {
            tiles[i + 1..]
                .iter()
                .filter(|&&next| next != BLANK && next < tile)
                .count()
        })
        .sum()
}

fn tiles_solvable(tiles: &[u8], dim: usize) -> bool {
    let inversions = count_inversions(tiles);
    if dim % 2 == 1 {
        inversions % 2 == 0
    } else {
        let blank_row = tiles
            .iter()
            .position(|&tile| tile == BLANK)
            .map_or(0, |index| index / dim);
        (inversions + blank_row) % 2 == 0
    }
}
