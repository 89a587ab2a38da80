//! Error types for board construction and parsing.

use crate::engine::{MAX_DIM, MAX_EDGE_COST, MIN_DIM};
use thiserror::Error;

/// Validation errors raised while building a board or reading its settings.
///
/// Running out of time or expansions during a search is not an error; engines
/// report that as [`crate::solver::Outcome::NotFound`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PuzzleError {
    /// Board side length outside the supported range.
    #[error("board dimension {0} is outside the supported range {min}..={max}", min = MIN_DIM, max = MAX_DIM)]
    Dimension(usize),

    /// Tile array length does not match `dim * dim`.
    #[error("expected {expected} tiles for a {dim}x{dim} board, found {found}")]
    TileCount {
        dim: usize,
        expected: usize,
        found: usize,
    },

    /// A tile value is not in `0..dim * dim`.
    #[error("tile {tile} is out of range for a board with {cells} cells")]
    TileOutOfRange { tile: usize, cells: usize },

    /// A tile value occurs more than once.
    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),

    /// The permutation has the wrong inversion parity to ever reach the goal.
    #[error("board is not solvable: its inversion parity does not match the goal")]
    Unsolvable,

    /// Edge costs must be positive to keep the heuristics admissible, and bounded
    /// so path costs and estimates fit in `u32`.
    #[error(
        "edge costs must be in 1..={max} (vertical {vertical}, horizontal {horizontal})",
        max = MAX_EDGE_COST
    )]
    EdgeCost { vertical: u32, horizontal: u32 },

    #[error("unknown heuristic '{0}' (expected 'manhattan' or 'hamming')")]
    UnknownHeuristic(String),

    #[error("unknown algorithm '{0}' (expected 'a_star', 'ida_star' or 'rbfs')")]
    UnknownAlgorithm(String),

    /// Malformed board text.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result alias for board construction and parsing.
pub type Result<T> = std::result::Result<T, PuzzleError>;
