//! Admissible cost estimates for the sliding-tile puzzle.
//!
//! Two strategies are available through the closed [`Heuristic`] enum:
//! - `Manhattan`: sum of each tile's row and column distance from its goal cell,
//!   weighted by the configured [`EdgeCosts`].
//! - `Hamming`: number of tiles that are not in their goal cell.
//!
//! Both estimates are maintained incrementally by [`PuzzleState`]: a move only
//! relocates one tile, so [`Heuristic::apply_move`] adjusts the stored value
//! from that tile's old and new cells instead of rescanning the board.
use crate::engine::{EdgeCosts, PuzzleState, BLANK};
use crate::error::PuzzleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single tile relocation caused by moving the blank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileMove {
    /// The tile that slid into the blank's old cell.
    pub tile: u8,
    /// `(row, col)` the tile left.
    pub from: (usize, usize),
    /// `(row, col)` the tile arrived at (where the blank used to be).
    pub to: (usize, usize),
}

/// The heuristic used to rank states during a search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Heuristic {
    /// Weighted Manhattan distance.
    #[default]
    Manhattan,
    /// Misplaced-tile count.
    #[serde(alias = "misplaced")]
    Hamming,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Manhattan, Heuristic::Hamming];

    pub fn name(self) -> &'static str {
        match self {
            Heuristic::Manhattan => "manhattan",
            Heuristic::Hamming => "hamming",
        }
    }

    /// Computes the estimate for `state` from scratch, ignoring cached values.
    ///
    /// This is O(dim²); searches read the cached value through
    /// [`PuzzleState::heuristic_value`] instead.
    pub fn compute(self, state: &PuzzleState) -> u32 {
        self.compute_tiles(state.tiles(), state.dim(), state.edge_costs())
    }

    pub(crate) fn compute_tiles(self, tiles: &[u8], dim: usize, costs: EdgeCosts) -> u32 {
        match self {
            Heuristic::Manhattan => manhattan_distance(tiles, dim, costs),
            Heuristic::Hamming => misplaced_tiles(tiles),
        }
    }

    /// Returns the estimate after `mv`, given the estimate `current` before it.
    ///
    /// Only the moved tile's contribution changes, so this is O(1).
    pub fn apply_move(self, current: u32, mv: TileMove, dim: usize, costs: EdgeCosts) -> u32 {
        match self {
            Heuristic::Manhattan => {
                let before = tile_manhattan(mv.tile, mv.from, dim, costs);
                let after = tile_manhattan(mv.tile, mv.to, dim, costs);
                current + after - before
            }
            Heuristic::Hamming => {
                let goal = goal_position(mv.tile, dim);
                if goal == mv.from {
                    current + 1
                } else if goal == mv.to {
                    current - 1
                } else {
                    current
                }
            }
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Heuristic {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Heuristic::Manhattan),
            "hamming" | "misplaced" => Ok(Heuristic::Hamming),
            other => Err(PuzzleError::UnknownHeuristic(other.to_string())),
        }
    }
}

/// Goal cell `(row, col)` of `tile` on a `dim x dim` board.
///
/// The goal is the identity permutation, so the blank belongs at `(0, 0)`.
pub fn goal_position(tile: u8, dim: usize) -> (usize, usize) {
    let tile = tile as usize;
    (tile / dim, tile % dim)
}

/// Weighted Manhattan contribution of one tile standing at `cell`.
fn tile_manhattan(tile: u8, cell: (usize, usize), dim: usize, costs: EdgeCosts) -> u32 {
    if tile == BLANK {
        return 0;
    }
    let (goal_row, goal_col) = goal_position(tile, dim);
    let rows = cell.0.abs_diff(goal_row) as u32;
    let cols = cell.1.abs_diff(goal_col) as u32;
    rows * costs.vertical + cols * costs.horizontal
}

/// Sum of weighted row and column distances of every non-blank tile.
pub fn manhattan_distance(tiles: &[u8], dim: usize, costs: EdgeCosts) -> u32 {
    tiles
        .iter()
        .enumerate()
        .map(|(index, &tile)| tile_manhattan(tile, (index / dim, index % dim), dim, costs))
        .sum()
}

/// Number of non-blank tiles outside their goal cell.
///
/// Tile `v` belongs at row-major index `v`, so no dimension is needed.
pub fn misplaced_tiles(tiles: &[u8]) -> u32 {
    tiles
        .iter()
        .enumerate()
        .filter(|&(index, &tile)| tile != BLANK && tile as usize != index)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: EdgeCosts = EdgeCosts::UNIT;

    #[test]
    fn test_goal_position() {
        assert_eq!(goal_position(0, 3), (0, 0));
        assert_eq!(goal_position(5, 3), (1, 2));
        assert_eq!(goal_position(15, 4), (3, 3));
    }

    #[test]
    fn test_goal_board_scores_zero() {
        let tiles: Vec<u8> = (0..9).collect();
        assert_eq!(manhattan_distance(&tiles, 3, UNIT), 0);
        assert_eq!(misplaced_tiles(&tiles), 0);
    }

    #[test]
    fn test_known_board_values() {
        // 1 2 5
        // 6 3 4
        // 7 8 _
        let tiles = [1, 2, 5, 6, 3, 4, 7, 8, 0];
        assert_eq!(manhattan_distance(&tiles, 3, UNIT), 8);
        assert_eq!(misplaced_tiles(&tiles), 8);

        // Reversed 8-puzzle: every tile far from home.
        let tiles = [8, 7, 6, 5, 4, 3, 2, 1, 0];
        // 8:(0,0)->(2,2)=4 7:(0,1)->(2,1)=2 6:(0,2)->(2,0)=4
        // 5:(1,0)->(1,2)=2 4:(1,1) home     3:(1,2)->(1,0)=2
        // 2:(2,0)->(0,2)=4 1:(2,1)->(0,1)=2
        assert_eq!(manhattan_distance(&tiles, 3, UNIT), 20);
        assert_eq!(misplaced_tiles(&tiles), 7);
    }

    #[test]
    fn test_manhattan_weights_axes() {
        // Tile 3 sits one row above its goal, tile 1 one column right of its goal.
        let tiles = [3, 0, 2, 1, 4, 5, 6, 7, 8];
        let costs = EdgeCosts {
            vertical: 5,
            horizontal: 2,
        };
        // 3 at (0,0) goal (1,0): 1 row. 1 at (1,0) goal (0,1): 1 row + 1 col.
        assert_eq!(manhattan_distance(&tiles, 3, costs), 5 + 5 + 2);
    }

    #[test]
    fn test_apply_move_manhattan() {
        // Tile 1 slides right from (0,0) into its goal cell.
        let mv = TileMove {
            tile: 1,
            from: (0, 0),
            to: (0, 1),
        };
        assert_eq!(Heuristic::Manhattan.apply_move(1, mv, 3, UNIT), 0);

        let away = TileMove {
            tile: 4,
            from: (1, 1),
            to: (0, 1),
        };
        assert_eq!(Heuristic::Manhattan.apply_move(0, away, 3, UNIT), 1);
    }

    #[test]
    fn test_apply_move_hamming() {
        let into_goal = TileMove {
            tile: 1,
            from: (0, 0),
            to: (0, 1),
        };
        assert_eq!(Heuristic::Hamming.apply_move(1, into_goal, 3, UNIT), 0);

        let out_of_goal = TileMove {
            tile: 4,
            from: (1, 1),
            to: (1, 0),
        };
        assert_eq!(Heuristic::Hamming.apply_move(0, out_of_goal, 3, UNIT), 1);

        let elsewhere = TileMove {
            tile: 8,
            from: (0, 0),
            to: (0, 1),
        };
        assert_eq!(Heuristic::Hamming.apply_move(3, elsewhere, 3, UNIT), 3);
    }

    #[test]
    fn test_parse_heuristic_names() {
        assert_eq!("manhattan".parse::<Heuristic>(), Ok(Heuristic::Manhattan));
        assert_eq!(" Hamming ".parse::<Heuristic>(), Ok(Heuristic::Hamming));
        assert_eq!("misplaced".parse::<Heuristic>(), Ok(Heuristic::Hamming));
        assert_eq!(
            "euclid".parse::<Heuristic>(),
            Err(PuzzleError::UnknownHeuristic("euclid".to_string()))
        );
        for heuristic in Heuristic::ALL {
            assert_eq!(heuristic.to_string().parse::<Heuristic>(), Ok(heuristic));
        }
    }
}
