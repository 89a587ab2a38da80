use crate::engine::{PuzzleState, MAX_DIM};
use crate::error::{PuzzleError, Result};

/// Parses an array of row strings into a `PuzzleState`.
///
/// Each string holds one board row of whitespace-separated tile numbers, top
/// row first. The blank may be written as `0`, `_` or `.`. The number of rows
/// fixes the board dimension, and every row must hold exactly that many tiles.
///
/// # Returns
/// * `Ok(PuzzleState)` for a solvable permutation of `0..dim * dim`.
/// * `Err(PuzzleError)` if:
///     - A row has the wrong number of tiles, or a token is not a tile number.
///     - The tiles are not a permutation, or the board cannot reach the goal.
///
/// # Examples
/// ```
/// use npuzzle_solver::utils::state_from_str_rows;
///
/// let state = state_from_str_rows(&["1 _ 2", "3 4 5", "6 7 8"]).unwrap();
/// assert_eq!(state.tiles(), &[1, 0, 2, 3, 4, 5, 6, 7, 8]);
///
/// assert!(state_from_str_rows(&["1 2", "3"]).is_err());
/// assert!(state_from_str_rows(&["0 2 1", "3 4 5", "6 7 8"]).is_err()); // odd parity
/// ```
pub fn state_from_str_rows(rows: &[&str]) -> Result<PuzzleState> {
    let dim = rows.len();
    if dim > MAX_DIM {
        return Err(PuzzleError::Parse(format!(
            "Invalid number of rows. Expected at most {}, found {}",
            MAX_DIM, dim
        )));
    }

    let mut tiles = Vec::with_capacity(dim * dim);
    for (r, row) in rows.iter().enumerate() {
        let tokens: Vec<&str> = row.split_whitespace().collect();
        if tokens.len() != dim {
            return Err(PuzzleError::Parse(format!(
                "Row {} has {} tiles (expected {})",
                r,
                tokens.len(),
                dim
            )));
        }
        for (c, token) in tokens.iter().enumerate() {
            let tile = match *token {
                "_" | "." => 0,
                number => number.parse::<u8>().map_err(|_| {
                    PuzzleError::Parse(format!(
                        "Unrecognized tile '{}' in row {} col {}",
                        token, r, c
                    ))
                })?,
            };
            tiles.push(tile);
        }
    }
    PuzzleState::from_tiles(dim, tiles)
}

/// Parses a whole board file. Blank lines and lines starting with `#` are skipped.
pub fn parse_state(text: &str) -> Result<PuzzleState> {
    let rows: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();
    state_from_str_rows(&rows)
}
