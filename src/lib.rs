//! # N-Puzzle Solver Library
//!
//! This library finds shortest solutions to the sliding-tile puzzle
//! (8-puzzle, 15-puzzle and larger square boards) with informed search.
//!
//! It is used by the `solve_board` binary, which loads a board from a file or
//! generates a random solvable one, runs the selected engine and reports the
//! cost, the move sequence and the search statistics.
//!
//! ## Modules
//! - `engine`: the board state (`PuzzleState`), its incremental heuristic
//!   bookkeeping, successor generation and the solvability check.
//! - `heuristics`: the Manhattan and Hamming estimates behind the `Heuristic` strategy.
//! - `solver`: the `Solver` trait and the A*, IDA* and RBFS engines.
//! - `config`: TOML-loadable search configuration.
//! - `error`: validation errors.
//! - `utils`: parsing boards from text.
//!
//! ```
//! use npuzzle_solver::{Heuristic, IdaStarSolver, Outcome, PuzzleState, Solver};
//!
//! let board = PuzzleState::from_tiles(3, vec![1, 4, 2, 3, 5, 8, 6, 7, 0]).unwrap();
//! let mut solver = IdaStarSolver::new(board, Heuristic::Manhattan);
//! assert_eq!(solver.solve(), Outcome::Found(4));
//! assert_eq!(solver.moves(), 4);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod heuristics;
pub mod solver;
pub mod utils;

pub use engine::{Direction, EdgeCosts, PuzzleState, StateKey};
pub use error::PuzzleError;
pub use heuristics::Heuristic;
pub use solver::{
    build_solver, AStarSolver, Algorithm, IdaStarSolver, Outcome, RbfsSolver, SearchLimits,
    SearchStats, Solver,
};
