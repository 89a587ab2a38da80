//! Search configuration.
//!
//! Load the engine, heuristic, cost model and resource limits from TOML so
//! batch runs can be reconfigured without code changes.
//!
//! # Examples
//!
//! ```
//! use npuzzle_solver::config::SolverConfig;
//! use npuzzle_solver::heuristics::Heuristic;
//! use npuzzle_solver::solver::Algorithm;
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     algorithm = "rbfs"
//!     heuristic = "hamming"
//!
//!     [limits]
//!     time_limit_millis = 250
//!
//!     [edge_costs]
//!     vertical = 2
//! "#).unwrap();
//!
//! assert_eq!(config.algorithm, Algorithm::Rbfs);
//! assert_eq!(config.heuristic, Heuristic::Hamming);
//! assert_eq!(config.limits().time_limit, Some(Duration::from_millis(250)));
//! assert_eq!(config.edge_costs.horizontal, 1);
//! ```
use crate::engine::{EdgeCosts, PuzzleState, MAX_DIM, MIN_DIM};
use crate::error::PuzzleError;
use crate::heuristics::Heuristic;
use crate::solver::{build_solver, Algorithm, SearchLimits, Solver};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] PuzzleError),
}

/// Resource limits as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct LimitsConfig {
    /// Wall-clock budget for one `solve()`.
    pub time_limit_millis: Option<u64>,

    /// Expansion cap: per iteration for IDA*, for the whole search otherwise.
    pub max_expansions: Option<u64>,
}

/// Everything needed to build and run one engine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SolverConfig {
    pub algorithm: Algorithm,
    pub heuristic: Heuristic,

    /// Side length of randomly generated boards.
    pub dimension: usize,

    /// Seed for randomly generated boards; `None` draws from the OS.
    pub random_seed: Option<u64>,

    pub edge_costs: EdgeCosts,
    pub limits: LimitsConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            algorithm: Algorithm::default(),
            heuristic: Heuristic::default(),
            dimension: 3,
            random_seed: None,
            edge_costs: EdgeCosts::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is unreadable, is not valid TOML, or holds
    /// out-of-range values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PuzzleError> {
        self.edge_costs.validate()?;
        if !(MIN_DIM..=MAX_DIM).contains(&self.dimension) {
            return Err(PuzzleError::Dimension(self.dimension));
        }
        Ok(())
    }

    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            time_limit: self.limits.time_limit_millis.map(Duration::from_millis),
            max_expansions: self.limits.max_expansions,
        }
    }

    /// Builds the configured engine for `initial`, priced with the configured edge costs.
    pub fn build_solver(&self, initial: PuzzleState) -> Result<Box<dyn Solver>, PuzzleError> {
        let initial = initial.with_edge_costs(self.edge_costs)?;
        Ok(build_solver(self.algorithm, initial, self.heuristic, self.limits()))
    }

    /// Generates a solvable board from `dimension` and `random_seed`.
    pub fn random_board(&self) -> Result<PuzzleState, PuzzleError> {
        match self.random_seed {
            Some(seed) => PuzzleState::random_with_seed(self.dimension, seed),
            None => PuzzleState::random(self.dimension, &mut rand::thread_rng()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Outcome;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = SolverConfig::from_toml_str("").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert_eq!(config.algorithm, Algorithm::IdaStar);
        assert_eq!(config.heuristic, Heuristic::Manhattan);
        assert!(config.edge_costs.is_unit());
        assert_eq!(config.limits(), SearchLimits::unbounded());
    }

    #[test]
    fn test_full_config() {
        let config = SolverConfig::from_toml_str(
            r#"
            algorithm = "a_star"
            heuristic = "misplaced"
            dimension = 4
            random_seed = 17

            [limits]
            time_limit_millis = 1500
            max_expansions = 100000

            [edge_costs]
            vertical = 3
            horizontal = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::AStar);
        assert_eq!(config.heuristic, Heuristic::Hamming);
        assert_eq!(config.dimension, 4);
        assert_eq!(config.random_seed, Some(17));
        assert_eq!(
            config.limits(),
            SearchLimits::unbounded()
                .with_time_limit(Duration::from_millis(1500))
                .with_max_expansions(100_000)
        );
        assert_eq!(config.edge_costs, EdgeCosts::new(3, 2).unwrap());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = SolverConfig::from_toml_str("[edge_costs]\nvertical = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(PuzzleError::EdgeCost { .. })));

        let err = SolverConfig::from_toml_str("[edge_costs]\nvertical = 2147483649").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(PuzzleError::EdgeCost { .. })));

        let err = SolverConfig::from_toml_str("dimension = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(PuzzleError::Dimension(1))));

        let err = SolverConfig::from_toml_str("algorithm = \"dijkstra\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = SolverConfig::load("/nonexistent/solver.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = SolverConfig::default();
        config.algorithm = Algorithm::Rbfs;
        config.limits.max_expansions = Some(42);
        let text = toml::to_string(&config).unwrap();
        assert_eq!(SolverConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_build_solver_applies_edge_costs() {
        let mut config = SolverConfig::default();
        config.edge_costs = EdgeCosts::new(4, 1).unwrap();
        let initial = PuzzleState::from_tiles(3, vec![3, 1, 2, 0, 4, 5, 6, 7, 8]).unwrap();
        for algorithm in Algorithm::ALL {
            config.algorithm = algorithm;
            let mut solver = config.build_solver(initial.clone()).unwrap();
            assert_eq!(solver.solve(), Outcome::Found(4), "{}", algorithm);
        }
    }

    #[test]
    fn test_seeded_random_board_is_reproducible() {
        let mut config = SolverConfig::default();
        config.random_seed = Some(3);
        config.dimension = 4;
        let a = config.random_board().unwrap();
        let b = config.random_board().unwrap();
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.dim(), 4);
        assert!(a.is_solvable());
    }
}
