//! Informed search engines for the sliding-tile puzzle.
//!
//! Three interchangeable engines share the [`Solver`] trait:
//! - [`AStarSolver`]: best-first search over a priority frontier with a closed list.
//! - [`IdaStarSolver`]: iterative deepening over a rising f-threshold.
//! - [`RbfsSolver`]: recursive best-first search with backed-up f-values.
//!
//! Every engine owns its [`SearchStats`] for the duration of one `solve()` and
//! reports exhaustion of its [`SearchLimits`] as [`Outcome::NotFound`].
use crate::engine::{PuzzleState, StateKey};
use crate::error::PuzzleError;
use crate::heuristics::Heuristic;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

pub mod astar;
pub mod ida_star;
pub mod rbfs;

pub use astar::AStarSolver;
pub use ida_star::IdaStarSolver;
pub use rbfs::RbfsSolver;

/// Stand-in for an unbounded f-value.
pub(crate) const INFINITY: u32 = u32::MAX;

/// Result of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The goal was reached with this optimal path cost.
    Found(u32),
    /// The space was exhausted or a resource limit stopped the search.
    NotFound,
}

impl Outcome {
    pub fn cost(self) -> Option<u32> {
        match self {
            Outcome::Found(cost) => Some(cost),
            Outcome::NotFound => None,
        }
    }

    pub fn is_found(self) -> bool {
        matches!(self, Outcome::Found(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Found(cost) => write!(f, "{}", cost),
            Outcome::NotFound => f.write_str("NOT_FOUND"),
        }
    }
}

/// Counters collected during one search.
///
/// `nodes_expanded` starts at 1 for the initial state. `history` maps each
/// canonical key to the number of times the engine visited that arrangement.
#[derive(Clone, Debug)]
pub struct SearchStats {
    pub nodes_expanded: u64,
    history: HashMap<StateKey, u32>,
}

impl SearchStats {
    pub fn new() -> Self {
        SearchStats {
            nodes_expanded: 1,
            history: HashMap::new(),
        }
    }

    pub(crate) fn record_visit(&mut self, key: StateKey) {
        *self.history.entry(key).or_insert(0) += 1;
    }

    pub fn history(&self) -> &HashMap<StateKey, u32> {
        &self.history
    }

    /// Visit count for one arrangement, zero if never seen.
    pub fn visits(&self, key: &StateKey) -> u32 {
        self.history.get(key).copied().unwrap_or(0)
    }

    pub fn unique_states(&self) -> usize {
        self.history.len()
    }

    /// Total visits to arrangements that were seen more than once.
    pub fn duplicate_visits(&self) -> u64 {
        self.history
            .values()
            .filter(|&&count| count > 1)
            .map(|&count| count as u64)
            .sum()
    }
}

impl Default for SearchStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Resource guards turning a runaway search into [`Outcome::NotFound`].
///
/// `max_expansions` caps each IDA* iteration, and the whole search for A* and RBFS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub time_limit: Option<Duration>,
    pub max_expansions: Option<u64>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    pub fn with_max_expansions(mut self, max_expansions: u64) -> Self {
        self.max_expansions = Some(max_expansions);
        self
    }
}

const DEADLINE_POLL_INTERVAL: u64 = 256;

/// Running view of [`SearchLimits`] for one `solve()` call.
///
/// The deadline is polled on the first charge and then every
/// `DEADLINE_POLL_INTERVAL` charges; cancellation is cooperative.
pub(crate) struct Budget {
    deadline: Option<Instant>,
    max_expansions: Option<u64>,
    expansions: u64,
    charges: u64,
}

impl Budget {
    pub(crate) fn start(limits: &SearchLimits) -> Self {
        Budget {
            deadline: limits
                .time_limit
                .and_then(|limit| Instant::now().checked_add(limit)),
            max_expansions: limits.max_expansions,
            expansions: 0,
            charges: 0,
        }
    }

    /// Resets the per-iteration expansion count.
    pub(crate) fn begin_iteration(&mut self) {
        self.expansions = 0;
    }

    /// Accounts for one unit of work. Returns `true` once a limit is hit.
    pub(crate) fn charge(&mut self) -> bool {
        let poll = self.charges % DEADLINE_POLL_INTERVAL == 0;
        self.charges += 1;
        self.expansions += 1;
        if self
            .max_expansions
            .is_some_and(|cap| self.expansions > cap)
        {
            return true;
        }
        poll && self.deadline_passed()
    }

    pub(crate) fn deadline_passed(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Common interface of the search engines.
pub trait Solver {
    fn algorithm(&self) -> Algorithm;

    fn heuristic(&self) -> Heuristic;

    /// Runs the search from the initial state. Statistics and the solution
    /// path are reset at the start of every call.
    fn solve(&mut self) -> Outcome;

    fn stats(&self) -> &SearchStats;

    /// States from the initial board to the goal, inclusive. Empty unless the
    /// last `solve()` found the goal.
    fn solution(&self) -> &[PuzzleState];

    fn nodes_expanded(&self) -> u64 {
        self.stats().nodes_expanded
    }

    fn history(&self) -> &HashMap<StateKey, u32> {
        self.stats().history()
    }

    /// Number of moves on the solution path.
    fn moves(&self) -> usize {
        self.solution().len().saturating_sub(1)
    }
}

/// Selects a search engine by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[serde(alias = "astar")]
    AStar,
    #[default]
    #[serde(alias = "idastar")]
    IdaStar,
    Rbfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::AStar, Algorithm::IdaStar, Algorithm::Rbfs];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::AStar => "a_star",
            Algorithm::IdaStar => "ida_star",
            Algorithm::Rbfs => "rbfs",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a_star" | "astar" | "a*" => Ok(Algorithm::AStar),
            "ida_star" | "idastar" | "ida*" | "ida" => Ok(Algorithm::IdaStar),
            "rbfs" => Ok(Algorithm::Rbfs),
            other => Err(PuzzleError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Builds the engine for `algorithm` over `initial`.
pub fn build_solver(
    algorithm: Algorithm,
    initial: PuzzleState,
    heuristic: Heuristic,
    limits: SearchLimits,
) -> Box<dyn Solver> {
    match algorithm {
        Algorithm::AStar => Box::new(AStarSolver::new(initial, heuristic).with_limits(limits)),
        Algorithm::IdaStar => Box::new(IdaStarSolver::new(initial, heuristic).with_limits(limits)),
        Algorithm::Rbfs => Box::new(RbfsSolver::new(initial, heuristic).with_limits(limits)),
    }
}
