use super::{Algorithm, Budget, Outcome, SearchLimits, SearchStats, Solver, INFINITY};
use crate::engine::PuzzleState;
use crate::heuristics::Heuristic;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of one depth-first pass under a fixed threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Probe {
    /// A goal was reached with this path cost.
    Found(u32),
    /// Smallest f-value that exceeded the threshold; the next threshold.
    Excess(u32),
    /// Nothing exceeded the threshold and no goal was found.
    Exhausted,
    /// A resource limit was hit mid-pass.
    Aborted,
}

/// What visiting a node produced.
enum Visit {
    Goal(PuzzleState),
    Excess(u32),
    Expand(Frame),
    Aborted,
}

/// One level of the explicit depth-first stack.
struct Frame {
    state: PuzzleState,
    children: std::vec::IntoIter<PuzzleState>,
    min_excess: u32,
}

/// Iterative-deepening A*.
///
/// Each iteration is a depth-first pass that prunes nodes whose `f` exceeds the
/// threshold; the smallest pruned `f` becomes the next threshold. The pass runs
/// on an explicit stack of frames, visiting children in the same order and
/// with the same counts as a recursive search would, so deep boards cannot
/// exhaust the call stack.
pub struct IdaStarSolver {
    initial: PuzzleState,
    heuristic: Heuristic,
    limits: SearchLimits,
    stats: SearchStats,
    solution: Vec<PuzzleState>,
    iterations: u32,
}

impl IdaStarSolver {
    pub fn new(initial: PuzzleState, heuristic: Heuristic) -> Self {
        IdaStarSolver {
            initial,
            heuristic,
            limits: SearchLimits::default(),
            stats: SearchStats::new(),
            solution: Vec::new(),
            iterations: 0,
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Number of threshold iterations run by the last `solve()`.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    fn visit(&mut self, state: PuzzleState, threshold: u32, budget: &mut Budget) -> Visit {
        self.stats.record_visit(state.canonical_key());
        if budget.charge() {
            return Visit::Aborted;
        }
        let f = state.evaluation_value(self.heuristic);
        if f > threshold {
            return Visit::Excess(f);
        }
        if state.is_goal(self.heuristic) {
            return Visit::Goal(state);
        }
        let children = state.successors().into_iter();
        Visit::Expand(Frame {
            state,
            children,
            min_excess: INFINITY,
        })
    }

    fn probe(&mut self, threshold: u32, budget: &mut Budget) -> Probe {
        let mut stack: Vec<Frame> = Vec::new();
        match self.visit(self.initial.clone(), threshold, budget) {
            Visit::Goal(goal) => {
                let cost = goal.g();
                self.solution.push(goal);
                return Probe::Found(cost);
            }
            Visit::Excess(f) => return Probe::Excess(f),
            Visit::Expand(frame) => stack.push(frame),
            Visit::Aborted => return Probe::Aborted,
        }

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.children.next() else {
                let finished = stack.pop().map_or(INFINITY, |frame| frame.min_excess);
                match stack.last_mut() {
                    Some(parent) => parent.min_excess = parent.min_excess.min(finished),
                    None if finished == INFINITY => return Probe::Exhausted,
                    None => return Probe::Excess(finished),
                }
                continue;
            };

            self.stats.nodes_expanded += 1;
            match self.visit(child, threshold, budget) {
                Visit::Goal(goal) => {
                    let cost = goal.g();
                    self.solution = stack.drain(..).map(|frame| frame.state).collect();
                    self.solution.push(goal);
                    return Probe::Found(cost);
                }
                Visit::Excess(f) => {
                    if let Some(frame) = stack.last_mut() {
                        frame.min_excess = frame.min_excess.min(f);
                    }
                }
                Visit::Expand(frame) => stack.push(frame),
                Visit::Aborted => return Probe::Aborted,
            }
        }
        Probe::Exhausted
    }
}

impl Solver for IdaStarSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::IdaStar
    }

    fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    fn solve(&mut self) -> Outcome {
        let started = Instant::now();
        self.stats = SearchStats::new();
        self.solution.clear();
        self.iterations = 0;
        let mut budget = Budget::start(&self.limits);
        let mut threshold = self.initial.heuristic_value(self.heuristic);

        info!(
            event = "solve_start",
            algorithm = %Algorithm::IdaStar,
            heuristic = %self.heuristic,
            initial_estimate = threshold,
        );

        let outcome = loop {
            if budget.deadline_passed() {
                warn!(
                    event = "search_aborted",
                    algorithm = %Algorithm::IdaStar,
                    reason = "deadline",
                    threshold,
                    nodes_expanded = self.stats.nodes_expanded,
                );
                break Outcome::NotFound;
            }
            budget.begin_iteration();
            self.iterations += 1;
            debug!(
                event = "iteration_start",
                iteration = self.iterations,
                threshold,
                nodes_expanded = self.stats.nodes_expanded,
            );

            match self.probe(threshold, &mut budget) {
                Probe::Found(cost) => break Outcome::Found(cost),
                Probe::Excess(next) => {
                    debug_assert!(next > threshold, "threshold must rise");
                    threshold = next;
                }
                Probe::Exhausted => break Outcome::NotFound,
                Probe::Aborted => {
                    warn!(
                        event = "search_aborted",
                        algorithm = %Algorithm::IdaStar,
                        reason = "limit",
                        threshold,
                        nodes_expanded = self.stats.nodes_expanded,
                    );
                    break Outcome::NotFound;
                }
            }
        };

        info!(
            event = "solve_end",
            algorithm = %Algorithm::IdaStar,
            cost = %outcome,
            iterations = self.iterations,
            nodes_expanded = self.stats.nodes_expanded,
            unique_states = self.stats.unique_states(),
            duration_ms = started.elapsed().as_millis() as u64,
        );
        outcome
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn solution(&self) -> &[PuzzleState] {
        &self.solution
    }
}
