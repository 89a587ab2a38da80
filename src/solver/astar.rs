use super::{Algorithm, Budget, Outcome, SearchLimits, SearchStats, Solver};
use crate::engine::{PuzzleState, StateKey};
use crate::heuristics::Heuristic;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A node stored in the search arena, linked to the node it was generated from.
struct Node {
    state: PuzzleState,
    parent: Option<usize>,
}

/// Best-first search over a min-priority frontier ordered by `f = g + h`.
///
/// Ties on `f` are broken by insertion order. A canonical key is finalized the
/// first time it is popped and is never expanded again, so repeated
/// arrangements reached along other move sequences are discarded on pop.
pub struct AStarSolver {
    initial: PuzzleState,
    heuristic: Heuristic,
    limits: SearchLimits,
    stats: SearchStats,
    solution: Vec<PuzzleState>,
    closed: HashMap<StateKey, u32>,
}

impl AStarSolver {
    pub fn new(initial: PuzzleState, heuristic: Heuristic) -> Self {
        AStarSolver {
            initial,
            heuristic,
            limits: SearchLimits::default(),
            stats: SearchStats::new(),
            solution: Vec::new(),
            closed: HashMap::new(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// f-value each finalized arrangement had when it was expanded.
    pub fn closed(&self) -> &HashMap<StateKey, u32> {
        &self.closed
    }

    fn reconstruct(&mut self, arena: Vec<Node>, goal: usize) {
        let mut slots: Vec<Option<Node>> = arena.into_iter().map(Some).collect();
        let mut cursor = Some(goal);
        while let Some(index) = cursor {
            let Some(node) = slots[index].take() else {
                break;
            };
            cursor = node.parent;
            self.solution.push(node.state);
        }
        self.solution.reverse();
    }
}

impl Solver for AStarSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::AStar
    }

    fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    fn solve(&mut self) -> Outcome {
        let started = Instant::now();
        self.stats = SearchStats::new();
        self.solution.clear();
        self.closed.clear();
        let mut budget = Budget::start(&self.limits);

        info!(
            event = "solve_start",
            algorithm = %Algorithm::AStar,
            heuristic = %self.heuristic,
            initial_estimate = self.initial.heuristic_value(self.heuristic),
        );

        let mut arena = vec![Node {
            state: self.initial.clone(),
            parent: None,
        }];
        let mut frontier = BinaryHeap::new();
        let mut sequence: u64 = 0;
        frontier.push(Reverse((
            self.initial.evaluation_value(self.heuristic),
            sequence,
            0usize,
        )));

        while let Some(Reverse((f, _, index))) = frontier.pop() {
            let key = arena[index].state.canonical_key();
            self.stats.record_visit(key.clone());
            if budget.charge() {
                warn!(
                    event = "search_aborted",
                    algorithm = %Algorithm::AStar,
                    nodes_expanded = self.stats.nodes_expanded,
                    frontier = frontier.len(),
                );
                return Outcome::NotFound;
            }

            if arena[index].state.is_goal(self.heuristic) {
                self.reconstruct(arena, index);
                info!(
                    event = "solve_end",
                    algorithm = %Algorithm::AStar,
                    cost = f,
                    nodes_expanded = self.stats.nodes_expanded,
                    unique_states = self.stats.unique_states(),
                    duration_ms = started.elapsed().as_millis() as u64,
                );
                return Outcome::Found(f);
            }

            if self.closed.contains_key(&key) {
                continue;
            }
            self.closed.insert(key, f);

            for next in arena[index].state.successors() {
                sequence += 1;
                frontier.push(Reverse((
                    next.evaluation_value(self.heuristic),
                    sequence,
                    arena.len(),
                )));
                arena.push(Node {
                    state: next,
                    parent: Some(index),
                });
                self.stats.nodes_expanded += 1;
            }
        }

        debug!(
            event = "frontier_exhausted",
            algorithm = %Algorithm::AStar,
            closed = self.closed.len(),
        );
        info!(
            event = "solve_end",
            algorithm = %Algorithm::AStar,
            cost = "NOT_FOUND",
            nodes_expanded = self.stats.nodes_expanded,
            duration_ms = started.elapsed().as_millis() as u64,
        );
        Outcome::NotFound
    }

    fn stats(&self) -> &SearchStats {
        &self.stats
    }

    fn solution(&self) -> &[PuzzleState] {
        &self.solution
    }
}
