use super::{Algorithm, Budget, Outcome, SearchLimits, SearchStats, Solver, INFINITY};
use crate::engine::PuzzleState;
use crate::heuristics::Heuristic;
use std::time::Instant;
use tracing::{info, warn};

/// Result of searching one subtree under an f-limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Backup {
    /// A goal was reached with this path cost.
    Found(u32),
    /// The subtree's best f-value exceeded the limit; its backed-up value.
    Exceeded(u32),
    Aborted,
}

/// A successor ranked by its (possibly backed-up) f-value.
///
/// `order` is the generation index, used to break ties deterministically.
struct Ranked {
    f: u32,
    order: usize,
    state: PuzzleState,
}

/// Recursive best-first search.
///
/// Explores in best-first order while holding only the current path and its
/// siblings. When a subtree is abandoned, its best f-value is backed up onto
/// the child that rooted it, so the child is re-ranked correctly against its
/// siblings without keeping the subtree in memory.
pub struct RbfsSolver {
    initial: PuzzleState,
    heuristic: Heuristic,
    limits: SearchLimits,
    stats: SearchStats,
    solution: Vec<PuzzleState>,
}

impl RbfsSolver {
    pub fn new(initial: PuzzleState, heuristic: Heuristic) -> Self {
        RbfsSolver {
            initial,
            heuristic,
            limits: SearchLimits::default(),
            stats: SearchStats::new(),
            solution: Vec::new(),
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    fn search(&mut self, node: &PuzzleState, f_limit: u32, budget: &mut Budget) -> Backup {
        self.stats.record_visit(node.canonical_key());
        if budget.charge() {
            return Backup::Aborted;
        }
        if node.is_goal(self.heuristic) {
            self.solution.push(node.clone());
            return Backup::Found(node.g());
        }

        let mut successors: Vec<Ranked> = node
            .successors()
            .into_iter()
            .enumerate()
            .map(|(order, state)| Ranked {
                f: state.evaluation_value(self.heuristic),
                order,
                state,
            })
            .collect();
        if successors.is_empty() {
            return Backup::Exceeded(INFINITY);
        }

        loop {
            successors.sort_by_key(|ranked| (ranked.f, ranked.order));
            let best = successors[0].f;
            if best > f_limit || best == INFINITY {
                return Backup::Exceeded(best);
            }
            let alternative = successors.get(1).map_or(INFINITY, |ranked| ranked.f);

            self.stats.nodes_expanded += 1;
            match self.search(&successors[0].state, f_limit.min(alternative), budget) {
                Backup::Found(cost) => {
                    self.solution.push(node.clone());
                    return Backup::Found(cost);
                }
                Backup::Exceeded(backed_up) => successors[0].f = backed_up,
                Backup::Aborted => return Backup::Aborted,
            }
        }
    }
}

impl Solver for RbfsSolver {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Rbfs
    }

    fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    fn solve(&mut self) -> Outcome {
        let started = Instant::now();
        self.stats = SearchStats::new();
        self.solution.clear();
        let mut budget = Budget::start(&self.limits);

        info!(
            event = "solve_start",
            algorithm = %Algorithm::Rbfs,
            heuristic = %self.heuristic,
            initial_estimate = self.initial.heuristic_value(self.heuristic),
        );

        let initial = self.initial.clone();
        let outcome = match self.search(&initial, INFINITY, &mut budget) {
            Backup::Found(cost) => {
                // Appended goal-first while unwinding.
                self.solution.reverse();
                Outcome::Found(cost)
            }
            Backup::Exceeded(_) => Outcome::NotFound,
            Backup::Aborted => {
                warn!(
                    event = "search_aborted",
                    algorithm = %Algorithm::Rbfs,
                    nodes_expanded = self.stats.nodes_expanded,
                );
                self.solution.clear();
                Outcome::NotFound
            }
        };

        info!(
            event = "solve_end",
            algorithm = %Algorithm::Rbfs,
            cost = %outcome,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::test_support::*;

    #[test]
    fn test_goal_board() {
        let mut solver = RbfsSolver::new(PuzzleState::goal(2).unwrap(), Heuristic::Manhattan);
        assert_eq!(solver.solve(), Outcome::Found(0));
        assert_eq!(solver.nodes_expanded(), 1);
        assert_eq!(solver.solution().len(), 1);
    }

    #[test]
    fn test_single_move_board() {
        let initial = PuzzleState::from_tiles(3, vec![1, 0, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut solver = RbfsSolver::new(initial.clone(), Heuristic::Manhattan);
        assert_eq!(solver.solve(), Outcome::Found(1));
        // The goal child ranks first, so only one recursive call is made.
        assert_eq!(solver.nodes_expanded(), 2);
        assert_eq!(solver.history().len(), 2);
        assert_eq!(solver.solution()[0].tiles(), initial.tiles());
        assert!(solver.solution()[1].is_goal(Heuristic::Manhattan));
    }

    #[test]
    fn test_solution_is_ordered_from_initial_to_goal() {
        for heuristic in Heuristic::ALL {
            let initial = eight_move_board();
            let mut solver = RbfsSolver::new(initial.clone(), heuristic);
            assert_eq!(solver.solve(), Outcome::Found(8));
            assert_eq!(solver.solution().len(), 9);
            assert_valid_path(solver.solution(), &initial, 8);
        }
    }

    #[test]
    fn test_backed_up_values_keep_search_optimal() {
        for seed in 20..26 {
            let initial = scrambled(3, 20, seed);
            let optimal = bfs_distance(&initial).unwrap();
            let mut solver = RbfsSolver::new(initial.clone(), Heuristic::Manhattan);
            assert_eq!(solver.solve(), Outcome::Found(optimal), "seed {}", seed);
            assert_valid_path(solver.solution(), &initial, optimal);
        }
    }

    #[test]
    fn test_unsolvable_board_stops_at_limit() {
        let initial = PuzzleState::from_permutation(2, vec![0, 2, 1, 3]).unwrap();
        let limits = SearchLimits::unbounded().with_max_expansions(2_000);
        let mut solver = RbfsSolver::new(initial, Heuristic::Hamming).with_limits(limits);
        assert_eq!(solver.solve(), Outcome::NotFound);
        assert!(solver.solution().is_empty());
        assert!(solver.nodes_expanded() <= 2_001);
    }
}
