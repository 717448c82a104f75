//! Exact-solver collaboration.
//!
//! The crate carries no mathematical-programming backend. An exact solver
//! plugs in through the [`ExactSolver`] trait; [`refine`] hands it the
//! heuristic solution as a warm start and folds its answer into a
//! [`SolveOutcome`].
//!
//! # Warm start
//!
//! Only assignments present in the heuristic solution are passed on:
//! groups the heuristic could not place are left free for the solver.
//!
//! # Reference
//! - Bixby (2012), "A Brief History of Linear and Mixed-Integer Programming
//!   Computation"

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::AssignConfig;
use crate::cost::CostBreakdown;
use crate::heuristic::HeuristicOutcome;
use crate::models::{GroupId, Instance, SlotId, Solution};
use crate::validation::{check_feasibility, FeasibilityReport};

/// Failure reported by an exact-solver backend.
#[derive(Debug, Error)]
pub enum ExactError {
    #[error("Exact solver unavailable: {0}")]
    Unavailable(String),
    #[error("Exact solver failed: {0}")]
    Failed(String),
    #[error("Exact solver stopped without a solution")]
    NoSolution,
    #[error("Exact solver returned an infeasible solution ({violations} violations)")]
    InvalidSolution { violations: usize },
}

/// Answer of an exact solver.
#[derive(Debug, Clone)]
pub enum ExactOutcome {
    /// Proven optimal solution.
    Optimal(Solution),
    /// Feasible solution without an optimality proof (time or gap limit).
    Improved(Solution),
    /// The model has no feasible solution.
    ModelInfeasible,
}

/// A backend that solves the assignment problem exactly.
pub trait ExactSolver {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Solves `instance` under `config`, optionally seeded with a warm start.
    fn solve(
        &mut self,
        instance: &Instance,
        config: &AssignConfig,
        warm_start: Option<&Solution>,
    ) -> Result<ExactOutcome, ExactError>;
}

/// Final outcome of a solve, with or without an exact refinement.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    /// A feasible solution.
    Feasible {
        solution: Solution,
        cost: CostBreakdown,
        /// Whether an exact solver proved optimality.
        proven_optimal: bool,
    },
    /// The heuristic ended infeasible; a retry with another seed may help.
    HeuristicInfeasible {
        solution: Solution,
        report: FeasibilityReport,
    },
    /// An exact solver proved that no feasible solution exists.
    ModelInfeasible,
}

impl SolveOutcome {
    /// Outcome of a heuristic run alone.
    pub fn from_heuristic(outcome: HeuristicOutcome) -> Self {
        if outcome.is_feasible() {
            Self::Feasible {
                solution: outcome.solution,
                cost: outcome.cost,
                proven_optimal: false,
            }
        } else {
            Self::HeuristicInfeasible {
                solution: outcome.solution,
                report: outcome.report,
            }
        }
    }

    /// Whether a feasible solution is available.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible { .. })
    }

    /// The solution carried by this outcome, if any.
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Self::Feasible { solution, .. } | Self::HeuristicInfeasible { solution, .. } => {
                Some(solution)
            }
            Self::ModelInfeasible => None,
        }
    }
}

/// Group ID → slot pairs passed to an exact solver as start values.
pub fn warm_start_hints(solution: &Solution) -> BTreeMap<GroupId, SlotId> {
    solution.assignments()
}

/// Runs an exact solver seeded with a heuristic outcome.
///
/// Solutions coming back from the solver are re-checked; an infeasible one
/// is an [`ExactError::InvalidSolution`]. An unproven solution that costs
/// more than a feasible heuristic solution is discarded in favour of the
/// latter.
#[instrument(level = "debug", skip_all, fields(solver = solver.name()))]
pub fn refine<S: ExactSolver + ?Sized>(
    solver: &mut S,
    instance: &Instance,
    config: &AssignConfig,
    heuristic: HeuristicOutcome,
) -> Result<SolveOutcome, ExactError> {
    let outcome = solver.solve(instance, config, Some(&heuristic.solution))?;

    let (solution, proven_optimal) = match outcome {
        ExactOutcome::ModelInfeasible => {
            warn!(solver = solver.name(), "Model proven infeasible");
            return Ok(SolveOutcome::ModelInfeasible);
        }
        ExactOutcome::Optimal(solution) => (solution, true),
        ExactOutcome::Improved(solution) => (solution, false),
    };

    let report = check_feasibility(&solution, config);
    if !report.is_feasible() {
        return Err(ExactError::InvalidSolution {
            violations: report.violations.len(),
        });
    }

    let cost = config.costs.evaluate(&solution, instance);
    if !proven_optimal && heuristic.is_feasible() && heuristic.cost.total() < cost.total() {
        info!(
            exact = cost.total(),
            heuristic = heuristic.cost.total(),
            "Keeping heuristic solution"
        );
        return Ok(SolveOutcome::from_heuristic(heuristic));
    }

    info!(cost = cost.total(), proven_optimal, "Exact solver finished");
    Ok(SolveOutcome::Feasible {
        solution,
        cost,
        proven_optimal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::HeuristicSolver;
    use crate::models::{Group, SlotRange};

    /// Replays a fixed answer and records the warm start it was given.
    struct MockSolver {
        answer: Option<ExactOutcome>,
        seen_warm_start: Option<BTreeMap<GroupId, SlotId>>,
    }

    impl MockSolver {
        fn new(answer: Option<ExactOutcome>) -> Self {
            Self {
                answer,
                seen_warm_start: None,
            }
        }
    }

    impl ExactSolver for MockSolver {
        fn name(&self) -> &str {
            "mock"
        }

        fn solve(
            &mut self,
            _instance: &Instance,
            _config: &AssignConfig,
            warm_start: Option<&Solution>,
        ) -> Result<ExactOutcome, ExactError> {
            self.seen_warm_start = warm_start.map(warm_start_hints);
            self.answer.take().ok_or(ExactError::NoSolution)
        }
    }

    fn setup() -> (Instance, AssignConfig) {
        let instance = Instance::new(vec![
            Group::new(1, vec![1, 2], 5).unwrap(),
            Group::new(2, vec![1, 2], 5).unwrap(),
            Group::new(3, vec![2, 1], 4).unwrap(),
        ])
        .unwrap();
        let config = AssignConfig::default()
            .with_slots(SlotRange::new(1, 2).unwrap())
            .with_bounds(4, 10);
        (instance, config)
    }

    fn solution(instance: &Instance, config: &AssignConfig, slots: [SlotId; 3]) -> Solution {
        let mut solution = Solution::empty(instance, config.slots);
        for (group, slot) in slots.into_iter().enumerate() {
            solution.assign(group, slot).unwrap();
        }
        solution
    }

    #[test]
    fn test_refine_optimal() {
        let (instance, config) = setup();
        let heuristic = HeuristicSolver::new(config.clone()).solve(&instance);
        let warm = heuristic.solution.assignments();

        let exact = solution(&instance, &config, [1, 1, 2]);
        let mut solver = MockSolver::new(Some(ExactOutcome::Optimal(exact.clone())));
        let outcome = refine(&mut solver, &instance, &config, heuristic).unwrap();

        assert_eq!(solver.seen_warm_start, Some(warm));
        match outcome {
            SolveOutcome::Feasible {
                solution,
                proven_optimal,
                ..
            } => {
                assert!(proven_optimal);
                assert_eq!(solution, exact);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_refine_model_infeasible() {
        let (instance, config) = setup();
        let heuristic = HeuristicSolver::new(config.clone()).solve(&instance);
        let mut solver = MockSolver::new(Some(ExactOutcome::ModelInfeasible));

        let outcome = refine(&mut solver, &instance, &config, heuristic).unwrap();
        assert!(matches!(outcome, SolveOutcome::ModelInfeasible));
        assert!(outcome.solution().is_none());
    }

    #[test]
    fn test_refine_rejects_infeasible_answer() {
        let (instance, config) = setup();
        let heuristic = HeuristicSolver::new(config.clone()).solve(&instance);
        // Slot 1 holds 14 > 10, slot 2 is empty
        let bad = solution(&instance, &config, [1, 1, 1]);
        let mut solver = MockSolver::new(Some(ExactOutcome::Improved(bad)));

        let err = refine(&mut solver, &instance, &config, heuristic).unwrap_err();
        assert!(matches!(err, ExactError::InvalidSolution { violations: 2 }));
    }

    #[test]
    fn test_refine_keeps_cheaper_heuristic() {
        let (instance, config) = setup();
        let heuristic = HeuristicSolver::new(config.clone()).solve(&instance);
        let heuristic_cost = heuristic.cost.total();

        // Every group on its second choice
        let worse = solution(&instance, &config, [2, 2, 1]);
        let worse_cost = config.costs.evaluate(&worse, &instance).total();
        assert!(worse_cost > heuristic_cost);

        let mut solver = MockSolver::new(Some(ExactOutcome::Improved(worse)));
        match refine(&mut solver, &instance, &config, heuristic).unwrap() {
            SolveOutcome::Feasible { cost, proven_optimal, .. } => {
                assert!(!proven_optimal);
                assert!((cost.total() - heuristic_cost).abs() < 1e-9);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_refine_propagates_backend_error() {
        let (instance, config) = setup();
        let heuristic = HeuristicSolver::new(config.clone()).solve(&instance);
        let mut solver = MockSolver::new(None);
        assert!(matches!(
            refine(&mut solver, &instance, &config, heuristic),
            Err(ExactError::NoSolution)
        ));
    }

    #[test]
    fn test_heuristic_outcome_mapping() {
        let instance = Instance::new(vec![
            Group::new(1, vec![1], 6).unwrap(),
            Group::new(2, vec![1], 6).unwrap(),
        ])
        .unwrap();
        let config = AssignConfig::default()
            .with_slots(SlotRange::new(1, 1).unwrap())
            .with_bounds(1, 10);
        let heuristic = HeuristicSolver::new(config).solve(&instance);

        let outcome = SolveOutcome::from_heuristic(heuristic);
        assert!(!outcome.is_feasible());
        match outcome {
            SolveOutcome::HeuristicInfeasible { report, .. } => {
                assert_eq!(report.unassigned_groups(), vec![2]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
