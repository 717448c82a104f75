//! End-to-end heuristic pipeline.
//!
//! # Algorithm
//!
//! 1. Greedy construction, largest groups first.
//! 2. Capacity-floor repair.
//! 3. Two-phase placement of leftover groups.
//! 4. If the result is infeasible and retries remain, rebuild with the
//!    order of equal-size groups shuffled by a seeded RNG.
//! 5. Local search on the best construction.
//!
//! # Complexity
//! O(k * (n log n + n * p)) for k attempts, plus O(passes * n * p) for
//! local search.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, instrument, warn};

use super::greedy::{construct_greedy_in_order, size_order};
use super::local_search::{improve, LocalSearchReport};
use super::placement::place_unassigned;
use super::repair::repair_capacity_floor;
use crate::config::AssignConfig;
use crate::cost::CostBreakdown;
use crate::models::{Instance, Solution};
use crate::validation::{check_feasibility, FeasibilityReport};

/// Default seed for retry shuffles.
pub const DEFAULT_SEED: u64 = 42;

/// Result of a heuristic run.
///
/// Always carries the best-effort solution; `report` says whether it is
/// feasible.
#[derive(Debug, Clone)]
pub struct HeuristicOutcome {
    /// Final solution.
    pub solution: Solution,
    /// Cost of the final solution.
    pub cost: CostBreakdown,
    /// Feasibility verdict of the final solution.
    pub report: FeasibilityReport,
    /// Local-search statistics.
    pub local_search: LocalSearchReport,
    /// Construction attempts made (1 + retries used).
    pub attempts: usize,
}

impl HeuristicOutcome {
    /// Whether the final solution satisfies every constraint.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.report.is_feasible()
    }
}

/// Greedy, repair, placement and local search in one call.
///
/// # Example
///
/// ```
/// use u_assign::config::AssignConfig;
/// use u_assign::heuristic::HeuristicSolver;
/// use u_assign::models::{Group, Instance, SlotRange};
///
/// let instance = Instance::new(vec![
///     Group::new(1, vec![1, 2], 5).unwrap(),
///     Group::new(2, vec![1, 2], 5).unwrap(),
///     Group::new(3, vec![2, 1], 4).unwrap(),
/// ]).unwrap();
/// let config = AssignConfig::default()
///     .with_slots(SlotRange::new(1, 2).unwrap())
///     .with_bounds(4, 10);
///
/// let outcome = HeuristicSolver::new(config).solve(&instance);
/// assert!(outcome.is_feasible());
/// assert!(outcome.solution.is_complete());
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicSolver {
    config: AssignConfig,
    retries: usize,
    seed: u64,
}

impl HeuristicSolver {
    /// Creates a solver without retries.
    pub fn new(config: AssignConfig) -> Self {
        Self {
            config,
            retries: 0,
            seed: DEFAULT_SEED,
        }
    }

    /// Sets the number of reshuffled constructions tried after an
    /// infeasible one.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries;
        self
    }

    /// Sets the seed for retry shuffles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Configuration used by every stage.
    pub fn config(&self) -> &AssignConfig {
        &self.config
    }

    /// Runs construction, repair and placement for one group order.
    pub fn construct(&self, instance: &Instance, order: &[usize]) -> Solution {
        let built = construct_greedy_in_order(instance, &self.config, order);
        let mut solution = built.solution;
        repair_capacity_floor(&mut solution, instance, &self.config);
        place_unassigned(&mut solution, instance, &self.config);
        solution
    }

    /// Runs the full pipeline.
    #[instrument(level = "debug", skip_all, fields(groups = instance.len(), retries = self.retries))]
    pub fn solve(&self, instance: &Instance) -> HeuristicOutcome {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut order = size_order(instance);

        let mut best = self.construct(instance, &order);
        let mut best_report = check_feasibility(&best, &self.config);
        let mut attempts = 1;
        self.log_attempt(instance, &best, &best_report, attempts);

        while !best_report.is_feasible() && attempts <= self.retries {
            shuffle_ties(instance, &mut order, &mut rng);
            let candidate = self.construct(instance, &order);
            let report = check_feasibility(&candidate, &self.config);
            attempts += 1;
            self.log_attempt(instance, &candidate, &report, attempts);

            if report.violations.len() < best_report.violations.len() {
                best = candidate;
                best_report = report;
            }
        }

        let constructed = self.config.costs.evaluate(&best, instance);
        info!(
            cost = constructed.total(),
            preference = constructed.preference,
            accounting = constructed.accounting,
            feasible = best_report.is_feasible(),
            "Constructed initial solution"
        );

        let mut solution = best;
        let local_search = improve(&mut solution, instance, &self.config);
        let cost = self.config.costs.evaluate(&solution, instance);
        let report = check_feasibility(&solution, &self.config);

        if report.is_feasible() {
            info!(cost = cost.total(), passes = local_search.passes, "Heuristic finished");
        } else {
            warn!(
                violations = report.violations.len(),
                attempts, "Heuristic finished without a feasible solution"
            );
        }

        HeuristicOutcome {
            solution,
            cost,
            report,
            local_search,
            attempts,
        }
    }

    fn log_attempt(
        &self,
        instance: &Instance,
        solution: &Solution,
        report: &FeasibilityReport,
        attempt: usize,
    ) {
        debug!(
            attempt,
            violations = report.violations.len(),
            cost = self.config.costs.evaluate(solution, instance).total(),
            "Construction attempt"
        );
    }
}

/// Shuffles `order` then restores size-descending order, so only groups
/// of equal size change places.
fn shuffle_ties(instance: &Instance, order: &mut [usize], rng: &mut StdRng) {
    order.shuffle(rng);
    order.sort_by(|&a, &b| instance.group(b).size().cmp(&instance.group(a).size()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::total_preference_cost;
    use crate::models::{Group, SlotRange};
    use rand::Rng;

    fn config(last: u32, min: u32, max: u32) -> AssignConfig {
        AssignConfig::default()
            .with_slots(SlotRange::new(1, last).unwrap())
            .with_bounds(min, max)
    }

    fn random_instance(seed: u64, groups: u32, slots: u32) -> Instance {
        let mut rng = StdRng::seed_from_u64(seed);
        let all: Vec<u32> = (1..=slots).collect();
        let groups = (1..=groups)
            .map(|id| {
                let mut prefs = all.clone();
                prefs.shuffle(&mut rng);
                prefs.truncate(10.min(all.len()));
                Group::new(id, prefs, rng.random_range(2..=8)).unwrap()
            })
            .collect();
        Instance::new(groups).unwrap()
    }

    #[test]
    fn test_shuffle_ties_keeps_size_order() {
        let instance = random_instance(1, 50, 5);
        let mut order = size_order(&instance);
        let mut rng = StdRng::seed_from_u64(9);
        shuffle_ties(&instance, &mut order, &mut rng);

        let sizes: Vec<u32> = order.iter().map(|&g| instance.group(g).size()).collect();
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_solve_feasible_instance() {
        let instance = random_instance(2, 240, 6);
        let config = config(6, 125, 300);
        let outcome = HeuristicSolver::new(config.clone()).solve(&instance);

        assert!(outcome.is_feasible(), "{:?}", outcome.report);
        assert!(outcome.solution.is_complete());
        assert!(outcome.solution.is_consistent());
        for (_, occ) in outcome.solution.occupancies() {
            assert!(config.within_bounds(occ));
        }
        let recomputed = config.costs.evaluate(&outcome.solution, &instance);
        assert!((recomputed.total() - outcome.cost.total()).abs() < 1e-9);
        assert!(outcome.local_search.converged);
        assert_eq!(outcome.attempts, 1);
    }

    #[test]
    fn test_local_search_never_worsens_construction() {
        let instance = random_instance(3, 240, 6);
        let config = config(6, 125, 300);
        let solver = HeuristicSolver::new(config.clone());

        let constructed = solver.construct(&instance, &size_order(&instance));
        let before = config.costs.evaluate(&constructed, &instance).total();
        let outcome = solver.solve(&instance);
        assert!(outcome.cost.total() <= before);
    }

    #[test]
    fn test_infeasible_instance_reported_not_dropped() {
        // 3 groups of 6 cannot fit two slots capped at 10
        let instance = Instance::new(vec![
            Group::new(1, vec![1], 6).unwrap(),
            Group::new(2, vec![1], 6).unwrap(),
            Group::new(3, vec![2], 6).unwrap(),
        ])
        .unwrap();
        let outcome = HeuristicSolver::new(config(2, 1, 10))
            .with_retries(3)
            .solve(&instance);

        assert!(!outcome.is_feasible());
        assert_eq!(outcome.report.unassigned_groups().len(), 1);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.solution.assigned_count(), 2);
    }

    #[test]
    fn test_forced_placement_priced_as_unranked() {
        let instance = Instance::new(vec![
            Group::new(1, vec![1], 10).unwrap(),
            Group::new(2, vec![2], 10).unwrap(),
            Group::new(3, vec![1, 2], 3).unwrap(),
        ])
        .unwrap();
        let config = config(3, 0, 10);
        let outcome = HeuristicSolver::new(config.clone()).solve(&instance);

        assert!(outcome.is_feasible());
        assert_eq!(outcome.solution.slot_of(2), Some(3));
        let pref = total_preference_cost(&outcome.solution, &instance, &config.costs.preference);
        assert!((pref - config.costs.preference.unranked_cost(3)).abs() < 1e-9);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let instance = random_instance(5, 80, 5);
        let config = config(5, 20, 150);
        let a = HeuristicSolver::new(config.clone())
            .with_retries(2)
            .with_seed(7)
            .solve(&instance);
        let b = HeuristicSolver::new(config).with_retries(2).with_seed(7).solve(&instance);
        assert_eq!(a.solution, b.solution);
        assert_eq!(a.attempts, b.attempts);
    }
}
