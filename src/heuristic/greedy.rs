//! Greedy constructor.
//!
//! # Algorithm
//!
//! 1. Order groups by size, largest first (stable: input order on ties).
//! 2. For each group, order its in-range preferred slots by current
//!    occupancy (ascending), then by rank (ascending).
//! 3. Assign the group to the first of those slots that can take it
//!    without exceeding the capacity ceiling.
//! 4. Groups that fit nowhere are left unassigned for later stages.
//!
//! # Complexity
//! O(n log n + n * p log p) where n=groups, p=preferences per group.

use tracing::{debug, instrument};

use crate::config::AssignConfig;
use crate::models::{Instance, Solution};

/// Output of the greedy constructor.
#[derive(Debug, Clone)]
pub struct Construction {
    /// Partial solution.
    pub solution: Solution,
    /// Groups that could not be placed, in processing order.
    pub unassigned: Vec<usize>,
}

/// Group positions sorted by size, largest first, input order on ties.
pub fn size_order(instance: &Instance) -> Vec<usize> {
    let mut order: Vec<usize> = (0..instance.len()).collect();
    order.sort_by(|&a, &b| instance.group(b).size().cmp(&instance.group(a).size()));
    order
}

/// Builds an initial assignment, processing groups largest first.
///
/// # Example
/// ```
/// use u_assign::config::AssignConfig;
/// use u_assign::heuristic::construct_greedy;
/// use u_assign::models::{Group, Instance, SlotRange};
///
/// let instance = Instance::new(vec![
///     Group::new(1, vec![1, 2], 4).unwrap(),
///     Group::new(2, vec![1, 2], 4).unwrap(),
/// ]).unwrap();
/// let config = AssignConfig::default()
///     .with_slots(SlotRange::new(1, 2).unwrap())
///     .with_bounds(1, 10);
///
/// let built = construct_greedy(&instance, &config);
/// assert_eq!(built.solution.slot_of(0), Some(1));
/// assert_eq!(built.solution.slot_of(1), Some(2));
/// ```
pub fn construct_greedy(instance: &Instance, config: &AssignConfig) -> Construction {
    construct_greedy_in_order(instance, config, &size_order(instance))
}

/// Builds an initial assignment, processing groups in the given order.
#[instrument(level = "debug", skip_all, fields(groups = order.len()))]
pub fn construct_greedy_in_order(
    instance: &Instance,
    config: &AssignConfig,
    order: &[usize],
) -> Construction {
    let mut solution = Solution::empty(instance, config.slots);
    let mut unassigned = Vec::new();

    for &idx in order {
        let group = instance.group(idx);

        // (occupancy, rank, slot) for every in-range preference
        let mut candidates: Vec<(u32, usize, u32)> = group
            .preferences()
            .iter()
            .enumerate()
            .filter_map(|(rank, &slot)| solution.occupancy(slot).map(|occ| (occ, rank, slot)))
            .collect();
        candidates.sort_unstable();

        let target = candidates
            .iter()
            .find(|(occ, _, _)| occ + group.size() <= config.max_occupancy)
            .map(|&(_, _, slot)| slot);

        match target {
            Some(slot) if solution.assign(idx, slot).is_ok() => {}
            _ => unassigned.push(idx),
        }
    }

    debug!(
        assigned = solution.assigned_count(),
        unassigned = unassigned.len(),
        "Greedy construction finished"
    );

    Construction {
        solution,
        unassigned,
    }
}
