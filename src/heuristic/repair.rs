//! Capacity-floor repair.
//!
//! Raises every slot that the constructor left below the capacity floor
//! by pulling in groups that listed the slot among their preferences.
//!
//! # Algorithm
//!
//! 1. Record the deficient slots once, in ascending slot order.
//! 2. For each deficient slot, collect the groups of its eligible
//!    population that sit elsewhere and whose origin would stay at or
//!    above the floor without them; sort them by size, largest first.
//! 3. Move them in one at a time until the slot reaches the floor.
//!
//! Donor conditions are re-checked before each move because an earlier
//! move may have drained the same origin. A move that would push the
//! deficient slot over the ceiling is skipped. There is no backtracking
//! across slots.

use tracing::{debug, instrument, trace};

use crate::config::AssignConfig;
use crate::models::{Instance, SlotId, Solution};

/// Summary of a repair pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Slots below the floor at entry.
    pub deficient: Vec<SlotId>,
    /// Groups moved.
    pub moves: usize,
    /// Slots still below the floor afterwards.
    pub unresolved: Vec<SlotId>,
}

/// Lifts slots below `min_occupancy` using preference-eligible donors.
#[instrument(level = "debug", skip_all)]
pub fn repair_capacity_floor(
    solution: &mut Solution,
    instance: &Instance,
    config: &AssignConfig,
) -> RepairReport {
    let min = config.min_occupancy;
    let max = config.max_occupancy;

    let deficient: Vec<SlotId> = solution
        .occupancies()
        .filter(|&(_, occ)| occ < min)
        .map(|(slot, _)| slot)
        .collect();

    let mut moves = 0;
    let mut unresolved = Vec::new();

    for &slot in &deficient {
        let mut candidates: Vec<usize> = instance
            .eligible_for(slot)
            .iter()
            .copied()
            .filter(|&group| is_donor(solution, group, slot, min))
            .collect();
        candidates.sort_by(|&a, &b| solution.size_of(b).cmp(&solution.size_of(a)));

        for group in candidates {
            if solution.occupancy(slot).is_some_and(|occ| occ >= min) {
                break;
            }
            if !is_donor(solution, group, slot, min) || !solution.has_room(slot, solution.size_of(group), max) {
                continue;
            }
            if let Ok(origin) = solution.relocate(group, slot) {
                moves += 1;
                trace!(group = solution.group_id(group), from = origin, to = slot, "Repair move");
            }
        }

        if solution.occupancy(slot).is_some_and(|occ| occ < min) {
            unresolved.push(slot);
        }
    }

    debug!(
        deficient = deficient.len(),
        moves,
        unresolved = unresolved.len(),
        "Capacity-floor repair finished"
    );

    RepairReport {
        deficient,
        moves,
        unresolved,
    }
}

/// Whether `group` may leave its current slot for `target`.
fn is_donor(solution: &Solution, group: usize, target: SlotId, min: u32) -> bool {
    let Some(origin) = solution.slot_of(group) else {
        return false;
    };
    if origin == target {
        return false;
    }
    solution
        .occupancy(origin)
        .is_some_and(|occ| occ >= min + solution.size_of(group))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Group, SlotRange};

    fn config(last: u32, min: u32, max: u32) -> AssignConfig {
        AssignConfig::default()
            .with_slots(SlotRange::new(1, last).unwrap())
            .with_bounds(min, max)
    }

    #[test]
    fn test_repair_moves_just_enough() {
        // Slot 1 holds 4+3+2 = 9, slot 2 is empty; floor 4
        let instance = Instance::new(vec![
            Group::new(1, vec![1, 2], 4).unwrap(),
            Group::new(2, vec![1, 2], 3).unwrap(),
            Group::new(3, vec![1, 2], 2).unwrap(),
        ])
        .unwrap();
        let config = config(2, 4, 20);
        let mut solution = Solution::empty(&instance, config.slots);
        for g in 0..3 {
            solution.assign(g, 1).unwrap();
        }

        let report = repair_capacity_floor(&mut solution, &instance, &config);

        assert_eq!(report.deficient, vec![2]);
        // Largest donor (4) would leave slot 1 at 5 >= 4 → moved, slot 2 reaches 4
        assert_eq!(report.moves, 1);
        assert_eq!(solution.slot_of(0), Some(2));
        assert_eq!(solution.occupancy(1), Some(5));
        assert_eq!(solution.occupancy(2), Some(4));
        assert!(report.unresolved.is_empty());
        assert!(solution.is_consistent());
    }

    #[test]
    fn test_repair_never_drains_donor_below_floor() {
        // Slot 1 holds 5+2 = 7, floor 5: only the 2-member group may leave
        let instance = Instance::new(vec![
            Group::new(1, vec![1, 2], 5).unwrap(),
            Group::new(2, vec![1, 2], 2).unwrap(),
        ])
        .unwrap();
        let config = config(2, 5, 20);
        let mut solution = Solution::empty(&instance, config.slots);
        solution.assign(0, 1).unwrap();
        solution.assign(1, 1).unwrap();

        let report = repair_capacity_floor(&mut solution, &instance, &config);

        assert_eq!(solution.slot_of(0), Some(1));
        assert_eq!(solution.slot_of(1), Some(2));
        assert_eq!(solution.occupancy(1), Some(5));
        assert_eq!(report.unresolved, vec![2]);
    }

    #[test]
    fn test_repair_rechecks_shared_origin() {
        // Slot 1: 3+3+3 = 9, floor 5. Both slots 2 and 3 want donors;
        // only one group may leave slot 1 in total.
        let instance = Instance::new(vec![
            Group::new(1, vec![1, 2, 3], 3).unwrap(),
            Group::new(2, vec![1, 2, 3], 3).unwrap(),
            Group::new(3, vec![1, 2, 3], 3).unwrap(),
        ])
        .unwrap();
        let config = config(3, 5, 20);
        let mut solution = Solution::empty(&instance, config.slots);
        for g in 0..3 {
            solution.assign(g, 1).unwrap();
        }

        repair_capacity_floor(&mut solution, &instance, &config);

        assert!(solution.occupancy(1).unwrap() >= 5);
        assert!(solution.is_consistent());
    }

    #[test]
    fn test_repair_ignores_unassigned_and_ineligible() {
        let instance = Instance::new(vec![
            Group::new(1, vec![1], 6).unwrap(),    // never lists slot 2
            Group::new(2, vec![2, 1], 3).unwrap(), // unassigned
        ])
        .unwrap();
        let config = config(2, 2, 20);
        let mut solution = Solution::empty(&instance, config.slots);
        solution.assign(0, 1).unwrap();

        let report = repair_capacity_floor(&mut solution, &instance, &config);
        assert_eq!(report.moves, 0);
        assert_eq!(report.unresolved, vec![2]);
        assert_eq!(solution.slot_of(1), None);
    }

    #[test]
    fn test_repair_respects_ceiling() {
        let instance = Instance::new(vec![
            Group::new(1, vec![1, 2], 7).unwrap(),
            Group::new(2, vec![1, 2], 6).unwrap(),
            Group::new(3, vec![2], 4).unwrap(),
        ])
        .unwrap();
        let config = config(2, 5, 10);
        let mut solution = Solution::empty(&instance, config.slots);
        solution.assign(0, 1).unwrap();
        solution.assign(1, 1).unwrap();
        solution.assign(2, 2).unwrap();

        // Slot 2 holds 4: the 7-member donor would overflow it, the 6-member one fits
        let report = repair_capacity_floor(&mut solution, &instance, &config);
        assert_eq!(report.moves, 1);
        assert_eq!(solution.slot_of(0), Some(1));
        assert_eq!(solution.slot_of(1), Some(2));
        assert_eq!(solution.occupancy(2), Some(10));
    }
}
