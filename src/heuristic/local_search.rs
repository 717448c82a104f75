//! First-improvement local search over single-group relocations.
//!
//! # Algorithm
//!
//! A pass visits every assigned group once, in first-assignment order.
//! For a group sitting on rank `r > 0` (unranked counts as rank 10) it
//! tries its preferences of rank `0..r`, best first. A relocation is
//!
//! - **feasible** if both the origin and the target end up within
//!   `[min_occupancy, max_occupancy]`;
//! - **beneficial** if the preference delta plus the accounting delta
//!   over the affected slots is strictly negative.
//!
//! The first feasible and beneficial move is applied and the group's scan
//! ends. Passes repeat until one makes no move or the pass cap is hit.
//!
//! # Complexity
//! O(n * p) per pass, each move evaluated in O(1) over at most four slots.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

use crate::config::AssignConfig;
use crate::cost::window_accounting_cost;
use crate::models::{Instance, SlotId, Solution};

/// What a local-search run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSearchReport {
    /// Passes executed, including the final pass without moves.
    pub passes: usize,
    /// Relocations applied in total.
    pub moves: usize,
    /// Whether the last pass made no move (false if the pass cap stopped the run).
    pub converged: bool,
}

/// Runs passes until no move applies or `config.max_passes` is reached.
#[instrument(level = "debug", skip_all, fields(max_passes = config.max_passes))]
pub fn improve(
    solution: &mut Solution,
    instance: &Instance,
    config: &AssignConfig,
) -> LocalSearchReport {
    let mut report = LocalSearchReport::default();

    while report.passes < config.max_passes {
        let moves = improve_pass(solution, instance, config);
        report.passes += 1;
        report.moves += moves;

        if moves == 0 {
            report.converged = true;
            break;
        }

        let cost = config.costs.evaluate(solution, instance);
        info!(
            pass = report.passes,
            moves,
            cost = cost.total(),
            "Improved solution"
        );
    }

    debug!(
        passes = report.passes,
        moves = report.moves,
        converged = report.converged,
        "Local search finished"
    );
    report
}

/// Runs one pass and returns the number of moves applied.
pub fn improve_pass(solution: &mut Solution, instance: &Instance, config: &AssignConfig) -> usize {
    let visit: Vec<(usize, SlotId)> = solution.assigned().collect();
    let mut moves = 0;

    for (group, current) in visit {
        let rank = instance.group(group).rank_or_unranked(current);
        if rank == 0 {
            continue;
        }

        let target = instance
            .group(group)
            .preferences()
            .iter()
            .take(rank)
            .copied()
            .filter(|&slot| solution.slots().contains(slot))
            .find(|&slot| {
                is_feasible_move(solution, config, group, slot)
                    && move_delta(solution, instance, config, group, slot) < 0.0
            });

        if let Some(slot) = target {
            if solution.relocate(group, slot).is_ok() {
                moves += 1;
                trace!(group = solution.group_id(group), from = current, to = slot, "Applied move");
            }
        }
    }

    moves
}

/// Whether moving `group` to `target` keeps both slots within bounds.
pub fn is_feasible_move(
    solution: &Solution,
    config: &AssignConfig,
    group: usize,
    target: SlotId,
) -> bool {
    let Some(current) = solution.slot_of(group) else {
        return false;
    };
    if current == target {
        return false;
    }
    let size = solution.size_of(group);
    match (solution.occupancy(current), solution.occupancy(target)) {
        (Some(from), Some(to)) => {
            from >= size && config.within_bounds(from - size) && config.within_bounds(to + size)
        }
        _ => false,
    }
}

/// Change in total cost if `group` moved to `target`.
///
/// Only the slots whose accounting term depends on the two changed
/// occupancies are priced: the origin, the target and the slot before
/// each of them. Returns `0.0` for an unassigned group or an
/// out-of-range target.
pub fn move_delta(
    solution: &Solution,
    instance: &Instance,
    config: &AssignConfig,
    group: usize,
    target: SlotId,
) -> f64 {
    let Some(current) = solution.slot_of(group) else {
        return 0.0;
    };
    if current == target || !solution.slots().contains(target) {
        return 0.0;
    }

    let slots = solution.slots();
    let size = solution.size_of(group);
    let table = &config.costs.preference;
    let params = &config.costs.accounting;
    let member = instance.group(group);

    let mut window = vec![current, target];
    window.extend(slots.prev(current));
    window.extend(slots.prev(target));

    let before = window_accounting_cost(slots, &window, params, |s| solution.occupancy(s));
    let after = window_accounting_cost(slots, &window, params, |s| {
        solution.occupancy(s).map(|occ| {
            if s == current {
                occ - size
            } else if s == target {
                occ + size
            } else {
                occ
            }
        })
    });

    table.cost(member, target) - table.cost(member, current) + after - before
}
