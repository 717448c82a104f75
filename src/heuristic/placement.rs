//! Two-phase placement of groups left over by construction and repair.
//!
//! Phase 1 retries each group's own preferences in rank order. Phase 2
//! force-places whatever remains on the first slot with spare capacity,
//! ignoring preferences and paying the unranked penalty. Both phases
//! visit groups largest first.

use tracing::{debug, instrument, warn};

use crate::config::AssignConfig;
use crate::models::{Instance, Solution};

/// Outcome of the placement stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementReport {
    /// Groups placed on one of their preferred slots.
    pub preferred: usize,
    /// Groups force-placed off their preferences.
    pub forced: usize,
    /// Groups that fit nowhere.
    pub unplaced: Vec<usize>,
}

/// Places every unassigned group that fits somewhere.
///
/// Groups still unassigned afterwards are returned in the report and
/// surface later as feasibility violations.
#[instrument(level = "debug", skip_all)]
pub fn place_unassigned(
    solution: &mut Solution,
    instance: &Instance,
    config: &AssignConfig,
) -> PlacementReport {
    let max = config.max_occupancy;
    let mut pending = solution.unassigned();
    pending.sort_by(|&a, &b| solution.size_of(b).cmp(&solution.size_of(a)));

    let mut report = PlacementReport::default();
    if pending.is_empty() {
        return report;
    }

    // Phase 1: own preferences, rank order
    let mut remaining = Vec::new();
    for group in pending {
        let size = solution.size_of(group);
        let target = instance
            .group(group)
            .preferences()
            .iter()
            .copied()
            .find(|&slot| solution.has_room(slot, size, max));

        match target {
            Some(slot) if solution.assign(group, slot).is_ok() => report.preferred += 1,
            _ => remaining.push(group),
        }
    }

    // Phase 2: first slot with room
    for group in remaining {
        let size = solution.size_of(group);
        let target = solution
            .slots()
            .iter()
            .find(|&slot| solution.has_room(slot, size, max));

        match target {
            Some(slot) if solution.assign(group, slot).is_ok() => {
                report.forced += 1;
                debug!(group = solution.group_id(group), slot, "Force-placed off preferences");
            }
            _ => {
                warn!(group = solution.group_id(group), size, "No slot can take group");
                report.unplaced.push(group);
            }
        }
    }

    debug!(
        preferred = report.preferred,
        forced = report.forced,
        unplaced = report.unplaced.len(),
        "Placement finished"
    );
    report
}
