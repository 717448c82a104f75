//! Feasibility violations of a solution.

use serde::{Deserialize, Serialize};

use super::{GroupId, SlotId};

/// A feasibility violation found in a solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Human-readable description.
    pub message: String,
}

/// Classification of feasibility violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Slot occupancy below the capacity floor.
    BelowMinOccupancy { slot: SlotId, occupancy: u32 },
    /// Slot occupancy above the capacity ceiling.
    AboveMaxOccupancy { slot: SlotId, occupancy: u32 },
    /// Group without an assignment.
    Unassigned { group: GroupId },
}

impl Violation {
    /// Creates a capacity-floor violation.
    pub fn below_min(slot: SlotId, occupancy: u32, min: u32) -> Self {
        Self {
            violation_type: ViolationType::BelowMinOccupancy { slot, occupancy },
            message: format!("Slot {slot} holds {occupancy} members, minimum is {min}"),
        }
    }

    /// Creates a capacity-ceiling violation.
    pub fn above_max(slot: SlotId, occupancy: u32, max: u32) -> Self {
        Self {
            violation_type: ViolationType::AboveMaxOccupancy { slot, occupancy },
            message: format!("Slot {slot} holds {occupancy} members, maximum is {max}"),
        }
    }

    /// Creates an unassigned-group violation.
    pub fn unassigned(group: GroupId) -> Self {
        Self {
            violation_type: ViolationType::Unassigned { group },
            message: format!("Group {group} has no assigned slot"),
        }
    }

    /// Whether this violation concerns slot capacity.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self.violation_type,
            ViolationType::BelowMinOccupancy { .. } | ViolationType::AboveMaxOccupancy { .. }
        )
    }
}
