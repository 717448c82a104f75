use thiserror::Error;

use super::{GroupId, SlotId};

/// Errors raised when building model values or mutating a [`Solution`](super::Solution).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("Group {group} has no preferred slots")]
    EmptyPreferences { group: GroupId },
    #[error("Group {group} lists {count} preferences, more than the supported maximum")]
    TooManyPreferences { group: GroupId, count: usize },
    #[error("Group {group} lists slot {slot} more than once")]
    DuplicatePreference { group: GroupId, slot: SlotId },
    #[error("Group {group} has no members")]
    EmptyGroup { group: GroupId },
    #[error("Duplicate group ID: {0}")]
    DuplicateGroupId(GroupId),
    #[error("Invalid slot range {first}..={last}")]
    InvalidSlotRange { first: SlotId, last: SlotId },
    #[error("Slot {0} is outside the slot range")]
    SlotOutOfRange(SlotId),
    #[error("Unknown group index {0}")]
    UnknownGroup(usize),
    #[error("Unknown group ID: {0}")]
    UnknownGroupId(GroupId),
    #[error("Group {0} is already assigned")]
    AlreadyAssigned(GroupId),
    #[error("Group {0} is not assigned")]
    NotAssigned(GroupId),
}
