//! Group (family) model.
//!
//! A group is the unit of assignment: a number of members that must all
//! be placed on the same slot, together with a ranked list of the slots
//! the group would like to receive.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ModelError, SlotId};

/// Group identifier as it appears in input files.
pub type GroupId = u32;

/// Number of ranked preferences carried by every group in input files.
pub const PREFERENCE_COUNT: usize = 10;

/// Rank assigned to a slot that is not among a group's preferences.
pub const UNRANKED: usize = PREFERENCE_COUNT;

/// A group to be assigned to exactly one slot.
///
/// Immutable once built. Preferences are ranked by position: index 0 is
/// the most preferred slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GroupRecord", into = "GroupRecord")]
pub struct Group {
    id: GroupId,
    preferences: Vec<SlotId>,
    rank_of: HashMap<SlotId, usize>,
    size: u32,
}

/// Serialized shape of a [`Group`]; the reverse lookup is rebuilt on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroupRecord {
    id: GroupId,
    preferences: Vec<SlotId>,
    size: u32,
}

impl Group {
    /// Creates a group from its ranked preferences.
    ///
    /// Accepts between 1 and [`PREFERENCE_COUNT`] distinct slots and a
    /// positive size.
    ///
    /// # Example
    /// ```
    /// use u_assign::models::Group;
    ///
    /// let group = Group::new(7, vec![52, 38, 12], 4).unwrap();
    /// assert_eq!(group.rank(38), Some(1));
    /// assert_eq!(group.rank(99), None);
    /// ```
    pub fn new(id: GroupId, preferences: Vec<SlotId>, size: u32) -> Result<Self, ModelError> {
        if preferences.is_empty() {
            return Err(ModelError::EmptyPreferences { group: id });
        }
        if preferences.len() > PREFERENCE_COUNT {
            return Err(ModelError::TooManyPreferences {
                group: id,
                count: preferences.len(),
            });
        }
        if size == 0 {
            return Err(ModelError::EmptyGroup { group: id });
        }

        let mut rank_of = HashMap::with_capacity(preferences.len());
        for (rank, &slot) in preferences.iter().enumerate() {
            if rank_of.insert(slot, rank).is_some() {
                return Err(ModelError::DuplicatePreference { group: id, slot });
            }
        }

        Ok(Self {
            id,
            preferences,
            rank_of,
            size,
        })
    }

    /// Group identifier.
    #[inline]
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Number of members.
    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Preferred slots, most preferred first.
    #[inline]
    pub fn preferences(&self) -> &[SlotId] {
        &self.preferences
    }

    /// Rank of `slot` in this group's preferences, if listed.
    #[inline]
    pub fn rank(&self, slot: SlotId) -> Option<usize> {
        self.rank_of.get(&slot).copied()
    }

    /// Rank of `slot`, with unlisted slots mapped to [`UNRANKED`].
    #[inline]
    pub fn rank_or_unranked(&self, slot: SlotId) -> usize {
        self.rank(slot).unwrap_or(UNRANKED)
    }

    /// Whether `slot` is among this group's preferences.
    #[inline]
    pub fn prefers(&self, slot: SlotId) -> bool {
        self.rank_of.contains_key(&slot)
    }
}

impl TryFrom<GroupRecord> for Group {
    type Error = ModelError;

    fn try_from(record: GroupRecord) -> Result<Self, Self::Error> {
        Group::new(record.id, record.preferences, record.size)
    }
}

impl From<Group> for GroupRecord {
    fn from(group: Group) -> Self {
        Self {
            id: group.id,
            preferences: group.preferences,
            size: group.size,
        }
    }
}
