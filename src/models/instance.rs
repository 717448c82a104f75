//! Problem instance: the full group set and its lookup indices.

use std::collections::{BTreeMap, HashMap};

use super::{Group, GroupId, ModelError, SlotId};

/// An assignment problem instance.
///
/// Holds the groups in input order together with two indices built once
/// at load time: group ID → position, and slot → groups that list the
/// slot among their preferences (the slot's eligible population).
///
/// Groups are referred to by their position (`usize`) everywhere in the
/// heuristic; IDs are only used at the I/O boundary.
#[derive(Debug, Clone)]
pub struct Instance {
    groups: Vec<Group>,
    index: HashMap<GroupId, usize>,
    eligible: BTreeMap<SlotId, Vec<usize>>,
}

impl Instance {
    /// Builds an instance, rejecting duplicate group IDs.
    pub fn new(groups: Vec<Group>) -> Result<Self, ModelError> {
        let mut index = HashMap::with_capacity(groups.len());
        let mut eligible: BTreeMap<SlotId, Vec<usize>> = BTreeMap::new();

        for (idx, group) in groups.iter().enumerate() {
            if index.insert(group.id(), idx).is_some() {
                return Err(ModelError::DuplicateGroupId(group.id()));
            }
            for &slot in group.preferences() {
                eligible.entry(slot).or_default().push(idx);
            }
        }

        Ok(Self {
            groups,
            index,
            eligible,
        })
    }

    /// All groups in input order.
    #[inline]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Group at position `idx`.
    #[inline]
    pub fn group(&self, idx: usize) -> &Group {
        &self.groups[idx]
    }

    /// Number of groups.
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the instance has no groups.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Position of the group with the given ID.
    #[inline]
    pub fn position(&self, id: GroupId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    /// Groups that list `slot` among their preferences, in input order.
    pub fn eligible_for(&self, slot: SlotId) -> &[usize] {
        self.eligible.get(&slot).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of members across all groups.
    pub fn total_members(&self) -> u64 {
        self.groups.iter().map(|g| u64::from(g.size())).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: GroupId, prefs: &[SlotId], size: u32) -> Group {
        Group::new(id, prefs.to_vec(), size).unwrap()
    }

    #[test]
    fn test_instance_indices() {
        let instance = Instance::new(vec![
            group(10, &[1, 2], 3),
            group(20, &[2, 3], 4),
            group(30, &[3, 1], 5),
        ])
        .unwrap();

        assert_eq!(instance.len(), 3);
        assert_eq!(instance.position(20), Some(1));
        assert_eq!(instance.position(99), None);
        assert_eq!(instance.eligible_for(1), &[0, 2]);
        assert_eq!(instance.eligible_for(2), &[0, 1]);
        assert!(instance.eligible_for(7).is_empty());
        assert_eq!(instance.total_members(), 12);
    }

    #[test]
    fn test_instance_duplicate_id() {
        let err = Instance::new(vec![group(1, &[1], 2), group(1, &[2], 2)]).unwrap_err();
        assert_eq!(err, ModelError::DuplicateGroupId(1));
    }
}
