//! Assignment/occupancy ledger.
//!
//! A [`Solution`] pairs the group → slot assignment with the derived
//! slot → occupancy tally. Both live in one value and are only mutated
//! together, so occupancy always equals the sum of the sizes of the
//! groups assigned to each slot.

use std::collections::BTreeMap;

use super::{GroupId, Instance, ModelError, SlotId, SlotRange};

/// A (possibly partial) assignment of groups to slots.
///
/// Groups are addressed by their position in the [`Instance`]. Groups
/// may be unassigned while the construction stages run; the ledger keeps
/// the order in which groups received their first assignment, and
/// [`Solution::assigned`] iterates in that order.
///
/// # Example
/// ```
/// use u_assign::models::{Group, Instance, Solution, SlotRange};
///
/// let instance = Instance::new(vec![
///     Group::new(1, vec![1, 2], 4).unwrap(),
///     Group::new(2, vec![2, 1], 3).unwrap(),
/// ]).unwrap();
/// let mut solution = Solution::empty(&instance, SlotRange::new(1, 2).unwrap());
///
/// solution.assign(0, 1).unwrap();
/// solution.assign(1, 1).unwrap();
/// assert_eq!(solution.occupancy(1), Some(7));
///
/// solution.relocate(1, 2).unwrap();
/// assert_eq!(solution.occupancy(1), Some(4));
/// assert_eq!(solution.occupancy(2), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    slots: SlotRange,
    ids: Vec<GroupId>,
    sizes: Vec<u32>,
    slot_of: Vec<Option<SlotId>>,
    occupancy: Vec<u32>,
    order: Vec<usize>,
}

impl Solution {
    /// Creates a ledger with every group unassigned and every slot empty.
    pub fn empty(instance: &Instance, slots: SlotRange) -> Self {
        Self {
            slots,
            ids: instance.groups().iter().map(|g| g.id()).collect(),
            sizes: instance.groups().iter().map(|g| g.size()).collect(),
            slot_of: vec![None; instance.len()],
            occupancy: vec![0; slots.len()],
            order: Vec::with_capacity(instance.len()),
        }
    }

    /// Rebuilds a ledger from a plain group ID → slot mapping.
    ///
    /// Groups absent from the mapping stay unassigned. Assignment order
    /// follows ascending group ID.
    pub fn from_assignments(
        instance: &Instance,
        slots: SlotRange,
        assignments: &BTreeMap<GroupId, SlotId>,
    ) -> Result<Self, ModelError> {
        let mut solution = Self::empty(instance, slots);
        for (&id, &slot) in assignments {
            let idx = instance
                .position(id)
                .ok_or(ModelError::UnknownGroupId(id))?;
            solution.assign(idx, slot)?;
        }
        Ok(solution)
    }

    /// Assigns an unassigned group to `slot`.
    pub fn assign(&mut self, group: usize, slot: SlotId) -> Result<(), ModelError> {
        let pos = self.slot_index(slot)?;
        let current = self
            .slot_of
            .get(group)
            .ok_or(ModelError::UnknownGroup(group))?;
        if current.is_some() {
            return Err(ModelError::AlreadyAssigned(self.ids[group]));
        }

        self.slot_of[group] = Some(slot);
        self.occupancy[pos] += self.sizes[group];
        self.order.push(group);
        Ok(())
    }

    /// Moves an assigned group to `slot`, returning its previous slot.
    pub fn relocate(&mut self, group: usize, slot: SlotId) -> Result<SlotId, ModelError> {
        let to = self.slot_index(slot)?;
        let from_slot = self
            .slot_of
            .get(group)
            .copied()
            .ok_or(ModelError::UnknownGroup(group))?
            .ok_or(ModelError::NotAssigned(self.ids[group]))?;
        let from = self.slot_index(from_slot)?;

        let size = self.sizes[group];
        self.occupancy[from] -= size;
        self.occupancy[to] += size;
        self.slot_of[group] = Some(slot);
        Ok(from_slot)
    }

    /// Slot range covered by this ledger.
    #[inline]
    pub fn slots(&self) -> SlotRange {
        self.slots
    }

    /// Current slot of a group.
    #[inline]
    pub fn slot_of(&self, group: usize) -> Option<SlotId> {
        self.slot_of.get(group).copied().flatten()
    }

    /// Size of a group.
    #[inline]
    pub fn size_of(&self, group: usize) -> u32 {
        self.sizes[group]
    }

    /// Occupancy of a slot, or `None` if the slot is out of range.
    #[inline]
    pub fn occupancy(&self, slot: SlotId) -> Option<u32> {
        self.slots.index_of(slot).map(|pos| self.occupancy[pos])
    }

    /// `(slot, occupancy)` pairs in ascending slot order.
    pub fn occupancies(&self) -> impl Iterator<Item = (SlotId, u32)> + '_ {
        self.slots.iter().zip(self.occupancy.iter().copied())
    }

    /// Whether `size` more members fit on `slot` without exceeding `max`.
    #[inline]
    pub fn has_room(&self, slot: SlotId, size: u32, max: u32) -> bool {
        self.occupancy(slot)
            .is_some_and(|occupancy| occupancy + size <= max)
    }

    /// Assigned groups as `(group, slot)` in first-assignment order.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, SlotId)> + '_ {
        self.order
            .iter()
            .filter_map(|&group| self.slot_of[group].map(|slot| (group, slot)))
    }

    /// Positions of unassigned groups, in instance order.
    pub fn unassigned(&self) -> Vec<usize> {
        self.slot_of
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_none())
            .map(|(group, _)| group)
            .collect()
    }

    /// Number of assigned groups.
    #[inline]
    pub fn assigned_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of groups (assigned or not).
    #[inline]
    pub fn group_count(&self) -> usize {
        self.slot_of.len()
    }

    /// Whether every group holds an assignment.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.assigned_count() == self.group_count()
    }

    /// Group ID at a position.
    #[inline]
    pub fn group_id(&self, group: usize) -> GroupId {
        self.ids[group]
    }

    /// Plain group ID → slot mapping of the assigned groups.
    pub fn assignments(&self) -> BTreeMap<GroupId, SlotId> {
        self.assigned()
            .map(|(group, slot)| (self.ids[group], slot))
            .collect()
    }

    fn slot_index(&self, slot: SlotId) -> Result<usize, ModelError> {
        self.slots
            .index_of(slot)
            .ok_or(ModelError::SlotOutOfRange(slot))
    }

    /// Recomputes occupancy from the assignment and compares.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        let mut expected = vec![0u32; self.slots.len()];
        for (group, slot) in self.slot_of.iter().enumerate() {
            if let Some(slot) = slot {
                match self.slots.index_of(*slot) {
                    Some(pos) => expected[pos] += self.sizes[group],
                    None => return false,
                }
            }
        }
        expected == self.occupancy
    }
}
