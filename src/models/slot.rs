//! Slot (day) identifiers and the bounded slot range.

use serde::{Deserialize, Serialize};

use super::ModelError;

/// Slot identifier (e.g., days before an event).
pub type SlotId = u32;

/// Inclusive, contiguous range of slot identifiers.
///
/// Slot `d + 1` is the "next" slot of `d` for accounting purposes; the
/// last slot has no successor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlotRangeRecord")]
pub struct SlotRange {
    first: SlotId,
    last: SlotId,
}

#[derive(Deserialize)]
struct SlotRangeRecord {
    first: SlotId,
    last: SlotId,
}

impl SlotRange {
    /// Creates the range `first..=last`.
    pub fn new(first: SlotId, last: SlotId) -> Result<Self, ModelError> {
        if first > last {
            return Err(ModelError::InvalidSlotRange { first, last });
        }
        Ok(Self { first, last })
    }

    /// First slot.
    #[inline]
    pub fn first(&self) -> SlotId {
        self.first
    }

    /// Last slot.
    #[inline]
    pub fn last(&self) -> SlotId {
        self.last
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }

    /// Always false; a range holds at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `slot` lies in the range.
    #[inline]
    pub fn contains(&self, slot: SlotId) -> bool {
        (self.first..=self.last).contains(&slot)
    }

    /// Zero-based position of `slot`, if in range.
    #[inline]
    pub fn index_of(&self, slot: SlotId) -> Option<usize> {
        self.contains(slot).then(|| (slot - self.first) as usize)
    }

    /// Slot following `slot`, if in range.
    #[inline]
    pub fn next(&self, slot: SlotId) -> Option<SlotId> {
        (slot < self.last).then(|| slot + 1)
    }

    /// Slot preceding `slot`, if in range.
    #[inline]
    pub fn prev(&self, slot: SlotId) -> Option<SlotId> {
        (slot > self.first && slot <= self.last).then(|| slot - 1)
    }

    /// Slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = SlotId> {
        self.first..=self.last
    }
}

impl Default for SlotRange {
    /// The reference domain: 100 days, numbered 1 through 100.
    fn default() -> Self {
        Self { first: 1, last: 100 }
    }
}

impl TryFrom<SlotRangeRecord> for SlotRange {
    type Error = ModelError;

    fn try_from(record: SlotRangeRecord) -> Result<Self, Self::Error> {
        SlotRange::new(record.first, record.last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_range() {
        let range = SlotRange::default();
        assert_eq!(range.first(), 1);
        assert_eq!(range.last(), 100);
        assert_eq!(range.len(), 100);
        assert_eq!(range.iter().count(), 100);
    }

    #[test]
    fn test_neighbours() {
        let range = SlotRange::new(1, 3).unwrap();
        assert_eq!(range.prev(1), None);
        assert_eq!(range.prev(2), Some(1));
        assert_eq!(range.next(2), Some(3));
        assert_eq!(range.next(3), None);
        assert_eq!(range.index_of(3), Some(2));
        assert_eq!(range.index_of(4), None);
        assert!(!range.contains(0));
    }

    #[test]
    fn test_invalid_range() {
        assert_eq!(
            SlotRange::new(5, 4).unwrap_err(),
            ModelError::InvalidSlotRange { first: 5, last: 4 }
        );
        assert!(serde_json::from_str::<SlotRange>(r#"{"first":5,"last":4}"#).is_err());
    }
}
