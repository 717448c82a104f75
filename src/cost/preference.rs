//! Preference cost: the penalty for giving a group a slot other than
//! its first choice.
//!
//! Each rank carries a flat gift plus per-member shares of a buffet
//! voucher and a helicopter ticket. A slot outside the group's list is
//! charged the full value of both on top of the largest flat gift.

use serde::{Deserialize, Serialize};

use crate::models::{Group, Instance, SlotId, Solution, UNRANKED};

/// Value of one buffet voucher per member.
pub const BUFFET_VALUE: f64 = 36.0;

/// Value of one helicopter ride ticket per member.
pub const HELICOPTER_VALUE: f64 = 398.0;

/// Cost components for one preference rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankCost {
    /// Flat amount charged regardless of group size.
    pub flat: f64,
    /// Fraction of a buffet voucher per member.
    pub buffet_share: f64,
    /// Fraction of a helicopter ticket per member.
    pub helicopter_share: f64,
}

impl RankCost {
    /// Creates a rank cost.
    pub const fn new(flat: f64, buffet_share: f64, helicopter_share: f64) -> Self {
        Self {
            flat,
            buffet_share,
            helicopter_share,
        }
    }
}

/// Rank-indexed preference cost table.
///
/// `ranks[k]` prices rank `k`; ranks beyond the table and slots outside
/// the group's preference list are priced with `unranked`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceCostTable {
    /// Cost per rank, most preferred first.
    pub ranks: Vec<RankCost>,
    /// Cost of a slot the group did not list.
    pub unranked: RankCost,
    /// Per-member buffet voucher value.
    pub buffet_value: f64,
    /// Per-member helicopter ticket value.
    pub helicopter_value: f64,
}

impl Default for PreferenceCostTable {
    fn default() -> Self {
        Self {
            ranks: vec![
                RankCost::new(0.0, 0.0, 0.0),
                RankCost::new(50.0, 0.0, 0.0),
                RankCost::new(50.0, 0.25, 0.0),
                RankCost::new(100.0, 0.25, 0.0),
                RankCost::new(200.0, 0.25, 0.0),
                RankCost::new(200.0, 0.5, 0.0),
                RankCost::new(300.0, 0.5, 0.0),
                RankCost::new(300.0, 1.0, 0.0),
                RankCost::new(400.0, 0.5, 0.0),
                RankCost::new(500.0, 0.5, 0.5),
            ],
            unranked: RankCost::new(500.0, 1.0, 1.0),
            buffet_value: BUFFET_VALUE,
            helicopter_value: HELICOPTER_VALUE,
        }
    }
}

impl PreferenceCostTable {
    /// Cost of a group of `size` members receiving its rank-`rank` slot.
    ///
    /// `rank >= ranks.len()` (including [`UNRANKED`]) is priced as unranked.
    pub fn rank_cost(&self, rank: usize, size: u32) -> f64 {
        let entry = self.ranks.get(rank).unwrap_or(&self.unranked);
        let members = f64::from(size);
        entry.flat
            + entry.buffet_share * self.buffet_value * members
            + entry.helicopter_share * self.helicopter_value * members
    }

    /// Cost of the unranked (off-preference) penalty for `size` members.
    pub fn unranked_cost(&self, size: u32) -> f64 {
        self.rank_cost(UNRANKED.max(self.ranks.len()), size)
    }

    /// Cost of assigning `group` to `slot`.
    #[inline]
    pub fn cost(&self, group: &Group, slot: SlotId) -> f64 {
        self.rank_cost(group.rank_or_unranked(slot), group.size())
    }
}

/// Preference cost of assigning `group` to `slot`.
///
/// # Example
/// ```
/// use u_assign::cost::{preference_cost, PreferenceCostTable};
/// use u_assign::models::Group;
///
/// let table = PreferenceCostTable::default();
/// let group = Group::new(1, vec![10, 20, 30], 4).unwrap();
/// assert_eq!(preference_cost(10, &group, &table), 0.0);
/// assert_eq!(preference_cost(20, &group, &table), 50.0);
/// // 50 + 0.25 * 36 * 4
/// assert_eq!(preference_cost(30, &group, &table), 86.0);
/// ```
#[inline]
pub fn preference_cost(slot: SlotId, group: &Group, table: &PreferenceCostTable) -> f64 {
    table.cost(group, slot)
}

/// Sum of preference costs over all assigned groups.
pub fn total_preference_cost(
    solution: &Solution,
    instance: &Instance,
    table: &PreferenceCostTable,
) -> f64 {
    solution
        .assigned()
        .map(|(group, slot)| table.cost(instance.group(group), slot))
        .sum()
}
