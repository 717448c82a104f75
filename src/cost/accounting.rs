//! Accounting cost: a non-linear penalty on each slot's occupancy and on
//! the change in occupancy from one slot to the next.
//!
//! ```text
//! cost(d) = (N_d - 125) / 400 * N_d ^ (0.5 + |N_d - N_{d+1}| / 50)
//! ```
//!
//! The last slot has no successor and uses `N_{d+1} = N_d`.

use serde::{Deserialize, Serialize};

use crate::models::{SlotId, SlotRange, Solution};

/// Constants of the accounting cost formula.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountingParams {
    /// Occupancy at which the cost changes sign.
    pub pivot: f64,
    /// Divisor applied to `occupancy - pivot`.
    pub divisor: f64,
    /// Exponent applied when consecutive occupancies are equal.
    pub base_exponent: f64,
    /// Occupancy difference that adds one to the exponent.
    pub delta_scale: f64,
}

impl Default for AccountingParams {
    fn default() -> Self {
        Self {
            pivot: 125.0,
            divisor: 400.0,
            base_exponent: 0.5,
            delta_scale: 50.0,
        }
    }
}

impl AccountingParams {
    /// Accounting cost of one slot given its own and the next slot's occupancy.
    pub fn cost(&self, today: u32, tomorrow: u32) -> f64 {
        let today = f64::from(today);
        let tomorrow = f64::from(tomorrow);
        let exponent = self.base_exponent + (today - tomorrow).abs() / self.delta_scale;
        (today - self.pivot) / self.divisor * today.powf(exponent)
    }

    /// Accounting term of `slot` under an arbitrary occupancy lookup.
    ///
    /// Returns `None` if `slot` or its successor has no occupancy.
    pub fn slot_cost<F>(&self, slots: SlotRange, slot: SlotId, occupancy: F) -> Option<f64>
    where
        F: Fn(SlotId) -> Option<u32>,
    {
        let today = occupancy(slot)?;
        let tomorrow = match slots.next(slot) {
            Some(next) => occupancy(next)?,
            None => today,
        };
        Some(self.cost(today, tomorrow))
    }
}

/// Accounting cost with the reference constants.
///
/// # Example
/// ```
/// use u_assign::cost::accounting_cost;
///
/// // Equal occupancies: (o - 125) / 400 * o^0.5
/// assert!((accounting_cost(225, 225) - 0.25 * 15.0).abs() < 1e-9);
/// assert_eq!(accounting_cost(125, 300), 0.0);
/// ```
#[inline]
pub fn accounting_cost(today: u32, tomorrow: u32) -> f64 {
    AccountingParams::default().cost(today, tomorrow)
}

/// Sum of accounting terms over every slot, in ascending slot order.
pub fn total_accounting_cost(solution: &Solution, params: &AccountingParams) -> f64 {
    let slots = solution.slots();
    slots
        .iter()
        .filter_map(|slot| params.slot_cost(slots, slot, |s| solution.occupancy(s)))
        .sum()
}

/// Sum of the accounting terms of the given slots only.
///
/// Slots are deduplicated and summed in ascending order; slots outside
/// the range contribute nothing.
pub fn window_accounting_cost<F>(
    slots: SlotRange,
    window: &[SlotId],
    params: &AccountingParams,
    occupancy: F,
) -> f64
where
    F: Fn(SlotId) -> Option<u32>,
{
    let mut window = window.to_vec();
    window.sort_unstable();
    window.dedup();
    window
        .into_iter()
        .filter_map(|slot| params.slot_cost(slots, slot, &occupancy))
        .sum()
}
