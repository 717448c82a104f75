//! Cost model.
//!
//! Pure functions pricing a solution. The total cost is the sum of
//!
//! - **preference cost**: per group, depends on the rank of its assigned
//!   slot in its preference list ([`preference`]);
//! - **accounting cost**: per slot, depends on its occupancy and the
//!   occupancy of the following slot ([`accounting`]).
//!
//! The accounting term couples neighbouring slots, so moving one group
//! changes the terms of up to four slots: the origin, the target, and
//! the slot before each of them.

mod accounting;
mod preference;

pub use accounting::{
    accounting_cost, total_accounting_cost, window_accounting_cost, AccountingParams,
};
pub use preference::{
    preference_cost, total_preference_cost, PreferenceCostTable, RankCost, BUFFET_VALUE,
    HELICOPTER_VALUE,
};

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Solution};

/// Complete cost model: preference table plus accounting constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Preference cost per rank.
    pub preference: PreferenceCostTable,
    /// Accounting formula constants.
    pub accounting: AccountingParams,
}

impl CostModel {
    /// Prices a solution.
    pub fn evaluate(&self, solution: &Solution, instance: &Instance) -> CostBreakdown {
        CostBreakdown {
            preference: total_preference_cost(solution, instance, &self.preference),
            accounting: total_accounting_cost(solution, &self.accounting),
        }
    }
}

/// Cost of a solution split into its two components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Sum of preference costs.
    pub preference: f64,
    /// Sum of accounting costs.
    pub accounting: f64,
}

impl CostBreakdown {
    /// Preference plus accounting cost.
    #[inline]
    pub fn total(&self) -> f64 {
        self.preference + self.accounting
    }
}
