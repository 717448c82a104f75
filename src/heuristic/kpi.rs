//! Assignment quality metrics (KPIs).
//!
//! Computes summary indicators from a solution and its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Cost breakdown | Preference and accounting cost |
//! | Rank histogram | Groups per received rank (last bucket = unranked) |
//! | Members by rank | Members per received rank |
//! | Occupancy by slot | Members per slot, split by rank |
//! | Occupancy range | Smallest and largest slot occupancy |
//! | Average rank | Mean received rank weighted by group |

use serde::{Deserialize, Serialize};

use crate::config::AssignConfig;
use crate::cost::CostBreakdown;
use crate::models::{Instance, SlotId, Solution, UNRANKED};

/// Number of rank buckets: ranks `0..UNRANKED` plus the unranked bucket.
pub const RANK_BUCKETS: usize = UNRANKED + 1;

/// Occupancy of one slot, split by the rank its groups received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotOccupancy {
    /// Slot.
    pub slot: SlotId,
    /// Total members.
    pub total: u32,
    /// Members per rank bucket.
    pub by_rank: Vec<u32>,
}

/// Assignment performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentKpi {
    /// Cost of the solution.
    pub cost: CostBreakdown,
    /// Groups per rank bucket.
    pub rank_histogram: Vec<usize>,
    /// Members per rank bucket.
    pub members_by_rank: Vec<u64>,
    /// Per-slot occupancy in ascending slot order.
    pub occupancy: Vec<SlotOccupancy>,
    /// Smallest slot occupancy.
    pub min_occupancy: u32,
    /// Largest slot occupancy.
    pub max_occupancy: u32,
    /// Mean received rank over assigned groups (unranked counts as 10).
    pub avg_rank: f64,
    /// Groups without an assignment.
    pub unassigned: usize,
}

impl AssignmentKpi {
    /// Computes KPIs from a solution and its instance.
    ///
    /// # Arguments
    /// * `solution` - The solution to measure.
    /// * `instance` - The groups (for ranks).
    /// * `config` - Cost model used for the breakdown.
    pub fn calculate(solution: &Solution, instance: &Instance, config: &AssignConfig) -> Self {
        let slots = solution.slots();
        let mut rank_histogram = vec![0usize; RANK_BUCKETS];
        let mut members_by_rank = vec![0u64; RANK_BUCKETS];
        let mut occupancy: Vec<SlotOccupancy> = solution
            .occupancies()
            .map(|(slot, total)| SlotOccupancy {
                slot,
                total,
                by_rank: vec![0; RANK_BUCKETS],
            })
            .collect();

        let mut rank_sum = 0usize;
        for (group, slot) in solution.assigned() {
            let rank = instance.group(group).rank_or_unranked(slot).min(UNRANKED);
            let size = solution.size_of(group);
            rank_histogram[rank] += 1;
            members_by_rank[rank] += u64::from(size);
            rank_sum += rank;
            if let Some(pos) = slots.index_of(slot) {
                occupancy[pos].by_rank[rank] += size;
            }
        }

        let assigned = solution.assigned_count();
        let avg_rank = if assigned == 0 {
            0.0
        } else {
            rank_sum as f64 / assigned as f64
        };

        Self {
            cost: config.costs.evaluate(solution, instance),
            rank_histogram,
            members_by_rank,
            min_occupancy: occupancy.iter().map(|o| o.total).min().unwrap_or(0),
            max_occupancy: occupancy.iter().map(|o| o.total).max().unwrap_or(0),
            occupancy,
            avg_rank,
            unassigned: solution.group_count() - assigned,
        }
    }

    /// Whether every slot lies within the configured occupancy bounds.
    pub fn within_bounds(&self, config: &AssignConfig) -> bool {
        config.within_bounds(self.min_occupancy) && config.within_bounds(self.max_occupancy)
    }

    /// Fraction of assigned groups that received their first choice.
    pub fn first_choice_rate(&self) -> f64 {
        let assigned: usize = self.rank_histogram.iter().sum();
        if assigned == 0 {
            0.0
        } else {
            self.rank_histogram[0] as f64 / assigned as f64
        }
    }
}
