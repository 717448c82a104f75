//! Heuristic solver stages and KPI evaluation.
//!
//! Provides the construct → repair → place → improve pipeline and
//! solution quality metrics.
//!
//! # Algorithm
//!
//! `HeuristicSolver` chains four stages over one [`Solution`](crate::models::Solution):
//!
//! 1. [`construct_greedy`]: largest groups first onto their least-loaded
//!    preferred slot.
//! 2. [`repair_capacity_floor`]: pulls eligible groups into slots below
//!    the floor.
//! 3. [`place_unassigned`]: preferred slots first, then any slot with room.
//! 4. [`improve`]: first-improvement local search over single relocations.
//!
//! It is not optimal, but provides fast feasible baselines and warm starts
//! for an exact solver.
//!
//! # KPI
//!
//! `AssignmentKpi` computes the cost breakdown, rank histogram and
//! per-slot occupancy split by rank.

mod greedy;
mod kpi;
mod local_search;
mod placement;
mod repair;
mod solver;

pub use greedy::{construct_greedy, construct_greedy_in_order, size_order, Construction};
pub use kpi::{AssignmentKpi, SlotOccupancy, RANK_BUCKETS};
pub use local_search::{improve, improve_pass, is_feasible_move, move_delta, LocalSearchReport};
pub use placement::{place_unassigned, PlacementReport};
pub use repair::{repair_capacity_floor, RepairReport};
pub use solver::{HeuristicOutcome, HeuristicSolver, DEFAULT_SEED};
