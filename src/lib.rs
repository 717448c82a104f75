//! Capacity-bounded group-to-slot assignment.
//!
//! Assigns groups of members to slots (e.g. families to visiting days),
//! each group ranking up to ten preferred slots, so that every slot's
//! occupancy stays within a floor and a ceiling while a preference cost
//! plus a non-linear accounting cost is kept low.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Group`, `Instance`, `SlotRange`,
//!   `Solution` (assignment/occupancy ledger), `Violation`
//! - **`cost`**: Preference and accounting cost functions, `CostModel`
//! - **`config`**: `AssignConfig` shared by every stage
//! - **`heuristic`**: Greedy construction, capacity-floor repair, placement,
//!   local search, `HeuristicSolver`, `AssignmentKpi`
//! - **`validation`**: Input checks and solution feasibility reports
//! - **`exact`**: `ExactSolver` trait for warm-started exact refinement
//! - **`io`**: CSV readers and writers
//!
//! # Example
//!
//! ```
//! use u_assign::config::AssignConfig;
//! use u_assign::heuristic::HeuristicSolver;
//! use u_assign::models::{Group, Instance, SlotRange};
//!
//! let instance = Instance::new(vec![
//!     Group::new(1, vec![1, 2], 3).unwrap(),
//!     Group::new(2, vec![2, 1], 3).unwrap(),
//! ]).unwrap();
//! let config = AssignConfig::default()
//!     .with_slots(SlotRange::new(1, 2).unwrap())
//!     .with_bounds(2, 5);
//!
//! let outcome = HeuristicSolver::new(config).solve(&instance);
//! assert!(outcome.is_feasible());
//! assert_eq!(outcome.solution.slot_of(0), Some(1));
//! assert_eq!(outcome.solution.slot_of(1), Some(2));
//! ```
//!
//! # References
//!
//! - Martello & Toth (1990), "Knapsack Problems: Algorithms and Computer
//!   Implementations", Ch. 7 (Generalized Assignment)
//! - Hoos & Stützle (2004), "Stochastic Local Search: Foundations and
//!   Applications"

pub mod config;
pub mod cost;
pub mod exact;
pub mod heuristic;
pub mod io;
pub mod models;
pub mod validation;
