//! Assignment domain models.
//!
//! Provides the core data types for representing slot assignment
//! problems and their solutions.
//!
//! # Domain Mappings
//!
//! | u-assign | Workshop visits | Clinic | Events |
//! |----------|-----------------|--------|--------|
//! | Group | Family | Patient cohort | Party |
//! | Slot | Day | Appointment day | Session |
//! | Occupancy | Visitors per day | Patients per day | Attendees |
//! | Solution | Visit plan | Roster | Seating plan |

mod error;
mod group;
mod instance;
mod slot;
mod solution;
mod violation;

pub use error::ModelError;
pub use group::{Group, GroupId, PREFERENCE_COUNT, UNRANKED};
pub use instance::Instance;
pub use slot::{SlotId, SlotRange};
pub use solution::Solution;
pub use violation::{Violation, ViolationType};
