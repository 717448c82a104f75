//! Input validation and feasibility checking.
//!
//! [`validate_input`] checks an instance against a configuration before
//! any heuristic runs. Detects:
//! - Preferences naming slots outside the configured range
//! - Groups larger than the capacity ceiling
//! - Total demand that cannot satisfy the floor or fit under the ceiling
//!
//! [`check_feasibility`] inspects a finished solution and lists every
//! capacity or completeness violation. Infeasibility is reported, never
//! raised as an error.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AssignConfig;
use crate::models::{GroupId, Instance, Solution, Violation, ViolationType};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The instance has no groups.
    EmptyInstance,
    /// A group lists a slot outside the configured range.
    PreferenceOutOfRange,
    /// A group alone exceeds the capacity ceiling.
    OversizedGroup,
    /// Total members exceed what all slots can hold.
    CapacityExceeded,
    /// Total members cannot bring every slot to the floor.
    DemandShortfall,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates an instance against a configuration.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(instance: &Instance, config: &AssignConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyInstance,
            "No groups to assign",
        ));
    }

    for group in instance.groups() {
        for &slot in group.preferences() {
            if !config.slots.contains(slot) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PreferenceOutOfRange,
                    format!(
                        "Group {} prefers slot {} outside {}..={}",
                        group.id(),
                        slot,
                        config.slots.first(),
                        config.slots.last()
                    ),
                ));
            }
        }

        if group.size() > config.max_occupancy {
            errors.push(ValidationError::new(
                ValidationErrorKind::OversizedGroup,
                format!(
                    "Group {} has {} members, maximum occupancy is {}",
                    group.id(),
                    group.size(),
                    config.max_occupancy
                ),
            ));
        }
    }

    let total = instance.total_members();
    let slot_count = config.slots.len() as u64;
    let ceiling = slot_count * u64::from(config.max_occupancy);
    let floor = slot_count * u64::from(config.min_occupancy);

    if total > ceiling {
        errors.push(ValidationError::new(
            ValidationErrorKind::CapacityExceeded,
            format!("{total} members exceed total capacity {ceiling}"),
        ));
    }
    if !instance.is_empty() && total < floor {
        errors.push(ValidationError::new(
            ValidationErrorKind::DemandShortfall,
            format!("{total} members cannot reach total minimum {floor}"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Feasibility verdict for a solution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// Every violation found, capacity violations first in slot order.
    pub violations: Vec<Violation>,
}

impl FeasibilityReport {
    /// Whether the solution has no violations.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    /// IDs of groups without an assignment.
    pub fn unassigned_groups(&self) -> Vec<GroupId> {
        self.violations
            .iter()
            .filter_map(|v| match v.violation_type {
                ViolationType::Unassigned { group } => Some(group),
                _ => None,
            })
            .collect()
    }

    /// Number of slot capacity violations.
    pub fn capacity_violation_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_capacity()).count()
    }
}

/// Checks every slot against the occupancy bounds and every group for
/// an assignment.
///
/// # Example
/// ```
/// use u_assign::config::AssignConfig;
/// use u_assign::models::{Group, Instance, Solution, SlotRange};
/// use u_assign::validation::check_feasibility;
///
/// let instance = Instance::new(vec![Group::new(1, vec![1], 5).unwrap()]).unwrap();
/// let config = AssignConfig::default()
///     .with_slots(SlotRange::new(1, 1).unwrap())
///     .with_bounds(3, 8);
/// let mut solution = Solution::empty(&instance, config.slots);
/// assert!(!check_feasibility(&solution, &config).is_feasible());
///
/// solution.assign(0, 1).unwrap();
/// assert!(check_feasibility(&solution, &config).is_feasible());
/// ```
pub fn check_feasibility(solution: &Solution, config: &AssignConfig) -> FeasibilityReport {
    let mut violations = Vec::new();

    for (slot, occupancy) in solution.occupancies() {
        if occupancy < config.min_occupancy {
            violations.push(Violation::below_min(slot, occupancy, config.min_occupancy));
        } else if occupancy > config.max_occupancy {
            violations.push(Violation::above_max(slot, occupancy, config.max_occupancy));
        }
    }

    let unassigned: Vec<GroupId> = solution
        .unassigned()
        .into_iter()
        .map(|group| solution.group_id(group))
        .collect();
    if !unassigned.is_empty() {
        warn!(count = unassigned.len(), groups = ?unassigned, "Groups left unassigned");
    }
    violations.extend(unassigned.into_iter().map(Violation::unassigned));

    FeasibilityReport { violations }
}
