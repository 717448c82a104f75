//! Run configuration.
//!
//! Every heuristic stage receives an [`AssignConfig`] explicitly: the
//! slot range, the occupancy bounds defining feasibility, the cost model
//! and the local-search budget. Defaults reproduce the reference domain
//! (100 days, 125..=300 visitors per day).

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::cost::CostModel;
use crate::models::SlotRange;

/// Default capacity floor per slot.
pub const DEFAULT_MIN_OCCUPANCY: u32 = 125;

/// Default capacity ceiling per slot.
pub const DEFAULT_MAX_OCCUPANCY: u32 = 300;

/// Default cap on local-search passes.
pub const DEFAULT_MAX_PASSES: usize = 1_000;

/// Errors raised while loading or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Minimum occupancy {min} exceeds maximum occupancy {max}")]
    InvertedBounds { min: u32, max: u32 },
    #[error("Maximum occupancy must be positive")]
    ZeroCapacity,
}

/// Configuration shared by all heuristic stages.
///
/// # Example
/// ```
/// use u_assign::config::AssignConfig;
///
/// let config = AssignConfig::default().with_bounds(1, 10);
/// assert_eq!(config.min_occupancy, 1);
/// assert_eq!(config.slots.len(), 100);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    /// Slots available for assignment.
    pub slots: SlotRange,
    /// Minimum members per slot.
    pub min_occupancy: u32,
    /// Maximum members per slot.
    pub max_occupancy: u32,
    /// Cost model.
    pub costs: CostModel,
    /// Upper bound on local-search passes.
    pub max_passes: usize,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            slots: SlotRange::default(),
            min_occupancy: DEFAULT_MIN_OCCUPANCY,
            max_occupancy: DEFAULT_MAX_OCCUPANCY,
            costs: CostModel::default(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

impl AssignConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text. Missing fields take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the slot range.
    pub fn with_slots(mut self, slots: SlotRange) -> Self {
        self.slots = slots;
        self
    }

    /// Sets the occupancy bounds.
    pub fn with_bounds(mut self, min: u32, max: u32) -> Self {
        self.min_occupancy = min;
        self.max_occupancy = max;
        self
    }

    /// Sets the cost model.
    pub fn with_costs(mut self, costs: CostModel) -> Self {
        self.costs = costs;
        self
    }

    /// Sets the local-search pass cap.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Checks the occupancy bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_occupancy == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.min_occupancy > self.max_occupancy {
            return Err(ConfigError::InvertedBounds {
                min: self.min_occupancy,
                max: self.max_occupancy,
            });
        }
        Ok(())
    }

    /// Whether `occupancy` lies within `[min_occupancy, max_occupancy]`.
    #[inline]
    pub fn within_bounds(&self, occupancy: u32) -> bool {
        (self.min_occupancy..=self.max_occupancy).contains(&occupancy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AssignConfig::default();
        assert_eq!(config.slots, SlotRange::new(1, 100).unwrap());
        assert_eq!(config.min_occupancy, 125);
        assert_eq!(config.max_occupancy, 300);
        assert_eq!(config.max_passes, 1_000);
        assert!(config.within_bounds(125));
        assert!(config.within_bounds(300));
        assert!(!config.within_bounds(124));
        assert!(!config.within_bounds(301));
    }

    #[test]
    fn test_from_json_partial() {
        let config = AssignConfig::from_json(
            r#"{"slots": {"first": 1, "last": 2}, "min_occupancy": 1, "max_occupancy": 10}"#,
        )
        .unwrap();
        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.max_occupancy, 10);
        assert_eq!(config.max_passes, DEFAULT_MAX_PASSES);
        assert_eq!(config.costs, CostModel::default());
    }

    #[test]
    fn test_from_json_rejects_inverted_bounds() {
        let err = AssignConfig::from_json(r#"{"min_occupancy": 20, "max_occupancy": 10}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBounds { min: 20, max: 10 }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            AssignConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = AssignConfig::default()
            .with_slots(SlotRange::new(1, 5).unwrap())
            .with_bounds(2, 8)
            .with_max_passes(3);
        assert_eq!(config.slots.last(), 5);
        assert_eq!(config.min_occupancy, 2);
        assert_eq!(config.max_passes, 3);
        assert!(config.validate().is_ok());
        assert!(matches!(
            AssignConfig::default().with_bounds(0, 0).validate(),
            Err(ConfigError::ZeroCapacity)
        ));
    }
}
