//! Interpolation and overlap configuration.

use crate::InterpolationError;

/// How values for unknown sources are handled.
///
/// A source is unknown when its identifier is not among the sources the
/// match table was built against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum MissingValuePolicy {
    /// Fail with [`InterpolationError::MissingValue`].
    #[default]
    Error,
    /// Treat the value as contributing nothing.
    Ignore,
}

/// Whether a quantity is summed or averaged onto targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Tensive {
    /// Counts and totals, divided among matched targets.
    Extensive,
    /// Densities and rates, averaged over matched sources.
    Intensive,
}

/// Parameters for [`crate::Interpolator`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct InterpolationConfig {
    /// Offset added to distances before inverting them.
    pub epsilon: f64,
    /// Handling of values for sources outside the match table.
    pub missing_values: MissingValuePolicy,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            missing_values: MissingValuePolicy::Error,
        }
    }
}

impl InterpolationConfig {
    /// Replace the missing-value policy.
    #[must_use]
    pub const fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Check that `epsilon` is positive and finite.
    ///
    /// # Errors
    /// Returns [`InterpolationError::InvalidEpsilon`] otherwise.
    pub fn validate(&self) -> Result<(), InterpolationError> {
        if self.epsilon.is_finite() && self.epsilon > 0.0 {
            Ok(())
        } else {
            Err(InterpolationError::InvalidEpsilon {
                epsilon: self.epsilon,
            })
        }
    }
}

/// Tolerances for [`crate::overlap_weights`] on linear pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OverlapConfig {
    /// Largest gap between two segments that still counts as shared.
    pub distance_tolerance: f64,
    /// Largest difference in segment direction, in degrees.
    pub angle_tolerance: f64,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            distance_tolerance: 10.0,
            angle_tolerance: 5.0,
        }
    }
}

impl OverlapConfig {
    /// Check that both tolerances are non-negative and finite.
    ///
    /// # Errors
    /// Returns [`InterpolationError::InvalidTolerance`] otherwise.
    pub fn validate(&self) -> Result<(), InterpolationError> {
        for tolerance in [self.distance_tolerance, self.angle_tolerance] {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(InterpolationError::InvalidTolerance { tolerance });
            }
        }
        Ok(())
    }
}
