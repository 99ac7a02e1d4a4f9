//! Matching configuration.

use anime_core::check_search_parameters;

use crate::MatchError;

/// Parameters controlling a matching run.
///
/// Fields missing from a serialised configuration take their defaults, so
/// a host can load partial JSON such as `{"k": 3, "max_distance": 25.0}`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct MatchConfig {
    /// Maximum number of candidate sources per target. Must be at least 1.
    pub k: usize,
    /// Search radius in coordinate units. `f64::INFINITY` is unbounded.
    pub max_distance: f64,
    /// Worker threads: `0` shares the rayon pool the call runs in, `1`
    /// runs sequentially, larger counts build a pool of that size per call.
    pub n_threads: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            k: 1,
            max_distance: f64::INFINITY,
            n_threads: 0,
        }
    }
}

impl MatchConfig {
    /// Validated configuration using the current rayon pool.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidParameter`] when `k == 0` or
    /// `max_distance` is negative or NaN.
    pub fn new(k: usize, max_distance: f64) -> Result<Self, MatchError> {
        let config = Self {
            k,
            max_distance,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Replace the worker thread count.
    #[must_use]
    pub const fn with_threads(mut self, n_threads: usize) -> Self {
        self.n_threads = n_threads;
        self
    }

    /// Check `k` and `max_distance`.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidParameter`] on out-of-range values.
    pub fn validate(&self) -> Result<(), MatchError> {
        check_search_parameters(self.k, self.max_distance)?;
        Ok(())
    }
}
