//! Results of interpolating source values onto targets.

use std::collections::BTreeMap;

use anime_core::FeatureId;

/// Values assigned to targets, with diagnostics about what was left over.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interpolation {
    values: BTreeMap<FeatureId, f64>,
    unallocated: f64,
    unallocated_sources: usize,
    ignored_values: usize,
}

impl Interpolation {
    pub(crate) const fn new(
        values: BTreeMap<FeatureId, f64>,
        unallocated: f64,
        unallocated_sources: usize,
        ignored_values: usize,
    ) -> Self {
        Self {
            values,
            unallocated,
            unallocated_sources,
            ignored_values,
        }
    }

    /// Value for one target.
    ///
    /// `None` means the target had no usable match.
    #[must_use]
    pub fn get(&self, target_id: FeatureId) -> Option<f64> {
        self.values.get(&target_id).copied()
    }

    /// Per-target values keyed by target identifier.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<FeatureId, f64> {
        &self.values
    }

    /// Sum over all targets.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    /// Quantity held by known sources that reached no target.
    ///
    /// Always zero for intensive interpolation.
    #[must_use]
    pub const fn unallocated(&self) -> f64 {
        self.unallocated
    }

    /// Number of known sources whose quantity was not allocated.
    #[must_use]
    pub const fn unallocated_sources(&self) -> usize {
        self.unallocated_sources
    }

    /// Number of values skipped because their source was unknown under
    /// [`crate::MissingValuePolicy::Ignore`].
    #[must_use]
    pub const fn ignored_values(&self) -> usize {
        self.ignored_values
    }

    /// Export as parallel columns in ascending target order.
    #[must_use]
    pub fn to_columns(&self) -> InterpolatedColumns {
        let (target_id, value) = self
            .values
            .iter()
            .map(|(id, value)| (id.get(), *value))
            .unzip();
        InterpolatedColumns { target_id, value }
    }
}

/// An [`Interpolation`] as parallel columns.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedColumns {
    /// Target identifiers.
    pub target_id: Vec<u64>,
    /// Interpolated values.
    pub value: Vec<f64>,
}
