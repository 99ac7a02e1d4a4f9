//! Per-source quantities to be carried onto targets.

use std::collections::BTreeMap;

use anime_core::FeatureId;

use crate::InterpolationError;

/// Finite values keyed by source identifier.
///
/// Suitable for intensive quantities such as densities, which may be
/// negative. Use [`ExtensiveValues`] for totals.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceValues {
    values: BTreeMap<FeatureId, f64>,
}

impl SourceValues {
    /// Collect `(id, value)` pairs.
    ///
    /// # Errors
    /// Returns [`InterpolationError::InvalidValue`] for NaN or infinite
    /// values and [`InterpolationError::DuplicateValue`] when an id repeats.
    pub fn new<I>(entries: I) -> Result<Self, InterpolationError>
    where
        I: IntoIterator<Item = (FeatureId, f64)>,
    {
        let mut values = BTreeMap::new();
        for (source_id, value) in entries {
            if !value.is_finite() {
                return Err(InterpolationError::InvalidValue { source_id, value });
            }
            if values.insert(source_id, value).is_some() {
                return Err(InterpolationError::DuplicateValue { source_id });
            }
        }
        Ok(Self { values })
    }

    /// Build from parallel identifier and value columns.
    ///
    /// # Errors
    /// Returns [`InterpolationError::LengthMismatch`] when the columns
    /// differ in length, otherwise the same errors as [`SourceValues::new`].
    pub fn from_columns(ids: &[u64], values: &[f64]) -> Result<Self, InterpolationError> {
        if ids.len() != values.len() {
            return Err(InterpolationError::LengthMismatch {
                ids: ids.len(),
                values: values.len(),
            });
        }
        Self::new(ids.iter().copied().map(FeatureId).zip(values.iter().copied()))
    }

    /// Value for `source_id`, if any.
    #[must_use]
    pub fn get(&self, source_id: FeatureId) -> Option<f64> {
        self.values.get(&source_id).copied()
    }

    /// Number of sources with a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no values were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over `(id, value)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (FeatureId, f64)> + '_ {
        self.values.iter().map(|(&id, &value)| (id, value))
    }

    /// Sum of all values.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }

    fn check_non_negative(&self) -> Result<(), InterpolationError> {
        match self.iter().find(|&(_, value)| value < 0.0) {
            Some((source_id, value)) => Err(InterpolationError::InvalidValue { source_id, value }),
            None => Ok(()),
        }
    }
}

/// Non-negative finite quantities keyed by source identifier.
///
/// # Examples
///
/// ```
/// use anime_core::FeatureId;
/// use anime_interp::{ExtensiveValues, InterpolationError};
///
/// let values = ExtensiveValues::new([(FeatureId(1), 100.0)]).expect("valid values");
/// assert_eq!(values.total(), 100.0);
///
/// let negative = ExtensiveValues::new([(FeatureId(2), -1.0)]);
/// assert!(matches!(negative, Err(InterpolationError::InvalidValue { .. })));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtensiveValues(SourceValues);

impl ExtensiveValues {
    /// Collect `(id, quantity)` pairs.
    ///
    /// # Errors
    /// Returns [`InterpolationError::InvalidValue`] for negative, NaN, or
    /// infinite quantities and [`InterpolationError::DuplicateValue`] when
    /// an id repeats.
    pub fn new<I>(entries: I) -> Result<Self, InterpolationError>
    where
        I: IntoIterator<Item = (FeatureId, f64)>,
    {
        Self::try_from(SourceValues::new(entries)?)
    }

    /// Build from parallel identifier and quantity columns.
    ///
    /// # Errors
    /// Same as [`SourceValues::from_columns`], plus negative quantities.
    pub fn from_columns(ids: &[u64], values: &[f64]) -> Result<Self, InterpolationError> {
        Self::try_from(SourceValues::from_columns(ids, values)?)
    }

    /// Borrow the underlying values.
    #[must_use]
    pub const fn as_values(&self) -> &SourceValues {
        &self.0
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.total()
    }
}

impl TryFrom<SourceValues> for ExtensiveValues {
    type Error = InterpolationError;

    fn try_from(values: SourceValues) -> Result<Self, Self::Error> {
        values.check_non_negative()?;
        Ok(Self(values))
    }
}

impl AsRef<SourceValues> for ExtensiveValues {
    fn as_ref(&self) -> &SourceValues {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn values_iterate_in_id_order() {
        let values = SourceValues::new([(FeatureId(9), 1.0), (FeatureId(2), -4.0)])
            .expect("finite values");
        let ids: Vec<_> = values.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![FeatureId(2), FeatureId(9)]);
        assert_eq!(values.get(FeatureId(2)), Some(-4.0));
    }

    #[rstest]
    fn duplicates_are_rejected() {
        let error = SourceValues::new([(FeatureId(1), 1.0), (FeatureId(1), 2.0)])
            .expect_err("duplicate id");
        assert_eq!(
            error,
            InterpolationError::DuplicateValue {
                source_id: FeatureId(1)
            }
        );
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(-0.5)]
    fn extensive_values_must_be_non_negative_and_finite(#[case] value: f64) {
        let result = ExtensiveValues::new([(FeatureId(3), value)]);
        assert!(matches!(
            result,
            Err(InterpolationError::InvalidValue { source_id: FeatureId(3), .. })
        ));
    }

    #[rstest]
    fn columns_must_align() {
        let error = ExtensiveValues::from_columns(&[1, 2], &[1.0]).expect_err("mismatch");
        assert_eq!(error, InterpolationError::LengthMismatch { ids: 2, values: 1 });
    }
}
