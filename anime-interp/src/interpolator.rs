//! Extensive and intensive interpolation over a match table.
//!
//! Extensive quantities are divided: each source's quantity is split among
//! its matched targets in proportion to the record weights, normalised per
//! source, and the shares arriving at a target are summed. Intensive
//! quantities are averaged: each target takes the weighted mean of the
//! values of its matched sources.

use std::collections::BTreeMap;

use anime_core::{CancellationToken, FeatureId, MatchRecord, MatchTable};

use crate::weights::record_weights;
use crate::{
    ExtensiveValues, Interpolation, InterpolationConfig, InterpolationError, MissingValuePolicy,
    SourceValues, Tensive,
};

/// Carries source values onto targets through a [`MatchTable`].
///
/// # Examples
///
/// ```
/// use anime_core::{FeatureId, MatchColumns, MatchTable};
/// use anime_interp::{ExtensiveValues, InterpolationConfig, Interpolator};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let matches = MatchTable::from_columns(
///     MatchColumns {
///         target_id: vec![1, 2],
///         source_id: vec![7, 7],
///         distance: vec![3.0, 3.0],
///         rank: vec![0, 0],
///     },
///     [FeatureId(7)],
/// )?;
/// let values = ExtensiveValues::new([(FeatureId(7), 100.0)])?;
///
/// let interpolator = Interpolator::new(InterpolationConfig::default())?;
/// let result = interpolator.interpolate_extensive(&values, &matches, None)?;
/// assert_eq!(result.get(FeatureId(1)), Some(50.0));
/// assert_eq!(result.get(FeatureId(2)), Some(50.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator {
    config: InterpolationConfig,
}

impl Interpolator {
    /// Construct an interpolator.
    ///
    /// # Errors
    /// Returns [`InterpolationError::InvalidEpsilon`] when the configured
    /// offset is not positive and finite.
    pub fn new(config: InterpolationConfig) -> Result<Self, InterpolationError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &InterpolationConfig {
        &self.config
    }

    /// Interpolate `values` as the given kind of quantity.
    ///
    /// # Errors
    /// As [`Interpolator::interpolate_extensive`] or
    /// [`Interpolator::interpolate_intensive`]; extensive interpolation also
    /// rejects negative values with [`InterpolationError::InvalidValue`].
    pub fn interpolate(
        &self,
        kind: Tensive,
        values: &SourceValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
    ) -> Result<Interpolation, InterpolationError> {
        self.interpolate_with_cancel(kind, values, matches, weights, &CancellationToken::new())
    }

    /// Interpolate, polling `cancel` between sources or targets.
    ///
    /// # Errors
    /// Returns [`InterpolationError::Cancelled`] once `cancel` is observed,
    /// otherwise as [`Interpolator::interpolate`].
    pub fn interpolate_with_cancel(
        &self,
        kind: Tensive,
        values: &SourceValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
        cancel: &CancellationToken,
    ) -> Result<Interpolation, InterpolationError> {
        match kind {
            Tensive::Extensive => {
                let quantities = ExtensiveValues::try_from(values.clone())?;
                self.extensive(&quantities, matches, weights, cancel)
            }
            Tensive::Intensive => self.intensive(values, matches, weights, cancel),
        }
    }

    /// Divide each source's quantity among its matched targets.
    ///
    /// `weights`, when given, holds one non-negative weight per match record
    /// in table order; otherwise records are weighted by inverse distance.
    /// Weights are normalised per source. Known sources with no matches, or
    /// whose weights sum to zero, are reported through
    /// [`Interpolation::unallocated`].
    ///
    /// # Errors
    /// Returns [`InterpolationError::MissingValue`] for a value whose source
    /// is not in the table under [`MissingValuePolicy::Error`], or
    /// [`InterpolationError::WeightLengthMismatch`] and
    /// [`InterpolationError::InvalidWeight`] for malformed weights.
    pub fn interpolate_extensive(
        &self,
        values: &ExtensiveValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
    ) -> Result<Interpolation, InterpolationError> {
        self.extensive(values, matches, weights, &CancellationToken::new())
    }

    /// Average the values of each target's matched sources.
    ///
    /// Weights are used as given, without per-source normalisation. Matched
    /// sources without a value are skipped; a target whose remaining weights
    /// sum to zero receives no value.
    ///
    /// # Errors
    /// As [`Interpolator::interpolate_extensive`].
    pub fn interpolate_intensive(
        &self,
        values: &SourceValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
    ) -> Result<Interpolation, InterpolationError> {
        self.intensive(values, matches, weights, &CancellationToken::new())
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "quantities are split in proportion to normalised weights"
    )]
    fn extensive(
        &self,
        values: &ExtensiveValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
        cancel: &CancellationToken,
    ) -> Result<Interpolation, InterpolationError> {
        let per_record = record_weights(matches, weights, self.config.epsilon)?;
        let ignored_values = self.check_known_sources(values.as_values(), matches)?;

        let mut by_source: BTreeMap<FeatureId, Vec<(&MatchRecord, f64)>> = BTreeMap::new();
        for (record, &weight) in matches.iter().zip(&per_record) {
            by_source
                .entry(record.source_id)
                .or_default()
                .push((record, weight));
        }

        let mut allocated: BTreeMap<FeatureId, f64> = matches
            .groups()
            .map(|(target_id, _)| (target_id, 0.0))
            .collect();
        let mut unallocated = 0.0;
        let mut unallocated_sources = 0_usize;

        for (source_id, quantity) in values.as_values().iter() {
            if cancel.is_cancelled() {
                return Err(InterpolationError::Cancelled);
            }
            if !matches.sources().contains(&source_id) {
                continue;
            }
            let shares = by_source.get(&source_id).map_or(&[][..], Vec::as_slice);
            let total_weight: f64 = shares.iter().map(|&(_, weight)| weight).sum();
            if total_weight <= 0.0 {
                if !shares.is_empty() {
                    log::warn!("weights for source {source_id} sum to zero; quantity left unallocated");
                }
                unallocated += quantity;
                unallocated_sources += 1;
                continue;
            }
            for &(record, weight) in shares {
                *allocated.entry(record.target_id).or_insert(0.0) +=
                    quantity * (weight / total_weight);
            }
        }

        log::debug!(
            "interpolated {} source quantities onto {} targets; {} sources unallocated",
            values.as_values().len(),
            allocated.len(),
            unallocated_sources
        );
        Ok(Interpolation::new(
            allocated,
            unallocated,
            unallocated_sources,
            ignored_values,
        ))
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "intensive values are weighted means"
    )]
    fn intensive(
        &self,
        values: &SourceValues,
        matches: &MatchTable,
        weights: Option<&[f64]>,
        cancel: &CancellationToken,
    ) -> Result<Interpolation, InterpolationError> {
        let per_record = record_weights(matches, weights, self.config.epsilon)?;
        let ignored_values = self.check_known_sources(values, matches)?;

        let mut averaged = BTreeMap::new();
        let mut offset = 0_usize;
        for (target_id, group) in matches.groups() {
            if cancel.is_cancelled() {
                return Err(InterpolationError::Cancelled);
            }
            let group_weights = per_record.get(offset..offset + group.len()).unwrap_or(&[]);
            offset += group.len();

            let (weighted_sum, total_weight) = group.iter().zip(group_weights).fold(
                (0.0, 0.0),
                |(sum, total), (record, &weight)| match values.get(record.source_id) {
                    Some(value) => (sum + weight * value, total + weight),
                    None => (sum, total),
                },
            );
            if total_weight > 0.0 {
                averaged.insert(target_id, weighted_sum / total_weight);
            }
        }

        log::debug!(
            "averaged {} source values onto {} targets",
            values.len(),
            averaged.len()
        );
        Ok(Interpolation::new(averaged, 0.0, 0, ignored_values))
    }

    /// Apply the missing-value policy, returning how many values were
    /// ignored.
    fn check_known_sources(
        &self,
        values: &SourceValues,
        matches: &MatchTable,
    ) -> Result<usize, InterpolationError> {
        let mut unknown = values
            .iter()
            .map(|(source_id, _)| source_id)
            .filter(|source_id| !matches.sources().contains(source_id));
        match self.config.missing_values {
            MissingValuePolicy::Error => match unknown.next() {
                Some(source_id) => Err(InterpolationError::MissingValue { source_id }),
                None => Ok(0),
            },
            MissingValuePolicy::Ignore => {
                let ignored = unknown.count();
                if ignored > 0 {
                    log::warn!("ignoring {ignored} values for sources outside the match table");
                }
                Ok(ignored)
            }
        }
    }
}

/// Divide `values` among targets with the default configuration.
///
/// # Errors
/// As [`Interpolator::interpolate_extensive`].
pub fn interpolate_extensive(
    values: &ExtensiveValues,
    matches: &MatchTable,
    weights: Option<&[f64]>,
) -> Result<Interpolation, InterpolationError> {
    Interpolator::default().interpolate_extensive(values, matches, weights)
}

/// Average `values` onto targets with the default configuration.
///
/// # Errors
/// As [`Interpolator::interpolate_intensive`].
pub fn interpolate_intensive(
    values: &SourceValues,
    matches: &MatchTable,
    weights: Option<&[f64]>,
) -> Result<Interpolation, InterpolationError> {
    Interpolator::default().interpolate_intensive(values, matches, weights)
}
