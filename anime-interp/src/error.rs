use anime_core::FeatureId;
use thiserror::Error;

/// Errors raised while interpolating source values onto targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationError {
    /// A value was supplied for a source that was never indexed.
    #[error("value supplied for source {source_id}, which is not part of the match table")]
    MissingValue {
        /// Identifier without a counterpart in the match table.
        source_id: FeatureId,
    },
    /// A source value was NaN, infinite, or negative where a quantity is
    /// required.
    #[error("invalid value {value} for source {source_id}")]
    InvalidValue {
        /// Source carrying the value.
        source_id: FeatureId,
        /// Rejected value.
        value: f64,
    },
    /// The same source appeared twice in a value set.
    #[error("source {source_id} has more than one value")]
    DuplicateValue {
        /// Repeated identifier.
        source_id: FeatureId,
    },
    /// Value columns differed in length.
    #[error("{ids} identifiers supplied for {values} values")]
    LengthMismatch {
        /// Number of identifiers.
        ids: usize,
        /// Number of values.
        values: usize,
    },
    /// Supplied weights did not line up with the match records.
    #[error("{weights} weights supplied for {records} match records")]
    WeightLengthMismatch {
        /// Number of weights.
        weights: usize,
        /// Number of match records.
        records: usize,
    },
    /// A supplied weight was negative or not finite.
    #[error("invalid weight {weight} for match record {position}")]
    InvalidWeight {
        /// Position of the record in the match table.
        position: usize,
        /// Rejected weight.
        weight: f64,
    },
    /// The inverse-distance offset was not a positive finite number.
    #[error("epsilon must be positive and finite, got {epsilon}")]
    InvalidEpsilon {
        /// Rejected offset.
        epsilon: f64,
    },
    /// An overlap tolerance was negative or not finite.
    #[error("overlap tolerance must be non-negative and finite, got {tolerance}")]
    InvalidTolerance {
        /// Rejected tolerance.
        tolerance: f64,
    },
    /// A match record referenced a feature absent from the supplied layer.
    #[error("feature {id} is referenced by the match table but missing from its layer")]
    UnknownFeature {
        /// Identifier that could not be resolved.
        id: FeatureId,
    },
    /// The caller cancelled the run before it finished.
    #[error("interpolation was cancelled")]
    Cancelled,
}
