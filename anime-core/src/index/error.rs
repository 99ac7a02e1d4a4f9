use thiserror::Error;

use crate::params::ParameterError;

/// Errors from building or querying a [`crate::SpatialIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum IndexError {
    /// No source geometries were supplied.
    ///
    /// An index needs at least one feature to answer nearest-neighbour
    /// queries. Callers should check for empty layers before building.
    #[error("cannot build a spatial index over zero source features")]
    EmptyInput,
    /// A query used an invalid `k` or `max_distance`.
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),
}
