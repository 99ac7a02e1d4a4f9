use anime_core::{IndexError, MatchTableError, ParameterError};
use rayon::ThreadPoolBuildError;
use thiserror::Error;

/// Errors raised while matching targets to sources.
#[derive(Debug, Error)]
pub enum MatchError {
    /// `k` or `max_distance` was out of range.
    #[error("invalid match parameters: {0}")]
    InvalidParameter(#[from] ParameterError),
    /// The caller cancelled the run before it finished.
    #[error("matching was cancelled")]
    Cancelled,
    /// A dedicated worker pool could not be created.
    #[error("failed to build matching worker pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
    /// The spatial index rejected a query.
    #[error("spatial index query failed: {0}")]
    Index(IndexError),
    /// Per-target results did not form a consistent table.
    #[error("matched records are inconsistent: {0}")]
    Table(#[from] MatchTableError),
}

impl From<IndexError> for MatchError {
    fn from(error: IndexError) -> Self {
        match error {
            IndexError::InvalidParameter(parameter) => Self::InvalidParameter(parameter),
            other @ IndexError::EmptyInput => Self::Index(other),
        }
    }
}
