//! Validation of search parameters shared by the index and the matcher.

use thiserror::Error;

/// Invalid `k` or `max_distance` supplied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ParameterError {
    /// At least one candidate must be requested.
    #[error("k must be at least 1")]
    ZeroCandidates,
    /// The search radius was negative or NaN.
    #[error("max_distance must be a non-negative number, got {max_distance}")]
    InvalidMaxDistance {
        /// Rejected radius.
        max_distance: f64,
    },
}

/// Check a candidate count and search radius.
///
/// `max_distance` may be `f64::INFINITY` for an unbounded search.
///
/// # Errors
/// Returns [`ParameterError`] when `k == 0` or `max_distance` is negative or
/// NaN.
///
/// # Examples
///
/// ```
/// use anime_core::{ParameterError, check_search_parameters};
///
/// assert!(check_search_parameters(3, f64::INFINITY).is_ok());
/// assert_eq!(check_search_parameters(0, 1.0), Err(ParameterError::ZeroCandidates));
/// ```
pub fn check_search_parameters(k: usize, max_distance: f64) -> Result<(), ParameterError> {
    if k == 0 {
        return Err(ParameterError::ZeroCandidates);
    }
    if max_distance.is_nan() || max_distance < 0.0 {
        return Err(ParameterError::InvalidMaxDistance { max_distance });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0.0)]
    #[case(5, 12.5)]
    #[case(1, f64::INFINITY)]
    fn accepts_valid_parameters(#[case] k: usize, #[case] max_distance: f64) {
        assert!(check_search_parameters(k, max_distance).is_ok());
    }

    #[rstest]
    #[case(-0.5)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn rejects_bad_distance(#[case] max_distance: f64) {
        assert!(matches!(
            check_search_parameters(1, max_distance),
            Err(ParameterError::InvalidMaxDistance { .. })
        ));
    }

    #[rstest]
    fn rejects_zero_candidates() {
        assert_eq!(
            check_search_parameters(0, 1.0),
            Err(ParameterError::ZeroCandidates)
        );
    }
}
