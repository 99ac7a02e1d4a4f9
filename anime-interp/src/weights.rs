//! Per-record weights, either supplied by the caller or derived from
//! match distances.

use anime_core::MatchTable;

use crate::InterpolationError;

/// One weight per record of `matches`, in table order.
pub(crate) fn record_weights(
    matches: &MatchTable,
    supplied: Option<&[f64]>,
    epsilon: f64,
) -> Result<Vec<f64>, InterpolationError> {
    match supplied {
        Some(weights) => check_supplied(matches, weights).map(|()| weights.to_vec()),
        None => Ok(matches
            .iter()
            .map(|record| inverse_distance(record.distance, epsilon))
            .collect()),
    }
}

fn check_supplied(matches: &MatchTable, weights: &[f64]) -> Result<(), InterpolationError> {
    if weights.len() != matches.len() {
        return Err(InterpolationError::WeightLengthMismatch {
            weights: weights.len(),
            records: matches.len(),
        });
    }
    match weights
        .iter()
        .enumerate()
        .find(|&(_, weight)| !weight.is_finite() || *weight < 0.0)
    {
        Some((position, &weight)) => Err(InterpolationError::InvalidWeight { position, weight }),
        None => Ok(()),
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "inverse-distance weighting divides by an offset distance"
)]
fn inverse_distance(distance: f64, epsilon: f64) -> f64 {
    1.0 / (distance + epsilon)
}
