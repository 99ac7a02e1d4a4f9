//! Geometric overlap between matched targets and sources.
//!
//! Overlap weights let extensive interpolation follow shared geometry
//! instead of inverse distance. The measure depends on the pair:
//!
//! | target / source | measure |
//! |---|---|
//! | linear / linear | length of source segments running alongside the target |
//! | areal / areal | intersection area |
//! | linear / areal, areal / linear | length of the line inside the area |
//! | anything with a point | zero |
//!
//! Two segments run alongside each other when their directions differ by
//! no more than `angle_tolerance` degrees and they come within
//! `distance_tolerance`. The shared part is the source segment restricted
//! to the range both segments cover along the source's dominant axis.

use anime_core::{FeatureId, Geometry, GeometrySet, MatchTable};
use geo::{Area, BooleanOps, Distance, Euclidean, Line, LineString, MultiLineString, MultiPolygon};

use crate::{InterpolationError, OverlapConfig};

/// One overlap weight per record of `matches`, in table order.
///
/// # Errors
/// Returns [`InterpolationError::InvalidTolerance`] for a malformed
/// configuration and [`InterpolationError::UnknownFeature`] when a record
/// names a feature missing from `targets` or `sources`.
///
/// # Examples
///
/// ```
/// use anime_core::{FeatureId, Geometry, GeometrySet, MatchColumns, MatchTable};
/// use anime_interp::{OverlapConfig, overlap_weights};
/// use geo::LineString;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let road = |y: f64| Geometry::from(LineString::from(vec![(0.0, y), (10.0, y)]));
/// let targets = GeometrySet::new([(FeatureId(1), road(0.1))])?;
/// let sources = GeometrySet::new([(FeatureId(2), road(0.0))])?;
/// let matches = MatchTable::from_columns(
///     MatchColumns {
///         target_id: vec![1],
///         source_id: vec![2],
///         distance: vec![0.1],
///         rank: vec![0],
///     },
///     [FeatureId(2)],
/// )?;
///
/// let weights = overlap_weights(&targets, &sources, &matches, &OverlapConfig::default())?;
/// assert!((weights[0] - 10.0).abs() < 1e-9);
/// # Ok(())
/// # }
/// ```
pub fn overlap_weights(
    targets: &GeometrySet,
    sources: &GeometrySet,
    matches: &MatchTable,
    config: &OverlapConfig,
) -> Result<Vec<f64>, InterpolationError> {
    config.validate()?;
    let weights = matches
        .iter()
        .map(|record| {
            let target = lookup(targets, record.target_id)?;
            let source = lookup(sources, record.source_id)?;
            Ok(overlap(target, source, config))
        })
        .collect::<Result<Vec<_>, InterpolationError>>()?;
    log::debug!("computed {} overlap weights", weights.len());
    Ok(weights)
}

/// Overlap between a single target and source geometry.
#[must_use]
pub fn overlap(target: &Geometry, source: &Geometry, config: &OverlapConfig) -> f64 {
    match (target, source) {
        (Geometry::LineString(target_line), Geometry::LineString(source_line)) => {
            shared_length(target_line, source_line, config)
        }
        (Geometry::LineString(line), other) | (other, Geometry::LineString(line)) => {
            areal(other).map_or(0.0, |area| clipped_length(line, &area))
        }
        (lhs, rhs) => match (areal(lhs), areal(rhs)) {
            (Some(target_area), Some(source_area)) => {
                target_area.intersection(&source_area).unsigned_area()
            }
            _ => 0.0,
        },
    }
}

fn lookup(layer: &GeometrySet, id: FeatureId) -> Result<&Geometry, InterpolationError> {
    layer
        .get(id)
        .map(anime_core::Feature::geometry)
        .ok_or(InterpolationError::UnknownFeature { id })
}

fn areal(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon::new(vec![polygon.clone()])),
        Geometry::MultiPolygon(polygons) => Some(polygons.clone()),
        Geometry::Point(_) | Geometry::LineString(_) => None,
    }
}

fn shared_length(target: &LineString<f64>, source: &LineString<f64>, config: &OverlapConfig) -> f64 {
    source
        .lines()
        .flat_map(|source_segment| {
            target
                .lines()
                .map(move |target_segment| segment_overlap(&source_segment, &target_segment, config))
        })
        .sum()
}

#[expect(
    clippy::float_arithmetic,
    reason = "shared length scales the source segment by the covered axis range"
)]
fn segment_overlap(source: &Line<f64>, target: &Line<f64>, config: &OverlapConfig) -> f64 {
    let source_length = segment_length(source);
    if source_length == 0.0 || segment_length(target) == 0.0 {
        return 0.0;
    }
    if direction_difference(source, target) > config.angle_tolerance
        || Euclidean.distance(source, target) > config.distance_tolerance
    {
        return 0.0;
    }
    let (dx, dy) = (source.dx().abs(), source.dy().abs());
    let (covered, extent) = if dx >= dy {
        (
            axis_overlap((source.start.x, source.end.x), (target.start.x, target.end.x)),
            dx,
        )
    } else {
        (
            axis_overlap((source.start.y, source.end.y), (target.start.y, target.end.y)),
            dy,
        )
    };
    source_length * (covered / extent)
}

/// Smallest angle between the directions of two segments, in degrees.
#[expect(
    clippy::float_arithmetic,
    reason = "directions are compared modulo a half turn"
)]
fn direction_difference(lhs: &Line<f64>, rhs: &Line<f64>) -> f64 {
    let direction = |line: &Line<f64>| line.dy().atan2(line.dx()).to_degrees().rem_euclid(180.0);
    let difference = (direction(lhs) - direction(rhs)).abs();
    difference.min(180.0 - difference)
}

#[expect(
    clippy::float_arithmetic,
    reason = "overlap of two closed intervals"
)]
fn axis_overlap(lhs: (f64, f64), rhs: (f64, f64)) -> f64 {
    let start = lhs.0.min(lhs.1).max(rhs.0.min(rhs.1));
    let end = lhs.0.max(lhs.1).min(rhs.0.max(rhs.1));
    (end - start).max(0.0)
}

fn segment_length(line: &Line<f64>) -> f64 {
    line.dx().hypot(line.dy())
}

fn clipped_length(line: &LineString<f64>, area: &MultiPolygon<f64>) -> f64 {
    let inside = area.clip(&MultiLineString::new(vec![line.clone()]), false);
    inside
        .iter()
        .flat_map(LineString::lines)
        .map(|segment| segment_length(&segment))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anime_core::MatchColumns;
    use anime_core::test_support::{point, segment, set, square};
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> OverlapConfig {
        OverlapConfig {
            distance_tolerance: 0.5,
            angle_tolerance: 5.0,
        }
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "test compares lengths with a tolerance"
    )]
    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[rstest]
    #[case(segment((0.0, 0.1), (10.0, 0.1)), segment((0.0, 0.0), (10.0, 0.0)), 10.0)]
    #[case(segment((0.0, 0.1), (5.0, 0.1)), segment((0.0, 0.0), (10.0, 0.0)), 5.0)]
    #[case(segment((10.0, 0.1), (0.0, 0.1)), segment((2.0, 0.0), (4.0, 0.0)), 2.0)]
    #[case(segment((0.2, 0.0), (0.2, 4.0)), segment((0.0, 0.0), (0.0, 10.0)), 4.0)]
    #[case(segment((0.0, 0.0), (10.0, 10.0)), segment((0.0, 0.0), (10.0, 0.0)), 0.0)]
    #[case(segment((0.0, 3.0), (10.0, 3.0)), segment((0.0, 0.0), (10.0, 0.0)), 0.0)]
    fn linear_pairs_share_length(
        config: OverlapConfig,
        #[case] target: Geometry,
        #[case] source: Geometry,
        #[case] expected: f64,
    ) {
        assert_close(overlap(&target, &source, &config), expected);
    }

    #[rstest]
    fn areal_pairs_use_intersection_area(config: OverlapConfig) {
        let target = square(0.0, 0.0, 2.0);
        let source = square(1.0, 0.0, 2.0);
        assert_close(overlap(&target, &source, &config), 2.0);
    }

    #[rstest]
    fn lines_are_clipped_to_areas(config: OverlapConfig) {
        let line = segment((-1.0, 1.0), (3.0, 1.0));
        let area = square(0.0, 0.0, 2.0);
        assert_close(overlap(&line, &area, &config), 2.0);
        assert_close(overlap(&area, &line, &config), 2.0);
    }

    #[rstest]
    fn points_never_overlap(config: OverlapConfig) {
        let area = square(0.0, 0.0, 2.0);
        assert_close(overlap(&point(1.0, 1.0), &area, &config), 0.0);
        assert_close(overlap(&area, &point(1.0, 1.0), &config), 0.0);
    }

    #[rstest]
    fn weights_follow_table_order(config: OverlapConfig) {
        let targets = set([(1, segment((0.0, 0.1), (10.0, 0.1)))]);
        let sources = set([
            (5, segment((0.0, 0.0), (4.0, 0.0))),
            (6, segment((4.0, 0.0), (10.0, 0.0))),
        ]);
        let matches = MatchTable::from_columns(
            MatchColumns {
                target_id: vec![1, 1],
                source_id: vec![5, 6],
                distance: vec![0.1, 0.1],
                rank: vec![0, 1],
            },
            [FeatureId(5), FeatureId(6)],
        )
        .expect("valid table");
        let weights = overlap_weights(&targets, &sources, &matches, &config).expect("weights");
        assert_eq!(weights.len(), 2);
        assert_close(weights[0], 4.0);
        assert_close(weights[1], 6.0);
    }

    #[rstest]
    fn unknown_features_are_reported(config: OverlapConfig) {
        let targets = set([(1, point(0.0, 0.0))]);
        let sources = set([(5, point(0.0, 0.0))]);
        let matches = MatchTable::from_columns(
            MatchColumns {
                target_id: vec![2],
                source_id: vec![5],
                distance: vec![0.0],
                rank: vec![0],
            },
            [FeatureId(5)],
        )
        .expect("valid table");
        let error = overlap_weights(&targets, &sources, &matches, &config).expect_err("unknown");
        assert_eq!(error, InterpolationError::UnknownFeature { id: FeatureId(2) });
    }
}
