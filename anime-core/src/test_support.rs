//! Fixture builders shared by unit, behaviour, and downstream crate tests.

use geo::{Coord, LineString, Point, Polygon};

use crate::{FeatureId, Geometry, GeometrySet};

/// Point geometry at `(x, y)`.
#[must_use]
pub fn point(x: f64, y: f64) -> Geometry {
    Geometry::from(Point::new(x, y))
}

/// Two-vertex line from `start` to `end`.
#[must_use]
pub fn segment(start: (f64, f64), end: (f64, f64)) -> Geometry {
    Geometry::from(LineString::from(vec![start, end]))
}

/// Axis-aligned square polygon with its lower-left corner at `(x, y)`.
#[must_use]
pub fn square(x: f64, y: f64, side: f64) -> Geometry {
    let ring = LineString::from(vec![
        Coord { x, y },
        Coord { x: x + side, y },
        Coord {
            x: x + side,
            y: y + side,
        },
        Coord { x, y: y + side },
        Coord { x, y },
    ]);
    Geometry::from(Polygon::new(ring, Vec::new()))
}

/// Build a [`GeometrySet`] from literal `(id, geometry)` pairs.
///
/// # Panics
/// Panics when the fixtures are invalid. Intended for tests only.
#[must_use]
pub fn set<I>(entries: I) -> GeometrySet
where
    I: IntoIterator<Item = (u64, Geometry)>,
{
    GeometrySet::new(entries.into_iter().map(|(id, geometry)| (FeatureId(id), geometry)))
        .expect("valid fixture geometries")
}

/// Build a [`GeometrySet`] of points from `(id, x, y)` triples.
#[must_use]
pub fn point_set<I>(points: I) -> GeometrySet
where
    I: IntoIterator<Item = (u64, f64, f64)>,
{
    set(points.into_iter().map(|(id, x, y)| (id, point(x, y))))
}
