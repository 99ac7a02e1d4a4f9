//! Geometry variants accepted by the matching core.
//!
//! [`Geometry`] wraps the `geo` primitives the engine understands and exposes
//! the handful of measurements the index and matcher rely on: a cached
//! [`BoundingBox`], a representative point, and the exact Euclidean distance
//! to a query point.

use geo::{
    BoundingRect, Centroid, Coord, CoordsIter, Distance, Euclidean, LineString, MultiPolygon,
    Point, Polygon, Rect,
};
use rstar::AABB;

/// A target or source geometry.
///
/// Polygon rings are expected to be closed. Self-intersection is assumed
/// absent and never validated.
///
/// # Examples
///
/// ```
/// use anime_core::Geometry;
/// use geo::{Coord, Point};
///
/// let geometry = Geometry::from(Point::new(1.0, 2.0));
/// assert_eq!(geometry.representative_point(), Some(Coord { x: 1.0, y: 2.0 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Geometry {
    /// A single position.
    Point(Point<f64>),
    /// An ordered path of positions.
    LineString(LineString<f64>),
    /// A polygon with an exterior ring and optional holes.
    Polygon(Polygon<f64>),
    /// A collection of polygons treated as one feature.
    MultiPolygon(MultiPolygon<f64>),
}

/// Coarse classification of a [`Geometry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// Zero-dimensional.
    Point,
    /// One-dimensional.
    Linear,
    /// Two-dimensional.
    Areal,
}

impl Geometry {
    /// Dimension class of the geometry.
    #[must_use]
    pub const fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::Linear,
            Self::Polygon(_) | Self::MultiPolygon(_) => GeometryKind::Areal,
        }
    }

    /// Number of coordinates held by the geometry.
    #[must_use]
    pub fn coord_count(&self) -> usize {
        match self {
            Self::Point(point) => point.coords_count(),
            Self::LineString(line) => line.coords_count(),
            Self::Polygon(polygon) => polygon.coords_count(),
            Self::MultiPolygon(polygons) => polygons.coords_count(),
        }
    }

    /// Returns `true` when every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Point(point) => all_finite(point),
            Self::LineString(line) => all_finite(line),
            Self::Polygon(polygon) => all_finite(polygon),
            Self::MultiPolygon(polygons) => all_finite(polygons),
        }
    }

    /// Axis-aligned bounds, or `None` for a geometry without coordinates.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let rect = match self {
            Self::Point(point) => Some(point.bounding_rect()),
            Self::LineString(line) => line.bounding_rect(),
            Self::Polygon(polygon) => polygon.bounding_rect(),
            Self::MultiPolygon(polygons) => polygons.bounding_rect(),
        };
        rect.map(BoundingBox::from)
    }

    /// A point standing in for the whole geometry when searching.
    ///
    /// Points represent themselves. Lines and polygons use their centroid,
    /// falling back to the centre of their bounds when the centroid is
    /// undefined (for example a polygon with zero area).
    #[must_use]
    pub fn representative_point(&self) -> Option<Coord<f64>> {
        let centroid = match self {
            Self::Point(point) => return Some(point.0),
            Self::LineString(line) => line.centroid(),
            Self::Polygon(polygon) => polygon.centroid(),
            Self::MultiPolygon(polygons) => polygons.centroid(),
        };
        centroid
            .map(|point| point.0)
            .or_else(|| self.bounding_box().map(|bbox| bbox.center()))
    }

    /// Euclidean distance from `point` to the geometry.
    ///
    /// Points inside a polygon are at distance zero.
    #[must_use]
    pub fn distance_to_point(&self, point: &Point<f64>) -> f64 {
        match self {
            Self::Point(other) => Euclidean.distance(point, other),
            Self::LineString(line) => Euclidean.distance(point, line),
            Self::Polygon(polygon) => Euclidean.distance(point, polygon),
            Self::MultiPolygon(polygons) => Euclidean.distance(point, polygons),
        }
    }
}

fn all_finite<G>(geometry: &G) -> bool
where
    G: CoordsIter<Scalar = f64>,
{
    geometry
        .coords_iter()
        .all(|coord| coord.x.is_finite() && coord.y.is_finite())
}

impl From<Point<f64>> for Geometry {
    fn from(point: Point<f64>) -> Self {
        Self::Point(point)
    }
}

impl From<Coord<f64>> for Geometry {
    fn from(coord: Coord<f64>) -> Self {
        Self::Point(Point(coord))
    }
}

impl From<LineString<f64>> for Geometry {
    fn from(line: LineString<f64>) -> Self {
        Self::LineString(line)
    }
}

impl From<Polygon<f64>> for Geometry {
    fn from(polygon: Polygon<f64>) -> Self {
        Self::Polygon(polygon)
    }
}

impl From<MultiPolygon<f64>> for Geometry {
    fn from(polygons: MultiPolygon<f64>) -> Self {
        Self::MultiPolygon(polygons)
    }
}

/// Axis-aligned bounding box with normalised corners (`min <= max`).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    min: Coord<f64>,
    max: Coord<f64>,
}

impl BoundingBox {
    /// Build a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Coord<f64>, b: Coord<f64>) -> Self {
        Self {
            min: Coord {
                x: a.x.min(b.x),
                y: a.y.min(b.y),
            },
            max: Coord {
                x: a.x.max(b.x),
                y: a.y.max(b.y),
            },
        }
    }

    /// Degenerate box covering a single position.
    #[must_use]
    pub const fn from_point(coord: Coord<f64>) -> Self {
        Self {
            min: coord,
            max: coord,
        }
    }

    /// Lower-left corner.
    #[must_use]
    pub const fn min(&self) -> Coord<f64> {
        self.min
    }

    /// Upper-right corner.
    #[must_use]
    pub const fn max(&self) -> Coord<f64> {
        self.max
    }

    /// Centre of the box.
    #[must_use]
    pub fn center(&self) -> Coord<f64> {
        Coord {
            x: (self.min.x + self.max.x) / 2.0,
            y: (self.min.y + self.max.y) / 2.0,
        }
    }

    /// Grow the box by `margin` on every side.
    #[must_use]
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: Coord {
                x: self.min.x - margin,
                y: self.min.y - margin,
            },
            max: Coord {
                x: self.max.x + margin,
                y: self.max.y + margin,
            },
        }
    }

    /// Returns `true` when the boxes share at least one point.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Shortest Euclidean distance between the boxes; zero when they touch.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = (other.min.x - self.max.x)
            .max(self.min.x - other.max.x)
            .max(0.0);
        let dy = (other.min.y - self.max.y)
            .max(self.min.y - other.max.y)
            .max(0.0);
        dx.hypot(dy)
    }

    pub(crate) fn to_aabb(self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min.x, self.min.y], [self.max.x, self.max.y])
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        Self {
            min: rect.min(),
            max: rect.max(),
        }
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Self::new(bbox.min, bbox.max)
    }
}
