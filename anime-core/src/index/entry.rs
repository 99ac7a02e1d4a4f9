//! R\*-tree entries referencing borrowed source geometries.

use geo::Point;
use rstar::{AABB, PointDistance, RTreeObject};

use crate::feature::{Feature, FeatureId};
use crate::geometry::{BoundingBox, Geometry};

/// A source feature as stored in the tree.
///
/// The envelope is the feature's cached bounding box; distances are measured
/// against the exact geometry so ranking reflects true proximity rather than
/// box proximity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IndexedFeature<'a> {
    id: FeatureId,
    bbox: BoundingBox,
    geometry: &'a Geometry,
}

impl<'a> IndexedFeature<'a> {
    pub(crate) const fn new(feature: &'a Feature) -> Self {
        Self {
            id: feature.id(),
            bbox: feature.bbox(),
            geometry: feature.geometry(),
        }
    }

    pub(crate) const fn id(&self) -> FeatureId {
        self.id
    }

    pub(crate) const fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub(crate) fn distance_to(&self, point: &Point<f64>) -> f64 {
        self.geometry.distance_to_point(point)
    }
}

impl RTreeObject for IndexedFeature<'_> {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.bbox.to_aabb()
    }
}

impl PointDistance for IndexedFeature<'_> {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let distance = self.distance_to(&Point::new(point[0], point[1]));
        distance * distance
    }
}
