//! Bounding-volume index over source geometries.
//!
//! [`SpatialIndex`] bulk-loads an R\*-tree once over a borrowed
//! [`GeometrySet`] and answers k-nearest and envelope queries. The tree is
//! never updated incrementally; rebuild it when the sources change.
//!
//! Errors are returned for empty inputs and invalid query parameters.

mod entry;
mod error;

use std::collections::BTreeSet;
use std::sync::Arc;

use geo::{Coord, Point};
use rstar::RTree;

use crate::feature::{FeatureId, GeometrySet};
use crate::geometry::{BoundingBox, Geometry};
use crate::params::check_search_parameters;

use entry::IndexedFeature;
pub use error::IndexError;

/// The shape a nearest-neighbour query is measured from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    /// Distances are measured from a point to each source geometry.
    Point(Coord<f64>),
    /// Distances are measured between the envelope and each source's bounds.
    Envelope(BoundingBox),
}

impl From<Coord<f64>> for Query {
    fn from(coord: Coord<f64>) -> Self {
        Self::Point(coord)
    }
}

impl From<Point<f64>> for Query {
    fn from(point: Point<f64>) -> Self {
        Self::Point(point.0)
    }
}

impl From<BoundingBox> for Query {
    fn from(bbox: BoundingBox) -> Self {
        Self::Envelope(bbox)
    }
}

/// A source returned by [`SpatialIndex::nearest`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Identifier of the source feature.
    pub id: FeatureId,
    /// Distance from the query.
    pub distance: f64,
}

/// Read-only R\*-tree over a set of source features.
///
/// The index borrows the sources it was built from and is `Sync`, so a
/// single instance can serve many concurrent queries.
///
/// # Examples
///
/// ```
/// use anime_core::{FeatureId, GeometrySet, SpatialIndex};
/// use geo::{Coord, Point};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sources = GeometrySet::from_geometries([Point::new(0.0, 0.0), Point::new(10.0, 10.0)])?;
/// let index = SpatialIndex::build(&sources)?;
/// let found = index.nearest(Coord { x: 1.0, y: 0.0 }, 1, f64::INFINITY)?;
/// assert_eq!(found.first().map(|n| n.id), Some(FeatureId(0)));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SpatialIndex<'a> {
    tree: RTree<IndexedFeature<'a>>,
    sources: &'a GeometrySet,
    source_ids: Arc<BTreeSet<FeatureId>>,
}

impl<'a> SpatialIndex<'a> {
    /// Bulk-load an index over `sources`.
    ///
    /// Entries are ordered by [`FeatureId`] before loading so the same
    /// sources always produce the same tree.
    ///
    /// # Errors
    /// Returns [`IndexError::EmptyInput`] when `sources` is empty.
    pub fn build(sources: &'a GeometrySet) -> Result<Self, IndexError> {
        if sources.is_empty() {
            return Err(IndexError::EmptyInput);
        }
        let mut entries: Vec<IndexedFeature<'a>> =
            sources.iter().map(IndexedFeature::new).collect();
        entries.sort_unstable_by_key(IndexedFeature::id);
        let source_ids: BTreeSet<FeatureId> = entries.iter().map(IndexedFeature::id).collect();
        let tree = RTree::bulk_load(entries);
        log::debug!("built spatial index over {} source features", tree.size());
        Ok(Self {
            tree,
            sources,
            source_ids: Arc::new(source_ids),
        })
    }

    /// Number of indexed features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Returns `true` when the index holds no features.
    ///
    /// Always `false` for an index returned by [`SpatialIndex::build`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The sources the index was built from.
    #[must_use]
    pub const fn sources(&self) -> &'a GeometrySet {
        self.sources
    }

    /// Identifiers of every indexed source, in ascending order.
    #[must_use]
    pub fn source_ids(&self) -> &Arc<BTreeSet<FeatureId>> {
        &self.source_ids
    }

    /// Geometry of an indexed source.
    #[must_use]
    pub fn geometry(&self, id: FeatureId) -> Option<&'a Geometry> {
        self.sources.get(id).map(|feature| feature.geometry())
    }

    /// Sources whose bounds intersect `bbox`, sorted by identifier.
    #[must_use]
    pub fn within(&self, bbox: &BoundingBox) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = self
            .tree
            .locate_in_envelope_intersecting(&bbox.to_aabb())
            .map(IndexedFeature::id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Up to `k` sources nearest to `query` and no farther than
    /// `max_distance`.
    ///
    /// Results are ordered by ascending distance, ties broken by ascending
    /// [`FeatureId`]. Pass `f64::INFINITY` for an unbounded radius.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidParameter`] when `k == 0` or
    /// `max_distance` is negative or NaN.
    pub fn nearest(
        &self,
        query: impl Into<Query>,
        k: usize,
        max_distance: f64,
    ) -> Result<Vec<Neighbour>, IndexError> {
        check_search_parameters(k, max_distance)?;
        let found = match query.into() {
            Query::Point(coord) => self.nearest_to_point(coord, k, max_distance),
            Query::Envelope(bbox) => self.nearest_to_envelope(&bbox, k, max_distance),
        };
        Ok(found)
    }

    fn nearest_to_point(&self, coord: Coord<f64>, k: usize, max_distance: f64) -> Vec<Neighbour> {
        let point = Point(coord);
        let mut found = Vec::with_capacity(k.min(self.len()));
        let mut cutoff: Option<f64> = None;
        for entry in self.tree.nearest_neighbor_iter(&[coord.x, coord.y]) {
            let distance = entry.distance_to(&point);
            if distance > max_distance || cutoff.is_some_and(|kth| distance > kth) {
                break;
            }
            found.push(Neighbour {
                id: entry.id(),
                distance,
            });
            // Keep draining entries tied with the k-th so the id tie-break
            // sees all of them.
            if cutoff.is_none() && found.len() == k {
                cutoff = Some(distance);
            }
        }
        rank(&mut found, k);
        found
    }

    fn nearest_to_envelope(
        &self,
        bbox: &BoundingBox,
        k: usize,
        max_distance: f64,
    ) -> Vec<Neighbour> {
        let measure = |entry: &IndexedFeature<'_>| Neighbour {
            id: entry.id(),
            distance: bbox.distance_to(&entry.bbox()),
        };
        let mut found: Vec<Neighbour> = if max_distance.is_finite() {
            self.tree
                .locate_in_envelope_intersecting(&bbox.expand(max_distance).to_aabb())
                .map(measure)
                .filter(|neighbour| neighbour.distance <= max_distance)
                .collect()
        } else {
            self.tree.iter().map(measure).collect()
        };
        rank(&mut found, k);
        found
    }
}

fn rank(found: &mut Vec<Neighbour>, k: usize) {
    found.sort_unstable_by(|lhs, rhs| {
        lhs.distance
            .total_cmp(&rhs.distance)
            .then_with(|| lhs.id.cmp(&rhs.id))
    });
    found.truncate(k);
}
