//! Identified geometry collections.
//!
//! A [`GeometrySet`] is the immutable store the index and matcher borrow.
//! Each entry pairs a [`FeatureId`] with its [`Geometry`] and caches the
//! bounding box computed at construction.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::geometry::{BoundingBox, Geometry};

/// Identifier of a feature, unique within its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct FeatureId(pub u64);

impl FeatureId {
    /// Raw integer value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for FeatureId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<FeatureId> for u64 {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

/// A geometry together with its identifier and cached bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    geometry: Geometry,
    bbox: BoundingBox,
}

impl Feature {
    /// Identifier of the feature.
    #[must_use]
    pub const fn id(&self) -> FeatureId {
        self.id
    }

    /// Geometry of the feature.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Bounds computed when the set was built.
    #[must_use]
    pub const fn bbox(&self) -> BoundingBox {
        self.bbox
    }
}

/// Errors returned while assembling a [`GeometrySet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometrySetError {
    /// The same identifier appeared twice.
    #[error("feature id {id} appears more than once")]
    DuplicateFeatureId {
        /// Repeated identifier.
        id: FeatureId,
    },
    /// A geometry had no coordinates.
    #[error("feature {id} has an empty geometry")]
    EmptyGeometry {
        /// Identifier of the offending feature.
        id: FeatureId,
    },
    /// A geometry contained a NaN or infinite coordinate.
    #[error("feature {id} contains a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Identifier of the offending feature.
        id: FeatureId,
    },
    /// Parallel identifier and geometry columns differed in length.
    #[error("{ids} identifiers supplied for {geometries} geometries")]
    LengthMismatch {
        /// Number of identifiers.
        ids: usize,
        /// Number of geometries.
        geometries: usize,
    },
}

/// Ordered, immutable collection of identified geometries.
///
/// # Examples
///
/// ```
/// use anime_core::{FeatureId, Geometry, GeometrySet};
/// use geo::Point;
///
/// # fn main() -> Result<(), anime_core::GeometrySetError> {
/// let set = GeometrySet::new([
///     (FeatureId(7), Geometry::from(Point::new(0.0, 0.0))),
///     (FeatureId(3), Geometry::from(Point::new(1.0, 1.0))),
/// ])?;
/// assert_eq!(set.len(), 2);
/// assert_eq!(set.ids().collect::<Vec<_>>(), vec![FeatureId(7), FeatureId(3)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeometrySet {
    features: Vec<Feature>,
    positions: HashMap<FeatureId, usize>,
}

impl GeometrySet {
    /// Validate and collect `(id, geometry)` pairs, preserving their order.
    ///
    /// # Errors
    /// Returns [`GeometrySetError`] when an id repeats or a geometry is empty
    /// or holds non-finite coordinates.
    pub fn new<I>(entries: I) -> Result<Self, GeometrySetError>
    where
        I: IntoIterator<Item = (FeatureId, Geometry)>,
    {
        let entries = entries.into_iter();
        let mut features = Vec::with_capacity(entries.size_hint().0);
        let mut positions = HashMap::with_capacity(entries.size_hint().0);
        for (id, geometry) in entries {
            if !geometry.is_finite() {
                return Err(GeometrySetError::NonFiniteCoordinate { id });
            }
            let bbox = geometry
                .bounding_box()
                .ok_or(GeometrySetError::EmptyGeometry { id })?;
            if positions.insert(id, features.len()).is_some() {
                return Err(GeometrySetError::DuplicateFeatureId { id });
            }
            features.push(Feature { id, geometry, bbox });
        }
        Ok(Self {
            features,
            positions,
        })
    }

    /// Build a set from parallel identifier and geometry columns.
    ///
    /// # Errors
    /// Returns [`GeometrySetError::LengthMismatch`] when the columns differ
    /// in length, otherwise the same errors as [`GeometrySet::new`].
    pub fn from_columns(
        ids: Vec<FeatureId>,
        geometries: Vec<Geometry>,
    ) -> Result<Self, GeometrySetError> {
        if ids.len() != geometries.len() {
            return Err(GeometrySetError::LengthMismatch {
                ids: ids.len(),
                geometries: geometries.len(),
            });
        }
        Self::new(ids.into_iter().zip(geometries))
    }

    /// Build a set whose identifiers are the input positions `0..n`.
    ///
    /// # Errors
    /// Same as [`GeometrySet::new`], minus duplicate identifiers.
    pub fn from_geometries<I, G>(geometries: I) -> Result<Self, GeometrySetError>
    where
        I: IntoIterator<Item = G>,
        G: Into<Geometry>,
    {
        Self::new(
            (0_u64..)
                .zip(geometries)
                .map(|(position, geometry)| (FeatureId(position), geometry.into())),
        )
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` when the set holds no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in input order.
    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterate over features in input order.
    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Identifiers in input order.
    pub fn ids(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.features.iter().map(Feature::id)
    }

    /// Look up a feature by identifier.
    #[must_use]
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.positions
            .get(&id)
            .and_then(|&position| self.features.get(position))
    }

    /// Returns `true` when `id` belongs to the set.
    #[must_use]
    pub fn contains(&self, id: FeatureId) -> bool {
        self.positions.contains_key(&id)
    }
}

impl<'a> IntoIterator for &'a GeometrySet {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
