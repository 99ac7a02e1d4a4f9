//! Facade crate for the ANIME spatial matching engine.
//!
//! This crate re-exports the core geometry, index, and match-table types and
//! exposes the matcher and interpolator behind feature flags.
//!
//! ```
//! use anime_engine::{ExtensiveValues, FeatureId, GeometrySet, SpatialIndex};
//! use anime_engine::{interpolate_extensive, match_all};
//! use geo::Point;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let sources = GeometrySet::from_geometries([Point::new(0.0, 0.0), Point::new(10.0, 10.0)])?;
//! let targets = GeometrySet::from_geometries([Point::new(-1.0, 0.0), Point::new(1.0, 0.0)])?;
//!
//! let index = SpatialIndex::build(&sources)?;
//! let matches = match_all(&targets, &index, 1, 5.0)?;
//!
//! let values = ExtensiveValues::new([(FeatureId(0), 100.0)])?;
//! let result = interpolate_extensive(&values, &matches, None)?;
//! assert_eq!(result.get(FeatureId(0)), Some(50.0));
//! assert_eq!(result.get(FeatureId(1)), Some(50.0));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use anime_core::{
    BoundingBox, CancellationToken, Feature, FeatureId, Geometry, GeometryKind, GeometrySet,
    GeometrySetError, IndexError, MatchColumns, MatchRecord, MatchTable, MatchTableError,
    Neighbour, ParameterError, Query, SpatialIndex,
};

#[cfg(feature = "test-support")]
pub use anime_core::test_support;

#[cfg(feature = "matcher")]
pub use anime_matcher::{MatchConfig, MatchError, Matcher, Parallelism, match_all};

#[cfg(feature = "interp")]
pub use anime_interp::{
    ExtensiveValues, InterpolatedColumns, Interpolation, InterpolationConfig, InterpolationError,
    Interpolator, MissingValuePolicy, OverlapConfig, SourceValues, Tensive,
    interpolate_extensive, interpolate_intensive, overlap, overlap_weights,
};
