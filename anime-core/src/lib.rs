//! Core spatial types for the ANIME matching engine.
//!
//! The crate owns the data model shared by matching and interpolation:
//! validated geometry collections, a bulk-loaded R\*-tree over source
//! features, the target/source correspondence table, and the cancellation
//! token polled by long-running work.
//!
//! Constructors return `Result` so malformed input is rejected at the
//! boundary rather than deep inside a query.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod feature;
mod geometry;
pub mod index;
mod params;
mod table;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use feature::{Feature, FeatureId, GeometrySet, GeometrySetError};
pub use geometry::{BoundingBox, Geometry, GeometryKind};
pub use index::{IndexError, Neighbour, Query, SpatialIndex};
pub use params::{ParameterError, check_search_parameters};
pub use table::{MatchColumns, MatchRecord, MatchTable, MatchTableError};

/// Token polled by the matcher and interpolator between units of work.
pub use tokio_util::sync::CancellationToken;
