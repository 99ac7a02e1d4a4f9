//! Parallel k-nearest matching of target features to source features.
//!
//! [`Matcher`] queries an [`anime_core::SpatialIndex`] once per target and
//! assembles the answers into an [`anime_core::MatchTable`]. Targets are
//! matched independently, optionally on a rayon pool, and the table always
//! lists them in input order.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod matcher;
mod parallelism;

pub use config::MatchConfig;
pub use error::MatchError;
pub use matcher::{Matcher, match_all};
pub use parallelism::Parallelism;
