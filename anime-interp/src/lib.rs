//! Areal interpolation of source values onto matched targets.
//!
//! Given a [`MatchTable`](anime_core::MatchTable) and per-source values,
//! [`Interpolator`] redistributes extensive quantities (counts, totals) and
//! averages intensive ones (densities, rates). Weights come from the caller,
//! typically [`overlap_weights`], or default to inverse match distance.
//!
//! Values for sources outside the match table are handled according to an
//! explicit [`MissingValuePolicy`].

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod interpolation;
mod interpolator;
mod overlap;
mod values;
mod weights;

pub use config::{InterpolationConfig, MissingValuePolicy, OverlapConfig, Tensive};
pub use error::InterpolationError;
pub use interpolation::{InterpolatedColumns, Interpolation};
pub use interpolator::{Interpolator, interpolate_extensive, interpolate_intensive};
pub use overlap::{overlap, overlap_weights};
pub use values::{ExtensiveValues, SourceValues};
