//! k-nearest candidate matching of targets against an indexed source layer.

use anime_core::{CancellationToken, Feature, GeometrySet, MatchRecord, MatchTable, SpatialIndex};
use rayon::prelude::*;

use crate::{MatchConfig, MatchError, Parallelism};

/// Targets each worker should receive before matching goes parallel.
const MIN_TARGETS_PER_THREAD: usize = 32;

/// Matches every target to its nearest sources.
///
/// A matcher is a validated [`MatchConfig`]; it holds no per-run state and
/// can be shared between threads.
///
/// # Examples
///
/// ```
/// use anime_core::{FeatureId, GeometrySet, SpatialIndex};
/// use anime_matcher::{MatchConfig, Matcher};
/// use geo::Point;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let sources = GeometrySet::from_geometries([Point::new(0.0, 0.0), Point::new(10.0, 10.0)])?;
/// let targets = GeometrySet::from_geometries([Point::new(1.0, 0.0)])?;
/// let index = SpatialIndex::build(&sources)?;
///
/// let matcher = Matcher::new(MatchConfig::new(1, 5.0)?)?;
/// let table = matcher.match_all(&targets, &index)?;
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.records()[0].source_id, FeatureId(0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher {
    config: MatchConfig,
}

impl Matcher {
    /// Construct a matcher from a configuration.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidParameter`] when the configuration is
    /// out of range.
    pub fn new(config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match every target in `targets` against `index`.
    ///
    /// # Errors
    /// Returns [`MatchError::ThreadPool`] when a dedicated worker pool
    /// cannot be built.
    pub fn match_all(
        &self,
        targets: &GeometrySet,
        index: &SpatialIndex<'_>,
    ) -> Result<MatchTable, MatchError> {
        self.match_all_with_cancel(targets, index, &CancellationToken::new())
    }

    /// Match every target, polling `cancel` before each one.
    ///
    /// Records are grouped by target in input order and ranked by ascending
    /// distance within a target, whatever the thread count. A target with
    /// no source in range contributes no records.
    ///
    /// # Errors
    /// Returns [`MatchError::Cancelled`] once `cancel` is observed, in which
    /// case no partial table is produced, or [`MatchError::ThreadPool`]
    /// when a dedicated worker pool cannot be built.
    pub fn match_all_with_cancel(
        &self,
        targets: &GeometrySet,
        index: &SpatialIndex<'_>,
        cancel: &CancellationToken,
    ) -> Result<MatchTable, MatchError> {
        let parallelism = Parallelism::from_threads(self.config.n_threads)
            .for_workload(targets.len(), MIN_TARGETS_PER_THREAD);
        let match_one = |target: &Feature| self.match_target(target, index, cancel);

        let groups = if parallelism.is_parallel() {
            parallelism.install(|| {
                targets
                    .features()
                    .par_iter()
                    .map(match_one)
                    .collect::<Result<Vec<_>, MatchError>>()
            })??
        } else {
            targets
                .iter()
                .map(match_one)
                .collect::<Result<Vec<_>, MatchError>>()?
        };

        let table = MatchTable::from_groups(groups, index.source_ids().clone())?;
        log::debug!(
            "matched {} targets against {} sources on {} thread(s): {} records",
            targets.len(),
            index.len(),
            parallelism.workers(),
            table.len()
        );
        Ok(table)
    }

    fn match_target(
        &self,
        target: &Feature,
        index: &SpatialIndex<'_>,
        cancel: &CancellationToken,
    ) -> Result<Vec<MatchRecord>, MatchError> {
        if cancel.is_cancelled() {
            return Err(MatchError::Cancelled);
        }
        let Some(point) = target.geometry().representative_point() else {
            log::debug!("target {} has no representative point", target.id());
            return Ok(Vec::new());
        };
        let neighbours = index.nearest(point, self.config.k, self.config.max_distance)?;
        Ok(neighbours
            .into_iter()
            .zip(0_u32..)
            .map(|(neighbour, rank)| MatchRecord {
                target_id: target.id(),
                source_id: neighbour.id,
                distance: neighbour.distance,
                rank,
            })
            .collect())
    }
}

/// Match `targets` against `index` with up to `k` candidates per target
/// within `max_distance`, using the current rayon pool.
///
/// # Errors
/// Returns [`MatchError::InvalidParameter`] when `k == 0` or
/// `max_distance` is negative or NaN.
pub fn match_all(
    targets: &GeometrySet,
    index: &SpatialIndex<'_>,
    k: usize,
    max_distance: f64,
) -> Result<MatchTable, MatchError> {
    Matcher::new(MatchConfig::new(k, max_distance)?)?.match_all(targets, index)
}
