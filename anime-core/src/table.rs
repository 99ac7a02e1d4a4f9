//! Correspondences between target and source features.
//!
//! A [`MatchTable`] is produced once by the matcher and is immutable
//! afterwards. Records are grouped by target in the order targets were
//! supplied, and ordered by ascending distance within a target.

use std::collections::BTreeSet;
use std::sync::Arc;

use thiserror::Error;

use crate::feature::FeatureId;

/// One target/source correspondence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchRecord {
    /// Matched target feature.
    pub target_id: FeatureId,
    /// Candidate source feature.
    pub source_id: FeatureId,
    /// Distance from the target's representative point to the source.
    pub distance: f64,
    /// Position of the source among the target's candidates, starting at 0.
    pub rank: u32,
}

/// Errors raised when assembling a [`MatchTable`] from external columns.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatchTableError {
    /// Columns had different lengths.
    #[error("match columns differ in length (target_id {target_id}, source_id {source_id}, distance {distance}, rank {rank})")]
    ColumnLengthMismatch {
        /// Length of `target_id`.
        target_id: usize,
        /// Length of `source_id`.
        source_id: usize,
        /// Length of `distance`.
        distance: usize,
        /// Length of `rank`.
        rank: usize,
    },
    /// A record referenced a source that is not part of the table's sources.
    #[error("record for target {target_id} references unknown source {source_id}")]
    UnknownSource {
        /// Target of the offending record.
        target_id: FeatureId,
        /// Unknown source identifier.
        source_id: FeatureId,
    },
    /// Records for one target were not contiguous.
    #[error("records for target {target_id} are not contiguous")]
    TargetNotContiguous {
        /// Target whose records were split.
        target_id: FeatureId,
    },
    /// Ranks within a target did not run `0, 1, 2, …` with non-decreasing
    /// distance.
    #[error("records for target {target_id} are not ranked by ascending distance")]
    RankOutOfOrder {
        /// Target with inconsistent ranks.
        target_id: FeatureId,
    },
    /// A distance was negative or NaN.
    #[error("record for target {target_id} has invalid distance {distance}")]
    InvalidDistance {
        /// Target of the offending record.
        target_id: FeatureId,
        /// Rejected distance.
        distance: f64,
    },
}

/// Ordered, immutable table of [`MatchRecord`] values.
///
/// The table also remembers which source identifiers were searched, so a
/// consumer can tell a source that matched nothing apart from one that was
/// never indexed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MatchTable {
    records: Vec<MatchRecord>,
    sources: Arc<BTreeSet<FeatureId>>,
}

impl MatchTable {
    /// Assemble a table from per-target groups in target input order.
    ///
    /// Empty groups are dropped.
    ///
    /// # Errors
    /// Returns [`MatchTableError`] when a group references a source outside
    /// `sources`, a target appears in two groups, or ranks do not follow
    /// ascending distance.
    pub fn from_groups(
        groups: Vec<Vec<MatchRecord>>,
        sources: Arc<BTreeSet<FeatureId>>,
    ) -> Result<Self, MatchTableError> {
        let records: Vec<MatchRecord> = groups.into_iter().flatten().collect();
        validate(&records, &sources)?;
        Ok(Self { records, sources })
    }

    /// Rebuild a table from parallel columns.
    ///
    /// # Errors
    /// Returns [`MatchTableError`] when the columns differ in length,
    /// reference unknown sources, or break the grouping and ranking order.
    ///
    /// # Examples
    ///
    /// ```
    /// use anime_core::{FeatureId, MatchColumns, MatchTable};
    ///
    /// # fn main() -> Result<(), anime_core::MatchTableError> {
    /// let columns = MatchColumns {
    ///     target_id: vec![1, 1],
    ///     source_id: vec![10, 11],
    ///     distance: vec![0.5, 2.0],
    ///     rank: vec![0, 1],
    /// };
    /// let table = MatchTable::from_columns(columns, [FeatureId(10), FeatureId(11)])?;
    /// assert_eq!(table.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_columns<I>(columns: MatchColumns, sources: I) -> Result<Self, MatchTableError>
    where
        I: IntoIterator<Item = FeatureId>,
    {
        let MatchColumns {
            target_id,
            source_id,
            distance,
            rank,
        } = columns;
        let len = target_id.len();
        if source_id.len() != len || distance.len() != len || rank.len() != len {
            return Err(MatchTableError::ColumnLengthMismatch {
                target_id: len,
                source_id: source_id.len(),
                distance: distance.len(),
                rank: rank.len(),
            });
        }
        let records: Vec<MatchRecord> = target_id
            .into_iter()
            .zip(source_id)
            .zip(distance.into_iter().zip(rank))
            .map(|((target, source), (distance, rank))| MatchRecord {
                target_id: FeatureId(target),
                source_id: FeatureId(source),
                distance,
                rank,
            })
            .collect();
        let sources: BTreeSet<FeatureId> = sources.into_iter().collect();
        validate(&records, &sources)?;
        Ok(Self {
            records,
            sources: Arc::new(sources),
        })
    }

    /// All records in table order.
    #[must_use]
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Iterate over records in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` when no target matched any source.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers of the sources that were searched.
    #[must_use]
    pub fn sources(&self) -> &BTreeSet<FeatureId> {
        &self.sources
    }

    /// Records grouped by target, in target input order.
    ///
    /// Targets without matches do not appear.
    pub fn groups(&self) -> impl Iterator<Item = (FeatureId, &[MatchRecord])> + '_ {
        self.records
            .chunk_by(|lhs, rhs| lhs.target_id == rhs.target_id)
            .filter_map(|group| group.first().map(|record| (record.target_id, group)))
    }

    /// Records for a single target, empty when it matched nothing.
    #[must_use]
    pub fn for_target(&self, target_id: FeatureId) -> &[MatchRecord] {
        self.groups()
            .find(|(id, _)| *id == target_id)
            .map_or(&[], |(_, group)| group)
    }

    /// Export as parallel columns for columnar tooling.
    #[must_use]
    pub fn to_columns(&self) -> MatchColumns {
        let mut columns = MatchColumns::with_capacity(self.records.len());
        for record in &self.records {
            columns.target_id.push(record.target_id.get());
            columns.source_id.push(record.source_id.get());
            columns.distance.push(record.distance);
            columns.rank.push(record.rank);
        }
        columns
    }
}

impl<'a> IntoIterator for &'a MatchTable {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(records: &[MatchRecord], sources: &BTreeSet<FeatureId>) -> Result<(), MatchTableError> {
    let mut seen_targets = BTreeSet::new();
    for group in records.chunk_by(|lhs, rhs| lhs.target_id == rhs.target_id) {
        let Some(first) = group.first() else {
            continue;
        };
        let target_id = first.target_id;
        if !seen_targets.insert(target_id) {
            return Err(MatchTableError::TargetNotContiguous { target_id });
        }
        let mut previous = 0.0_f64;
        for (position, record) in group.iter().enumerate() {
            if !sources.contains(&record.source_id) {
                return Err(MatchTableError::UnknownSource {
                    target_id,
                    source_id: record.source_id,
                });
            }
            if record.distance.is_nan() || record.distance < 0.0 {
                return Err(MatchTableError::InvalidDistance {
                    target_id,
                    distance: record.distance,
                });
            }
            let expected_rank = u32::try_from(position).ok();
            if expected_rank != Some(record.rank) || record.distance < previous {
                return Err(MatchTableError::RankOutOfOrder { target_id });
            }
            previous = record.distance;
        }
    }
    Ok(())
}

/// A [`MatchTable`] as parallel columns.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatchColumns {
    /// Target identifiers.
    pub target_id: Vec<u64>,
    /// Source identifiers.
    pub source_id: Vec<u64>,
    /// Match distances.
    pub distance: Vec<f64>,
    /// Candidate ranks.
    pub rank: Vec<u32>,
}

impl MatchColumns {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            target_id: Vec::with_capacity(capacity),
            source_id: Vec::with_capacity(capacity),
            distance: Vec::with_capacity(capacity),
            rank: Vec::with_capacity(capacity),
        }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.target_id.len()
    }

    /// Returns `true` when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.target_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn record(target: u64, source: u64, distance: f64, rank: u32) -> MatchRecord {
        MatchRecord {
            target_id: FeatureId(target),
            source_id: FeatureId(source),
            distance,
            rank,
        }
    }

    #[fixture]
    fn sources() -> Arc<BTreeSet<FeatureId>> {
        Arc::new([FeatureId(10), FeatureId(11), FeatureId(12)].into())
    }

    #[fixture]
    fn table(sources: Arc<BTreeSet<FeatureId>>) -> MatchTable {
        MatchTable::from_groups(
            vec![
                vec![record(2, 11, 0.0, 0), record(2, 10, 1.5, 1)],
                Vec::new(),
                vec![record(1, 12, 3.0, 0)],
            ],
            sources,
        )
        .expect("well-formed groups")
    }

    #[rstest]
    fn groups_follow_target_order(table: MatchTable) {
        let targets: Vec<_> = table.groups().map(|(id, group)| (id, group.len())).collect();
        assert_eq!(targets, vec![(FeatureId(2), 2), (FeatureId(1), 1)]);
        assert_eq!(table.for_target(FeatureId(1)), &[record(1, 12, 3.0, 0)]);
        assert!(table.for_target(FeatureId(9)).is_empty());
    }

    #[rstest]
    fn columns_preserve_record_order(table: MatchTable) {
        let columns = table.to_columns();
        assert_eq!(columns.target_id, vec![2, 2, 1]);
        assert_eq!(columns.source_id, vec![11, 10, 12]);
        assert_eq!(columns.distance, vec![0.0, 1.5, 3.0]);
        assert_eq!(columns.rank, vec![0, 1, 0]);
    }

    #[rstest]
    fn columns_rebuild_an_equal_table(table: MatchTable, sources: Arc<BTreeSet<FeatureId>>) {
        let rebuilt = MatchTable::from_columns(table.to_columns(), sources.iter().copied())
            .expect("valid columns");
        assert_eq!(rebuilt, table);
    }

    #[rstest]
    fn mismatched_columns_are_rejected(sources: Arc<BTreeSet<FeatureId>>) {
        let columns = MatchColumns {
            target_id: vec![1, 1],
            source_id: vec![10],
            distance: vec![0.0, 1.0],
            rank: vec![0, 1],
        };
        assert!(matches!(
            MatchTable::from_columns(columns, sources.iter().copied()),
            Err(MatchTableError::ColumnLengthMismatch { .. })
        ));
    }

    #[rstest]
    #[case(
        MatchColumns { target_id: vec![1, 2, 1], source_id: vec![10, 10, 11], distance: vec![0.0, 0.0, 1.0], rank: vec![0, 0, 1] },
        MatchTableError::TargetNotContiguous { target_id: FeatureId(1) }
    )]
    #[case(
        MatchColumns { target_id: vec![1, 1], source_id: vec![10, 11], distance: vec![2.0, 1.0], rank: vec![0, 1] },
        MatchTableError::RankOutOfOrder { target_id: FeatureId(1) }
    )]
    #[case(
        MatchColumns { target_id: vec![1], source_id: vec![99], distance: vec![0.0], rank: vec![0] },
        MatchTableError::UnknownSource { target_id: FeatureId(1), source_id: FeatureId(99) }
    )]
    fn malformed_columns_are_rejected(
        sources: Arc<BTreeSet<FeatureId>>,
        #[case] columns: MatchColumns,
        #[case] expected: MatchTableError,
    ) {
        let error = MatchTable::from_columns(columns, sources.iter().copied())
            .expect_err("malformed columns");
        assert_eq!(error, expected);
    }

    #[rstest]
    #[case(
        vec![vec![record(1, 10, 0.0, 0)], vec![record(2, 12, 0.5, 0)], vec![record(1, 11, 1.0, 0)]],
        MatchTableError::TargetNotContiguous { target_id: FeatureId(1) }
    )]
    #[case(
        vec![vec![record(1, 10, 0.0, 1)]],
        MatchTableError::RankOutOfOrder { target_id: FeatureId(1) }
    )]
    #[case(
        vec![vec![record(3, 42, 0.0, 0)]],
        MatchTableError::UnknownSource { target_id: FeatureId(3), source_id: FeatureId(42) }
    )]
    #[case(
        vec![vec![record(3, 10, -1.0, 0)]],
        MatchTableError::InvalidDistance { target_id: FeatureId(3), distance: -1.0 }
    )]
    fn malformed_groups_are_rejected(
        sources: Arc<BTreeSet<FeatureId>>,
        #[case] groups: Vec<Vec<MatchRecord>>,
        #[case] expected: MatchTableError,
    ) {
        let error = MatchTable::from_groups(groups, sources).expect_err("malformed groups");
        assert_eq!(error, expected);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn columns_survive_json(table: MatchTable) {
        let json = serde_json::to_string(&table.to_columns()).expect("serialise columns");
        let columns: MatchColumns = serde_json::from_str(&json).expect("deserialise columns");
        assert_eq!(columns, table.to_columns());
        assert!(json.contains("\"target_id\":[2,2,1]"));
    }
}
