//! Column and row selections.
//!
//! Explicit ranges are written as nested arrays: the outer array holds one entry
//! per rank, each entry is a list of intervals, and each interval is either a
//! `[lo, hi]` pair or a single position. For example
//! `[ [ [0,5], 45 ], [ 76, 87 ] ]` gives rank 0 the intervals `[0,5]` and `[45,45]`
//! and rank 1 the intervals `[76,76]` and `[87,87]`. An outer array with a single
//! entry applies to every rank.

use rankconf_common::{Error, Result};
use rankconf_ranges::{ColumnInterval, Interval};
use serde::Serialize;

use crate::{
    document::{DocumentNode, require_array, require_i64},
    partition::{ColumnPartitions, PartitionResolver},
    rank_list::{RankList, parse_list_with_shorthand},
};

pub const SCAN_FULL: &str = "scan_full";
pub const QUERY_COLUMN_RANGES: &str = "query_column_ranges";
pub const COLUMN_PARTITIONS: &str = "column_partitions";
pub const QUERY_ROW_RANGES: &str = "query_row_ranges";

/// Per-rank lists of intervals, as used by explicit column and row ranges.
pub type RankedIntervals = RankList<Vec<Interval>>;

/// Parses one interval: a `[lo, hi]` pair or a single integer position.
pub fn parse_interval<N: DocumentNode>(field: &str, node: &N) -> Result<Interval> {
    match node.as_array() {
        Some([lo, hi]) => {
            let lo = require_i64(&format!("{field}[0]"), lo)?;
            let hi = require_i64(&format!("{field}[1]"), hi)?;
            Ok(Interval::new(lo, hi))
        }
        Some(other) => Err(Error::type_mismatch(
            field,
            "[begin, end] pair",
            format!("array of {} elements", other.len()),
        )),
        None => require_i64(field, node).map(Interval::point),
    }
}

/// Parses a list of intervals for a single rank.
pub fn parse_interval_list<N: DocumentNode>(field: &str, node: &N) -> Result<Vec<Interval>> {
    require_array(field, node)?
        .iter()
        .enumerate()
        .map(|(i, element)| parse_interval(&format!("{field}[{i}]"), element))
        .collect()
}

/// Parses a per-rank interval field such as `query_column_ranges` or
/// `query_row_ranges`.
pub fn parse_ranked_intervals<N: DocumentNode>(field: &str, node: &N) -> Result<RankedIntervals> {
    parse_list_with_shorthand(field, node, parse_interval_list)
}

/// How the columns to scan are chosen. Exactly one variant applies per document.
#[derive(Debug, Clone)]
pub enum ColumnSelection {
    /// `scan_full`: no column restriction.
    ScanWhole,
    /// `query_column_ranges`: explicit intervals, shared or per rank.
    ExplicitRanges(RankedIntervals),
    /// `column_partitions`: rank `r` scans the partition declared `r`-th.
    Partitions(ColumnPartitions),
}

impl ColumnSelection {
    /// Reads the column selector from the document root.
    ///
    /// Fails with `MissingField` when no selector is present and with
    /// `ConflictingSelectors` when more than one is.
    pub fn from_document<N: DocumentNode>(root: &N) -> Result<ColumnSelection> {
        let present: Vec<&str> = [SCAN_FULL, QUERY_COLUMN_RANGES, COLUMN_PARTITIONS]
            .into_iter()
            .filter(|name| root.has_member(name))
            .collect();
        match present.as_slice() {
            [] => Err(Error::missing_field(format!(
                "{SCAN_FULL} | {QUERY_COLUMN_RANGES} | {COLUMN_PARTITIONS}"
            ))),
            [SCAN_FULL] => Ok(ColumnSelection::ScanWhole),
            [QUERY_COLUMN_RANGES] => {
                let node = root
                    .member(QUERY_COLUMN_RANGES)
                    .ok_or_else(|| Error::missing_field(QUERY_COLUMN_RANGES))?;
                parse_ranked_intervals(QUERY_COLUMN_RANGES, node)
                    .map(ColumnSelection::ExplicitRanges)
            }
            [_] => {
                let node = root
                    .member(COLUMN_PARTITIONS)
                    .ok_or_else(|| Error::missing_field(COLUMN_PARTITIONS))?;
                PartitionResolver::from_document(node)?
                    .resolve()
                    .map(ColumnSelection::Partitions)
            }
            conflicting => Err(Error::conflicting_selectors(conflicting)),
        }
    }

    pub fn is_scan_whole(&self) -> bool {
        matches!(self, ColumnSelection::ScanWhole)
    }

    pub fn partitions(&self) -> Option<&ColumnPartitions> {
        match self {
            ColumnSelection::Partitions(partitions) => Some(partitions),
            _ => None,
        }
    }

    /// Resolves the columns scanned by `rank`.
    pub fn scan_for_rank(&self, rank: usize) -> Result<ColumnScan> {
        match self {
            ColumnSelection::ScanWhole => Ok(ColumnScan::Whole),
            ColumnSelection::ExplicitRanges(ranges) => {
                let intervals = ranges.resolve(QUERY_COLUMN_RANGES, rank)?;
                Ok(ColumnScan::Intervals(
                    intervals.iter().copied().map(ColumnInterval::from).collect(),
                ))
            }
            ColumnSelection::Partitions(partitions) => {
                let partition = partitions.get(rank).ok_or_else(|| {
                    Error::rank_out_of_range(COLUMN_PARTITIONS, rank, partitions.len())
                })?;
                Ok(ColumnScan::Intervals(vec![partition.interval()]))
            }
        }
    }

    /// Number of ranks the selection is declared for, or `None` if it applies to all.
    pub fn rank_count(&self) -> Option<usize> {
        match self {
            ColumnSelection::ScanWhole => None,
            ColumnSelection::ExplicitRanges(ranges) => ranges.rank_count(),
            ColumnSelection::Partitions(partitions) => Some(partitions.len()),
        }
    }
}

/// The columns one rank scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnScan {
    /// Scan the whole array.
    Whole,
    Intervals(Vec<ColumnInterval>),
}

impl ColumnScan {
    pub fn is_whole(&self) -> bool {
        matches!(self, ColumnScan::Whole)
    }

    /// The column intervals, or an empty slice for a whole-array scan.
    pub fn intervals(&self) -> &[ColumnInterval] {
        match self {
            ColumnScan::Whole => &[],
            ColumnScan::Intervals(intervals) => intervals,
        }
    }
}

#[cfg(test)]
mod tests {
    use rankconf_common::ErrorKind;
    use rankconf_ranges::UpperBound;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_interval_forms() {
        assert_eq!(parse_interval("c", &json!([0, 5])).unwrap(), Interval::new(0, 5));
        assert_eq!(parse_interval("c", &json!([9, 2])).unwrap(), Interval::new(2, 9));
        assert_eq!(parse_interval("c", &json!(45)).unwrap(), Interval::point(45));
    }

    #[test]
    fn test_parse_interval_rejects_bad_shapes() {
        for bad in [json!([]), json!([1]), json!([1, 2, 3])] {
            let err = parse_interval("c", &bad).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }), "{bad}");
        }
        let err = parse_interval("c", &json!([1, "2"])).unwrap_err();
        assert!(err.to_string().contains("c[1]"));
        assert!(parse_interval("c", &json!(1.5)).is_err());
    }

    #[test]
    fn test_single_entry_applies_to_all_ranks() {
        let ranges = parse_ranked_intervals("q", &json!([[[0, 5], 45]])).unwrap();
        for rank in [0, 1, 5] {
            assert_eq!(
                ranges.resolve("q", rank).unwrap(),
                &vec![Interval::new(0, 5), Interval::point(45)]
            );
        }
    }

    #[test]
    fn test_per_rank_entries() {
        let ranges = parse_ranked_intervals("q", &json!([[[0, 5], 45], [76, 87]])).unwrap();
        assert_eq!(
            ranges.resolve("q", 1).unwrap(),
            &vec![Interval::point(76), Interval::point(87)]
        );
        assert!(ranges.resolve("q", 2).is_err());
        assert!(parse_ranked_intervals("q", &json!([5])).is_err());
    }

    #[test]
    fn test_selector_presence() {
        let err = ColumnSelection::from_document(&json!({ "workspace": "/ws" })).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingField { .. }));

        let err = ColumnSelection::from_document(&json!({
            "scan_full": true,
            "query_column_ranges": [[0]],
        }))
        .unwrap_err();
        match err.kind() {
            ErrorKind::ConflictingSelectors { selectors } => {
                assert_eq!(selectors, &vec!["scan_full", "query_column_ranges"]);
            }
            other => panic!("unexpected {other:?}"),
        }

        let err = ColumnSelection::from_document(&json!({
            "query_column_ranges": [[0]],
            "column_partitions": { "0": { "begin": 0 } },
        }))
        .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ConflictingSelectors { .. }));
    }

    #[test]
    fn test_scan_for_rank() {
        let whole = ColumnSelection::from_document(&json!({ "scan_full": null })).unwrap();
        assert!(whole.is_scan_whole());
        assert_eq!(whole.scan_for_rank(42).unwrap(), ColumnScan::Whole);
        assert!(whole.scan_for_rank(42).unwrap().intervals().is_empty());

        let parts = ColumnSelection::from_document(&json!({
            "column_partitions": { "0": { "begin": 0 }, "1": { "begin": 50 } },
        }))
        .unwrap();
        assert_eq!(
            parts.scan_for_rank(1).unwrap().intervals(),
            &[ColumnInterval::new(50, UpperBound::Unbounded)]
        );
        let err = parts.scan_for_rank(2).unwrap_err();
        assert!(err.is_rank_error());
        assert_eq!(parts.rank_count(), Some(2));
    }
}
