//! Loading and resolving the shared configuration document.

use std::{collections::BTreeMap, path::Path};

use rankconf_common::{Error, Result};
use rankconf_ranges::{ColumnInterval, Interval, expand_positions_iter, expanded_len};

use crate::{
    document::{DocumentNode, parse_json, require_array, require_string},
    rank_list::{RankList, parse_scalar_or_list},
    selection::{
        COLUMN_PARTITIONS, ColumnScan, ColumnSelection, QUERY_COLUMN_RANGES, QUERY_ROW_RANGES,
        RankedIntervals, SCAN_FULL, parse_ranked_intervals,
    },
    view::RankConfigView,
};

pub const WORKSPACE: &str = "workspace";
pub const ARRAY: &str = "array";
pub const QUERY_ATTRIBUTES: &str = "query_attributes";

const KNOWN_FIELDS: &[&str] = &[
    WORKSPACE,
    ARRAY,
    SCAN_FULL,
    QUERY_COLUMN_RANGES,
    COLUMN_PARTITIONS,
    QUERY_ROW_RANGES,
    QUERY_ATTRIBUTES,
];

/// The fully resolved configuration document.
///
/// Built once by one of the `from_*` constructors and never mutated afterwards.
/// Every rank loads the same document and asks for its own
/// [`view`](Self::view_for_rank).
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    workspace: Option<RankList<String>>,
    array: Option<RankList<String>>,
    columns: ColumnSelection,
    rows: Option<RankedIntervals>,
    attributes: Vec<String>,
    extra: BTreeMap<String, RankList<String>>,
}

impl ResolvedConfig {
    /// Reads and resolves the configuration file at `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ResolvedConfig> {
        let path = path.as_ref();
        log::debug!("loading configuration from {}", path.display());
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        Self::from_json_str(&text).map_err(|e| match e.into_kind() {
            rankconf_common::ErrorKind::MalformedDocument { context, message } => {
                Error::malformed(format!("{}: {context}", path.display()), message)
            }
            kind => kind.into(),
        })
    }

    /// Parses and resolves a JSON configuration document. Objects that repeat a
    /// member name are rejected.
    pub fn from_json_str(text: &str) -> Result<ResolvedConfig> {
        Self::from_document(&parse_json(text)?)
    }

    /// Resolves an already parsed document. The root must be an object.
    pub fn from_document<N: DocumentNode>(root: &N) -> Result<ResolvedConfig> {
        if !root.is_object() {
            return Err(Error::malformed(
                "document root",
                format!("expected an object, found {}", root.kind_name()),
            ));
        }

        let mut workspace = root
            .member(WORKSPACE)
            .map(|node| parse_scalar_or_list(WORKSPACE, node, require_string))
            .transpose()?;
        let mut array = root
            .member(ARRAY)
            .map(|node| parse_scalar_or_list(ARRAY, node, require_string))
            .transpose()?;

        let columns = ColumnSelection::from_document(root)?;
        if let ColumnSelection::Partitions(partitions) = &columns {
            partitions.apply_overrides(&mut workspace, &mut array);
        }

        let rows = root
            .member(QUERY_ROW_RANGES)
            .map(|node| parse_ranked_intervals(QUERY_ROW_RANGES, node))
            .transpose()?;

        let attributes = root
            .member(QUERY_ATTRIBUTES)
            .map(|node| {
                require_array(QUERY_ATTRIBUTES, node)?
                    .iter()
                    .enumerate()
                    .map(|(i, attr)| require_string(&format!("{QUERY_ATTRIBUTES}[{i}]"), attr))
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?
            .unwrap_or_default();

        let extra = collect_extra_fields(root);

        let config = ResolvedConfig {
            workspace,
            array,
            columns,
            rows,
            attributes,
            extra,
        };
        log::debug!(
            "configuration resolved: columns={}, row ranges={}, {} attributes",
            config.column_mode_name(),
            config.rows.is_some(),
            config.attributes.len()
        );
        Ok(config)
    }

    pub fn workspaces(&self) -> Option<&RankList<String>> {
        self.workspace.as_ref()
    }

    pub fn array_names(&self) -> Option<&RankList<String>> {
        self.array.as_ref()
    }

    pub fn columns(&self) -> &ColumnSelection {
        &self.columns
    }

    pub fn row_ranges(&self) -> Option<&RankedIntervals> {
        self.rows.as_ref()
    }

    /// Attributes to query, shared by all ranks.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Workspace for `rank`. Fails if none is configured, the rank is out of range,
    /// or the resolved workspace is empty.
    pub fn workspace(&self, rank: usize) -> Result<&str> {
        resolve_non_empty(self.workspace.as_ref(), WORKSPACE, rank)
    }

    /// Array name for `rank`, with the same failure modes as [`workspace`](Self::workspace).
    pub fn array_name(&self, rank: usize) -> Result<&str> {
        resolve_non_empty(self.array.as_ref(), ARRAY, rank)
    }

    /// Columns scanned by `rank`.
    pub fn column_scan(&self, rank: usize) -> Result<ColumnScan> {
        self.columns.scan_for_rank(rank)
    }

    /// Column intervals of `rank`; empty when the rank scans the whole array.
    pub fn column_intervals(&self, rank: usize) -> Result<Vec<ColumnInterval>> {
        Ok(self.column_scan(rank)?.intervals().to_vec())
    }

    /// The `idx`-th column interval of `rank`, or `None` if `rank` has fewer
    /// intervals or scans the whole array.
    pub fn column_interval(&self, rank: usize, idx: usize) -> Result<Option<ColumnInterval>> {
        Ok(self.column_scan(rank)?.intervals().get(idx).copied())
    }

    /// Row intervals of `rank`, or `None` when rows are not restricted.
    pub fn row_intervals(&self, rank: usize) -> Result<Option<&[Interval]>> {
        self.rows
            .as_ref()
            .map(|rows| rows.resolve(QUERY_ROW_RANGES, rank).map(Vec::as_slice))
            .transpose()
    }

    /// Row indices of `rank`, expanded from its row intervals in declaration order.
    ///
    /// Fails with [`SelectionTooLarge`](rankconf_common::ErrorKind::SelectionTooLarge)
    /// when the expanded list cannot be allocated.
    pub fn rows(&self, rank: usize) -> Result<Option<Vec<i64>>> {
        let Some(intervals) = self.row_intervals(rank)? else {
            return Ok(None);
        };
        let len = expanded_len(intervals);
        let mut rows: Vec<i64> = Vec::new();
        usize::try_from(len)
            .ok()
            .and_then(|n| rows.try_reserve_exact(n).ok())
            .ok_or_else(|| Error::selection_too_large(QUERY_ROW_RANGES, rank, len))?;
        rows.extend(expand_positions_iter(intervals.iter().copied()));
        Ok(Some(rows))
    }

    /// Resolves an additional top-level string field (one string shared by all
    /// ranks, or an array with one string per rank) that the core fields do not
    /// cover. Members of any other shape are not collected.
    pub fn string_field(&self, name: &str) -> Option<&RankList<String>> {
        self.extra.get(name)
    }

    /// Largest rank count declared by any per-rank field, or `None` if every
    /// field applies to all ranks.
    pub fn declared_rank_count(&self) -> Option<usize> {
        [
            self.workspace.as_ref().and_then(RankList::rank_count),
            self.array.as_ref().and_then(RankList::rank_count),
            self.columns.rank_count(),
            self.rows.as_ref().and_then(RankList::rank_count),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Assembles the view for `rank`. Either every field resolves or the call fails.
    pub fn view_for_rank(&self, rank: usize) -> Result<RankConfigView> {
        RankConfigView::assemble(self, rank)
    }

    fn column_mode_name(&self) -> &'static str {
        match &self.columns {
            ColumnSelection::ScanWhole => SCAN_FULL,
            ColumnSelection::ExplicitRanges(_) => QUERY_COLUMN_RANGES,
            ColumnSelection::Partitions(_) => COLUMN_PARTITIONS,
        }
    }
}

fn resolve_non_empty<'a>(
    list: Option<&'a RankList<String>>,
    field: &str,
    rank: usize,
) -> Result<&'a str> {
    let list = list.ok_or_else(|| Error::missing_required(field, "not specified"))?;
    let value = list.resolve(field, rank)?;
    if value.is_empty() {
        return Err(Error::missing_required(
            field,
            format!("empty value for rank {rank}"),
        ));
    }
    Ok(value.as_str())
}

fn collect_extra_fields<N: DocumentNode>(root: &N) -> BTreeMap<String, RankList<String>> {
    let Some(members) = root.members() else {
        return BTreeMap::new();
    };
    members
        .filter(|(name, _)| !KNOWN_FIELDS.contains(name))
        .filter_map(|(name, node)| match parse_scalar_or_list(name, node, require_string) {
            Ok(list) => Some((name.to_string(), list)),
            Err(e) => {
                log::trace!("skipping non-string field '{name}': {e}");
                None
            }
        })
        .collect()
}
