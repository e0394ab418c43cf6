//! The per-rank view handed to query execution.

use rankconf_common::{Result, verify_field};
use rankconf_ranges::ColumnInterval;
use serde::Serialize;

use crate::{ResolvedConfig, selection::ColumnScan};

/// Everything one rank needs to run its query.
///
/// Assembled by [`ResolvedConfig::view_for_rank`]; assembly either resolves every
/// field or fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankConfigView {
    rank: usize,
    workspace: String,
    array: String,
    columns: ColumnScan,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<Vec<i64>>,
    attributes: Vec<String>,
}

impl RankConfigView {
    pub(crate) fn assemble(config: &ResolvedConfig, rank: usize) -> Result<RankConfigView> {
        let workspace = config.workspace(rank)?.to_string();
        let array = config.array_name(rank)?.to_string();
        let columns = config.column_scan(rank)?;
        let rows = config.rows(rank)?;
        let attributes = config.attributes();
        verify_field!(query_attributes, !attributes.is_empty());

        log::debug!(
            "rank {rank}: workspace={workspace}, array={array}, {} column interval(s), {} row(s)",
            columns.intervals().len(),
            rows.as_ref().map_or_else(|| "all".to_string(), |r| r.len().to_string()),
        );
        Ok(RankConfigView {
            rank,
            workspace,
            array,
            columns,
            rows,
            attributes: attributes.to_vec(),
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn workspace(&self) -> &str {
        &self.workspace
    }

    pub fn array_name(&self) -> &str {
        &self.array
    }

    pub fn columns(&self) -> &ColumnScan {
        &self.columns
    }

    pub fn scan_whole_array(&self) -> bool {
        self.columns.is_whole()
    }

    pub fn column_intervals(&self) -> &[ColumnInterval] {
        self.columns.intervals()
    }

    /// Row indices to query, or `None` to query every row.
    pub fn rows(&self) -> Option<&[i64]> {
        self.rows.as_deref()
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }
}
