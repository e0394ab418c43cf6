//! Column partitions.
//!
//! `column_partitions` is an object of the form
//! `{ "<key>": { "begin": <int>, "end": <int>?, "workspace": <str>?, "array": <str>? } }`.
//! The declaration order of the keys decides the rank that owns each partition.
//!
//! Declarations only need a `begin`: a partition without an `end` runs until the
//! next partition (in `begin` order) starts. An explicit `end` caps the partition
//! and is still tightened if it reaches into the next one; it is never extended,
//! so explicit ends may leave gaps between partitions. The last partition keeps
//! its declared `end`, or stays open-ended.
//!
//! Partitions are identified by their (normalized) `begin`, which must be unique.

use ahash::AHashMap;
use rankconf_common::{Error, Result};
use rankconf_ranges::{ColumnInterval, UpperBound};
use serde::Serialize;

use crate::{
    document::{DocumentNode, require_i64, require_string},
    rank_list::RankList,
    selection::COLUMN_PARTITIONS,
};

/// A raw partition declaration, before normalization and clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDecl {
    pub key: String,
    pub begin: i64,
    pub end: Option<i64>,
    pub workspace: Option<String>,
    pub array: Option<String>,
}

impl PartitionDecl {
    pub fn new(key: impl Into<String>, begin: i64) -> PartitionDecl {
        PartitionDecl {
            key: key.into(),
            begin,
            end: None,
            workspace: None,
            array: None,
        }
    }

    pub fn with_end(self, end: i64) -> Self {
        Self {
            end: Some(end),
            ..self
        }
    }

    pub fn with_workspace(self, workspace: impl Into<String>) -> Self {
        Self {
            workspace: Some(workspace.into()),
            ..self
        }
    }

    pub fn with_array(self, array: impl Into<String>) -> Self {
        Self {
            array: Some(array.into()),
            ..self
        }
    }

    fn from_document<N: DocumentNode>(key: &str, node: &N) -> Result<PartitionDecl> {
        let path = format!("{COLUMN_PARTITIONS}.{key}");
        if !node.is_object() {
            return Err(Error::type_mismatch(path, "object", node.kind_name()));
        }
        let begin_path = format!("{path}.begin");
        let begin = node
            .member("begin")
            .ok_or_else(|| Error::missing_field(&begin_path))
            .and_then(|begin| require_i64(&begin_path, begin))?;
        let end = node
            .member("end")
            .map(|end| require_i64(&format!("{path}.end"), end))
            .transpose()?;
        let workspace = node
            .member("workspace")
            .map(|ws| require_string(&format!("{path}.workspace"), ws))
            .transpose()?;
        let array = node
            .member("array")
            .map(|array| require_string(&format!("{path}.array"), array))
            .transpose()?;
        Ok(PartitionDecl {
            key: key.to_string(),
            begin,
            end,
            workspace,
            array,
        })
    }
}

/// A resolved column partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnPartition {
    key: String,
    begin: i64,
    end: UpperBound,
    #[serde(skip_serializing_if = "Option::is_none")]
    workspace_override: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    array_override: Option<String>,
}

impl ColumnPartition {
    /// The key the partition was declared under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn begin(&self) -> i64 {
        self.begin
    }

    pub fn end(&self) -> UpperBound {
        self.end
    }

    pub fn interval(&self) -> ColumnInterval {
        ColumnInterval {
            begin: self.begin,
            end: self.end,
        }
    }

    pub fn workspace_override(&self) -> Option<&str> {
        self.workspace_override.as_deref()
    }

    pub fn array_override(&self) -> Option<&str> {
        self.array_override.as_deref()
    }
}

/// Collects partition declarations and resolves them into non-overlapping
/// [`ColumnPartitions`].
#[derive(Debug, Clone, Default)]
pub struct PartitionResolver {
    decls: Vec<PartitionDecl>,
}

impl PartitionResolver {
    pub fn new() -> PartitionResolver {
        Default::default()
    }

    /// Reads every declaration of a `column_partitions` object, in declaration order.
    pub fn from_document<N: DocumentNode>(node: &N) -> Result<PartitionResolver> {
        let members = node
            .members()
            .ok_or_else(|| Error::type_mismatch(COLUMN_PARTITIONS, "object", node.kind_name()))?;
        let decls = members
            .map(|(key, value)| PartitionDecl::from_document(key, value))
            .collect::<Result<Vec<_>>>()?;
        Ok(PartitionResolver { decls })
    }

    pub fn push(&mut self, decl: PartitionDecl) {
        self.decls.push(decl);
    }

    pub fn with(mut self, decl: PartitionDecl) -> Self {
        self.push(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Normalizes, sorts and clamps the declared partitions.
    ///
    /// Fails with `DuplicatePartitionBoundary` if two partitions share a `begin`
    /// (after normalization), and with `MissingRequiredField` if nothing was declared.
    pub fn resolve(self) -> Result<ColumnPartitions> {
        if self.decls.is_empty() {
            return Err(Error::missing_required(
                COLUMN_PARTITIONS,
                "no column partitions declared",
            ));
        }

        let mut partitions = Vec::with_capacity(self.decls.len());
        let mut begin_to_index = AHashMap::with_capacity(self.decls.len());
        for (idx, decl) in self.decls.into_iter().enumerate() {
            let interval = ColumnInterval::new(decl.begin, decl.end.into());
            if let Some(&prev) = begin_to_index.get(&interval.begin) {
                let prev: &ColumnPartition = &partitions[prev];
                return Err(Error::duplicate_partition_boundary(
                    interval.begin,
                    prev.key.as_str(),
                    decl.key,
                ));
            }
            begin_to_index.insert(interval.begin, idx);
            partitions.push(ColumnPartition {
                key: decl.key,
                begin: interval.begin,
                end: interval.end,
                workspace_override: decl.workspace,
                array_override: decl.array,
            });
        }

        let mut sorted: Vec<ColumnInterval> = partitions.iter().map(|p| p.interval()).collect();
        sorted.sort_unstable_by_key(|interval| interval.begin);

        for i in 1..sorted.len() {
            let next_begin = sorted[i].begin;
            let current = &mut sorted[i - 1];
            // Begins are unique and sorted, so `next_begin - 1 >= current.begin`.
            if current.end >= UpperBound::Inclusive(next_begin) {
                log::trace!(
                    "column partition at {} clamped from {} to {}",
                    current.begin,
                    current.end,
                    next_begin - 1
                );
                current.end = UpperBound::Inclusive(next_begin - 1);
            }
        }

        for interval in &sorted {
            let idx = begin_to_index[&interval.begin];
            partitions[idx].end = interval.end;
        }

        log::debug!("resolved {} column partitions", partitions.len());
        Ok(ColumnPartitions {
            partitions,
            sorted,
            begin_to_index,
        })
    }
}

/// Resolved column partitions.
///
/// Partitions are kept in declaration order (index `r` belongs to rank `r`) next to
/// a copy of their intervals sorted by `begin`. The two views are joined through a
/// `begin -> declaration index` map.
#[derive(Debug, Clone)]
pub struct ColumnPartitions {
    partitions: Vec<ColumnPartition>,
    sorted: Vec<ColumnInterval>,
    begin_to_index: AHashMap<i64, usize>,
}

impl ColumnPartitions {
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// Returns the partition declared at position `idx`.
    pub fn get(&self, idx: usize) -> Option<&ColumnPartition> {
        self.partitions.get(idx)
    }

    /// Partitions in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, ColumnPartition> {
        self.partitions.iter()
    }

    /// Partitions in ascending `begin` order.
    pub fn sorted(&self) -> impl Iterator<Item = &ColumnPartition> {
        self.sorted
            .iter()
            .map(|interval| &self.partitions[self.begin_to_index[&interval.begin]])
    }

    /// Partition intervals in ascending `begin` order.
    pub fn sorted_intervals(&self) -> &[ColumnInterval] {
        &self.sorted
    }

    pub fn get_by_begin(&self, begin: i64) -> Option<&ColumnPartition> {
        self.begin_to_index
            .get(&begin)
            .map(|&idx| &self.partitions[idx])
    }

    pub fn by_key(&self, key: &str) -> Option<&ColumnPartition> {
        self.partitions.iter().find(|p| p.key == key)
    }

    /// Declaration index (owning rank) of the partition that begins at `begin`.
    pub fn index_of_begin(&self, begin: i64) -> Option<usize> {
        self.begin_to_index.get(&begin).copied()
    }

    /// Finds the partition containing column `column`, or `None` if the column is
    /// before the first partition or falls into a gap left by an explicit `end`.
    pub fn find_by_column(&self, column: i64) -> Option<&ColumnPartition> {
        let pos = self.sorted.partition_point(|interval| interval.begin <= column);
        let interval = self.sorted.get(pos.checked_sub(1)?)?;
        if interval.contains(column) {
            self.get_by_begin(interval.begin)
        } else {
            None
        }
    }

    /// Applies per-partition `workspace` and `array` overrides.
    ///
    /// An overridden field becomes a per-rank list covering every partition. Slots of
    /// partitions without an override keep the previous shared value, or the empty
    /// string if there was none.
    pub fn apply_overrides(
        &self,
        workspace: &mut Option<RankList<String>>,
        array: &mut Option<RankList<String>>,
    ) {
        let count = self.partitions.len();
        for (idx, partition) in self.partitions.iter().enumerate() {
            if let Some(ws) = &partition.workspace_override {
                workspace
                    .get_or_insert_with(|| RankList::PerRank(Vec::new()))
                    .set_slot(count, idx, ws.clone());
            }
            if let Some(name) = &partition.array_override {
                array
                    .get_or_insert_with(|| RankList::PerRank(Vec::new()))
                    .set_slot(count, idx, name.clone());
            }
        }
    }
}

impl<'a> IntoIterator for &'a ColumnPartitions {
    type Item = &'a ColumnPartition;
    type IntoIter = std::slice::Iter<'a, ColumnPartition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
