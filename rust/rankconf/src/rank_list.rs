//! Fields that hold either one value for all ranks or one value per rank.

use rankconf_common::{Error, Result};
use serde::Serialize;

use crate::document::{DocumentNode, require_array};

/// A configuration value shared by all ranks or listed per rank.
///
/// A `PerRank` list is never empty. Resolving rank `r` against a `PerRank` list of
/// length `n` succeeds for `r < n` and fails with `RankOutOfRange` otherwise; a
/// `Single` value resolves for every rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankList<T> {
    Single(T),
    PerRank(Vec<T>),
}

impl<T> RankList<T> {
    /// Creates a per-rank list, or returns `None` when `values` is empty.
    pub fn per_rank(values: Vec<T>) -> Option<RankList<T>> {
        if values.is_empty() {
            None
        } else {
            Some(RankList::PerRank(values))
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, RankList::Single(_))
    }

    /// Number of per-rank entries, or `None` for a shared value.
    pub fn rank_count(&self) -> Option<usize> {
        match self {
            RankList::Single(_) => None,
            RankList::PerRank(values) => Some(values.len()),
        }
    }

    /// Returns the value for `rank`, or `None` if `rank` is past the per-rank list.
    pub fn get(&self, rank: usize) -> Option<&T> {
        match self {
            RankList::Single(value) => Some(value),
            RankList::PerRank(values) => values.get(rank),
        }
    }

    /// Returns the value for `rank`, failing with `RankOutOfRange` naming `field`.
    pub fn resolve(&self, field: &str, rank: usize) -> Result<&T> {
        match self {
            RankList::Single(value) => Ok(value),
            RankList::PerRank(values) => values
                .get(rank)
                .ok_or_else(|| Error::rank_out_of_range(field, rank, values.len())),
        }
    }

    /// Iterates all stored values (one for `Single`).
    pub fn values(&self) -> std::slice::Iter<'_, T> {
        match self {
            RankList::Single(value) => std::slice::from_ref(value).iter(),
            RankList::PerRank(values) => values.iter(),
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> RankList<U> {
        match self {
            RankList::Single(value) => RankList::Single(f(value)),
            RankList::PerRank(values) => RankList::PerRank(values.into_iter().map(f).collect()),
        }
    }
}

impl<T: Clone + Default> RankList<T> {
    /// Stores `value` in slot `idx`, widening the list to at least `len` per-rank
    /// entries first.
    ///
    /// A `Single` value becomes a `PerRank` list with every slot set to the previous
    /// single value. A shorter `PerRank` list is padded with `T::default()`.
    pub fn set_slot(&mut self, len: usize, idx: usize, value: T) {
        let (mut values, fill) = match std::mem::replace(self, RankList::PerRank(Vec::new())) {
            RankList::Single(single) => (Vec::new(), single),
            RankList::PerRank(values) => (values, T::default()),
        };
        let len = len.max(idx + 1);
        if values.len() < len {
            values.resize(len, fill);
        }
        values[idx] = value;
        *self = RankList::PerRank(values);
    }
}

/// Parses a field given as a scalar (shared) or as an array (one element per rank).
///
/// A one-element array stays a per-rank list of length one.
pub(crate) fn parse_scalar_or_list<N, T>(
    field: &str,
    node: &N,
    mut parse: impl FnMut(&str, &N) -> Result<T>,
) -> Result<RankList<T>>
where
    N: DocumentNode,
{
    match node.as_array() {
        Some(elements) => {
            let values = elements
                .iter()
                .enumerate()
                .map(|(i, element)| parse(&format!("{field}[{i}]"), element))
                .collect::<Result<Vec<_>>>()?;
            RankList::per_rank(values)
                .ok_or_else(|| Error::missing_required(field, "empty per-rank list"))
        }
        None => parse(field, node).map(RankList::Single),
    }
}

/// Parses a field that must be an array of per-rank entries, where a one-element
/// array is shorthand for "the same entry for every rank".
pub(crate) fn parse_list_with_shorthand<N, T>(
    field: &str,
    node: &N,
    mut parse: impl FnMut(&str, &N) -> Result<T>,
) -> Result<RankList<T>>
where
    N: DocumentNode,
{
    let elements = require_array(field, node)?;
    let mut values = elements
        .iter()
        .enumerate()
        .map(|(i, element)| parse(&format!("{field}[{i}]"), element))
        .collect::<Result<Vec<_>>>()?;
    match values.len() {
        0 => Err(Error::missing_required(field, "empty per-rank list")),
        1 => Ok(RankList::Single(values.remove(0))),
        _ => Ok(RankList::PerRank(values)),
    }
}

#[cfg(test)]
mod tests {
    use rankconf_common::ErrorKind;
    use serde_json::json;

    use super::*;
    use crate::document::{require_i64, require_string};

    #[test]
    fn test_single_resolves_for_every_rank() {
        let list = RankList::Single("/ws".to_string());
        for rank in [0, 1, 7, usize::MAX] {
            assert_eq!(list.resolve("workspace", rank).unwrap(), "/ws");
        }
        assert_eq!(list.rank_count(), None);
    }

    #[test]
    fn test_per_rank_bounds() {
        let list = RankList::per_rank(vec![10, 20, 30]).unwrap();
        for rank in 0..3 {
            assert_eq!(*list.resolve("x", rank).unwrap(), (rank as i32 + 1) * 10);
        }
        for rank in 3..10 {
            let err = list.resolve("x", rank).unwrap_err();
            match err.kind() {
                ErrorKind::RankOutOfRange { field, rank: r, len } => {
                    assert_eq!(field, "x");
                    assert_eq!(*r, rank);
                    assert_eq!(*len, 3);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(RankList::<i32>::per_rank(vec![]).is_none());
    }

    #[test]
    fn test_set_slot_widens_single() {
        let mut list = RankList::Single("ws".to_string());
        list.set_slot(3, 1, "override".to_string());
        assert_eq!(
            list,
            RankList::PerRank(vec!["ws".into(), "override".into(), "ws".into()])
        );
    }

    #[test]
    fn test_set_slot_pads_per_rank() {
        let mut list = RankList::PerRank(vec!["a".to_string()]);
        list.set_slot(3, 2, "c".to_string());
        assert_eq!(
            list,
            RankList::PerRank(vec!["a".into(), String::new(), "c".into()])
        );

        let mut longer = RankList::PerRank(vec![1, 2, 3, 4]);
        longer.set_slot(2, 0, 9);
        assert_eq!(longer, RankList::PerRank(vec![9, 2, 3, 4]));
    }

    #[test]
    fn test_parse_scalar_or_list() {
        let single = parse_scalar_or_list("workspace", &json!("/ws"), require_string).unwrap();
        assert_eq!(single, RankList::Single("/ws".to_string()));

        let one = parse_scalar_or_list("workspace", &json!(["/ws"]), require_string).unwrap();
        assert_eq!(one, RankList::PerRank(vec!["/ws".to_string()]));
        assert!(one.resolve("workspace", 1).is_err());

        let err = parse_scalar_or_list("workspace", &json!(["/a", 5]), require_string)
            .unwrap_err();
        assert!(err.to_string().contains("workspace[1]"));

        let err = parse_scalar_or_list("workspace", &json!([]), require_string).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::MissingRequiredField { .. }
        ));
    }

    #[test]
    fn test_parse_list_with_shorthand() {
        let one = parse_list_with_shorthand("r", &json!([4]), require_i64).unwrap();
        assert_eq!(one, RankList::Single(4));
        assert_eq!(*one.resolve("r", 100).unwrap(), 4);

        let two = parse_list_with_shorthand("r", &json!([4, 5]), require_i64).unwrap();
        assert_eq!(two.rank_count(), Some(2));

        let err = parse_list_with_shorthand("r", &json!(4), require_i64).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_map_and_values() {
        let list = RankList::PerRank(vec![1, 2]).map(|v| v * 2);
        assert_eq!(list.values().copied().collect::<Vec<_>>(), vec![2, 4]);
        assert_eq!(RankList::Single(3).values().count(), 1);
    }
}
