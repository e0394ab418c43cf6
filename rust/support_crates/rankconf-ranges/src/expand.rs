//! Expansion of interval lists into explicit position lists.
//!
//! Row selections are consumed as flat index lists, so each interval is expanded
//! into every position it covers. Intervals are visited in the order given:
//! overlapping intervals are not merged and the result is not sorted globally.
//!
//! Memory use of [`expand_positions`] is proportional to the total number of
//! selected positions. Use [`expanded_len`] to check the size up front, or
//! [`ExpandedPositions`] to walk the positions lazily.

use crate::Interval;

/// Expands `intervals` into every covered position, in input order.
///
/// Panics if the result does not fit in memory; callers that take intervals from
/// untrusted input should check [`expanded_len`] first.
///
/// ```
/// use rankconf_ranges::{Interval, expand_positions};
///
/// let rows = expand_positions(&[Interval::new(2, 4), Interval::point(9)]);
/// assert_eq!(rows, vec![2, 3, 4, 9]);
/// ```
pub fn expand_positions(intervals: &[Interval]) -> Vec<i64> {
    let mut positions = Vec::new();
    for interval in intervals {
        positions.extend(interval.positions());
    }
    positions
}

/// Total number of positions [`expand_positions`] would produce, saturating at
/// `u64::MAX`.
pub fn expanded_len(intervals: &[Interval]) -> u64 {
    intervals
        .iter()
        .fold(0u64, |acc, interval| acc.saturating_add(interval.len()))
}

/// Lazily expands an iterator of intervals into individual positions.
pub fn expand_positions_iter<I>(intervals: I) -> ExpandedPositions<I::IntoIter>
where
    I: IntoIterator<Item = Interval>,
{
    ExpandedPositions::new(intervals.into_iter())
}

/// Iterator adapter yielding every position of each input `Interval`.
///
/// Behavior
/// - Positions of one interval are yielded in ascending order before moving on to
///   the next interval.
/// - Intervals are never merged, so overlapping inputs yield repeated positions.
#[derive(Debug, Clone)]
pub struct ExpandedPositions<I>
where
    I: Iterator<Item = Interval>,
{
    /// The remaining input intervals.
    inner: I,

    /// Next position to yield from the current interval, and its inclusive end.
    /// `None` once the current interval is exhausted.
    current: Option<(i64, i64)>,
}

impl<I> ExpandedPositions<I>
where
    I: Iterator<Item = Interval>,
{
    pub fn new(inner: I) -> Self {
        Self {
            inner,
            current: None,
        }
    }
}

impl<I> Iterator for ExpandedPositions<I>
where
    I: Iterator<Item = Interval>,
{
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((next, end)) = self.current {
                // `checked_add` guards the interval ending at i64::MAX.
                self.current = if next < end {
                    next.checked_add(1).map(|n| (n, end))
                } else {
                    None
                };
                return Some(next);
            }
            let interval = self.inner.next()?;
            self.current = Some((interval.begin(), interval.end()));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let pending = self
            .current
            .map_or(0, |(next, end)| end.abs_diff(next).saturating_add(1));
        let pending = usize::try_from(pending).unwrap_or(usize::MAX);
        match self.inner.size_hint() {
            (_, Some(0)) => (pending, Some(pending)),
            _ => (pending, None),
        }
    }
}
