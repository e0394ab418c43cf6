//! Closed integer intervals and open-ended column intervals.

use std::{cmp::Ordering, fmt, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

/// A closed interval `[begin, end]` of signed 64-bit positions.
///
/// The constructor normalizes the endpoints: if `begin > end` they are swapped, so
/// every `Interval` satisfies `begin <= end`. A single position `v` is the interval
/// `[v, v]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Interval {
    begin: i64,
    end: i64,
}

impl Interval {
    /// Creates a new interval, swapping the endpoints when `begin > end`.
    pub fn new(begin: i64, end: i64) -> Interval {
        if begin > end {
            Interval {
                begin: end,
                end: begin,
            }
        } else {
            Interval { begin, end }
        }
    }

    /// Creates the single-position interval `[pos, pos]`.
    pub fn point(pos: i64) -> Interval {
        Interval {
            begin: pos,
            end: pos,
        }
    }

    #[inline]
    pub fn begin(&self) -> i64 {
        self.begin
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of positions covered by the interval.
    ///
    /// Saturates at `u64::MAX` for the interval spanning the entire `i64` domain.
    pub fn len(&self) -> u64 {
        self.end.abs_diff(self.begin).saturating_add(1)
    }

    /// Always `false`: a closed interval covers at least one position.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, pos: i64) -> bool {
        self.begin <= pos && pos <= self.end
    }

    pub fn positions(&self) -> RangeInclusive<i64> {
        self.begin..=self.end
    }
}

impl From<(i64, i64)> for Interval {
    fn from((begin, end): (i64, i64)) -> Self {
        Interval::new(begin, end)
    }
}

impl From<Interval> for (i64, i64) {
    fn from(interval: Interval) -> Self {
        (interval.begin, interval.end)
    }
}

impl From<Interval> for RangeInclusive<i64> {
    fn from(interval: Interval) -> Self {
        interval.positions()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.begin, self.end)
    }
}

/// The inclusive upper end of a column interval, possibly unbounded.
///
/// `Unbounded` orders after every `Inclusive` value, so comparisons between
/// bounds never need a magic maximum integer. It serializes as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum UpperBound {
    Inclusive(i64),
    Unbounded,
}

impl UpperBound {
    pub fn is_unbounded(&self) -> bool {
        matches!(self, UpperBound::Unbounded)
    }

    pub fn as_inclusive(&self) -> Option<i64> {
        match *self {
            UpperBound::Inclusive(end) => Some(end),
            UpperBound::Unbounded => None,
        }
    }

    /// Returns `true` if `pos` lies at or below this bound.
    pub fn admits(&self, pos: i64) -> bool {
        match *self {
            UpperBound::Inclusive(end) => pos <= end,
            UpperBound::Unbounded => true,
        }
    }
}

impl Ord for UpperBound {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (UpperBound::Inclusive(a), UpperBound::Inclusive(b)) => a.cmp(b),
            (UpperBound::Inclusive(_), UpperBound::Unbounded) => Ordering::Less,
            (UpperBound::Unbounded, UpperBound::Inclusive(_)) => Ordering::Greater,
            (UpperBound::Unbounded, UpperBound::Unbounded) => Ordering::Equal,
        }
    }
}

impl PartialOrd for UpperBound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Option<i64>> for UpperBound {
    fn from(end: Option<i64>) -> Self {
        end.map_or(UpperBound::Unbounded, UpperBound::Inclusive)
    }
}

impl From<UpperBound> for Option<i64> {
    fn from(bound: UpperBound) -> Self {
        bound.as_inclusive()
    }
}

impl fmt::Display for UpperBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpperBound::Inclusive(end) => write!(f, "{end}"),
            UpperBound::Unbounded => f.write_str("+inf"),
        }
    }
}

/// A column interval `[begin, end]` whose upper end may be open.
///
/// Explicit column ranges always produce bounded intervals; column partitions
/// without a declared `end` that are not followed by another partition stay
/// `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnInterval {
    pub begin: i64,
    pub end: UpperBound,
}

impl ColumnInterval {
    /// Creates a column interval. A bounded `end` below `begin` is swapped.
    pub fn new(begin: i64, end: UpperBound) -> ColumnInterval {
        match end {
            UpperBound::Inclusive(e) if e < begin => ColumnInterval {
                begin: e,
                end: UpperBound::Inclusive(begin),
            },
            _ => ColumnInterval { begin, end },
        }
    }

    pub fn unbounded(begin: i64) -> ColumnInterval {
        ColumnInterval {
            begin,
            end: UpperBound::Unbounded,
        }
    }

    pub fn contains(&self, pos: i64) -> bool {
        self.begin <= pos && self.end.admits(pos)
    }

    /// Returns the closed interval, or `None` if the upper end is open.
    pub fn to_bounded(&self) -> Option<Interval> {
        self.end
            .as_inclusive()
            .map(|end| Interval::new(self.begin, end))
    }

    /// Returns the exclusive end position, or `None` when the interval is open-ended
    /// or its end is `i64::MAX`.
    pub fn end_exclusive(&self) -> Option<i64> {
        self.end.as_inclusive().and_then(|end| end.checked_add(1))
    }
}

impl From<Interval> for ColumnInterval {
    fn from(interval: Interval) -> Self {
        ColumnInterval {
            begin: interval.begin,
            end: UpperBound::Inclusive(interval.end),
        }
    }
}

impl fmt::Display for ColumnInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            UpperBound::Inclusive(end) => write!(f, "[{}, {}]", self.begin, end),
            UpperBound::Unbounded => write!(f, "[{}, +inf)", self.begin),
        }
    }
}
