//! Interval types for column and row selections.
//!
//! - [`Interval`] - a closed `[begin, end]` interval with normalized endpoints
//! - [`UpperBound`] / [`ColumnInterval`] - column intervals that may be open-ended
//! - [`expand_positions`] / [`ExpandedPositions`] - expansion of interval lists into
//!   explicit position lists

pub mod expand;
pub mod interval;

pub use expand::{ExpandedPositions, expand_positions, expand_positions_iter, expanded_len};
pub use interval::{ColumnInterval, Interval, UpperBound};
