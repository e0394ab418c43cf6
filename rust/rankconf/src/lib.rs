//! Per-rank resolution of a shared query configuration document.
//!
//! Every process (rank) of a distributed query loads the same JSON document and
//! extracts its own slice of it: the workspace and array it operates on, the
//! columns and rows it scans, and the attributes it fetches.
//!
//! ```
//! use rankconf::ResolvedConfig;
//!
//! let config = ResolvedConfig::from_json_str(r#"{
//!     "workspace": "/data/ws",
//!     "array": "variants",
//!     "column_partitions": { "0": { "begin": 0 }, "1": { "begin": 50 } },
//!     "query_attributes": ["REF", "ALT"]
//! }"#).unwrap();
//!
//! let view = config.view_for_rank(0).unwrap();
//! assert_eq!(view.column_intervals()[0].to_string(), "[0, 49]");
//! let view = config.view_for_rank(1).unwrap();
//! assert_eq!(view.column_intervals()[0].to_string(), "[50, +inf)");
//! ```

pub mod config;
pub mod document;
pub mod partition;
pub mod rank_list;
pub mod selection;
pub mod view;

use std::path::Path;

pub use config::ResolvedConfig;
pub use document::DocumentNode;
pub use partition::{ColumnPartition, ColumnPartitions, PartitionDecl, PartitionResolver};
pub use rank_list::RankList;
pub use rankconf_common::{Error, ErrorKind, Result};
pub use rankconf_ranges::{ColumnInterval, Interval, UpperBound};
pub use selection::{ColumnScan, ColumnSelection};
pub use view::RankConfigView;

/// Loads the configuration file at `path` and assembles the view for `rank`.
pub fn load_rank_config(path: impl AsRef<Path>, rank: usize) -> Result<RankConfigView> {
    ResolvedConfig::from_file(path)?.view_for_rank(rank)
}
