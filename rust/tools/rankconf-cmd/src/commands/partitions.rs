//! Partitions command implementation

use anyhow::{Result, bail};
use rankconf::{ColumnPartitions, ResolvedConfig};
use serde::Serialize;

use crate::commands::{OutputFormat, load_config};

#[derive(Serialize)]
struct PartitionRow {
    rank: usize,
    key: String,
    begin: i64,
    end: Option<i64>,
    workspace: Option<String>,
    array: Option<String>,
}

pub fn run(config_path: String, format: OutputFormat) -> Result<()> {
    let config = load_config(&config_path)?;
    println!("{}", render(&config, format)?);
    Ok(())
}

pub fn render(config: &ResolvedConfig, format: OutputFormat) -> Result<String> {
    let Some(partitions) = config.columns().partitions() else {
        bail!("The configuration does not declare column_partitions");
    };
    let rows = partition_rows(config, partitions);
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&rows)?),
        OutputFormat::Text => {
            let mut out = format!(
                "{:<6} {:<12} {:>20} {:>20}  {:<24} {}",
                "rank", "key", "begin", "end", "workspace", "array"
            );
            for row in &rows {
                out.push('\n');
                out.push_str(&format!(
                    "{:<6} {:<12} {:>20} {:>20}  {:<24} {}",
                    row.rank,
                    row.key,
                    row.begin,
                    row.end.map_or_else(|| "+inf".to_string(), |e| e.to_string()),
                    row.workspace.as_deref().unwrap_or("-"),
                    row.array.as_deref().unwrap_or("-"),
                ));
            }
            Ok(out)
        }
    }
}

/// One row per partition in ascending `begin` order, with the workspace and array
/// the owning rank resolves to.
fn partition_rows(config: &ResolvedConfig, partitions: &ColumnPartitions) -> Vec<PartitionRow> {
    partitions
        .sorted()
        .filter_map(|p| {
            let rank = partitions.index_of_begin(p.begin())?;
            Some(PartitionRow {
                rank,
                key: p.key().to_string(),
                begin: p.begin(),
                end: p.end().as_inclusive(),
                workspace: config.workspace(rank).ok().map(str::to_string),
                array: config.array_name(rank).ok().map(str::to_string),
            })
        })
        .collect()
}
