//! Resolve command implementation

use anyhow::{Context, Result};
use itertools::Itertools;
use rankconf::{ColumnScan, RankConfigView};

use crate::commands::{OutputFormat, load_config};

pub fn run(config_path: String, rank: usize, format: OutputFormat) -> Result<()> {
    let config = load_config(&config_path)?;
    let view = config
        .view_for_rank(rank)
        .with_context(|| format!("Failed to resolve rank {rank} of {config_path}"))?;
    println!("{}", render(&view, format)?);
    Ok(())
}

pub fn render(view: &RankConfigView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Text => Ok(render_text(view)),
    }
}

fn render_text(view: &RankConfigView) -> String {
    let columns = match view.columns() {
        ColumnScan::Whole => "whole array".to_string(),
        ColumnScan::Intervals(intervals) => intervals.iter().join(", "),
    };
    let rows = match view.rows() {
        None => "all".to_string(),
        Some(rows) => summarize_rows(rows),
    };
    format!(
        "rank:       {}\nworkspace:  {}\narray:      {}\ncolumns:    {}\nrows:       {}\nattributes: {}",
        view.rank(),
        view.workspace(),
        view.array_name(),
        columns,
        rows,
        view.attributes().iter().join(", ")
    )
}

/// Lists up to eight row indices, followed by the total count for longer lists.
fn summarize_rows(rows: &[i64]) -> String {
    const SHOWN: usize = 8;
    if rows.len() <= SHOWN {
        rows.iter().join(", ")
    } else {
        format!(
            "{}, ... ({} rows)",
            rows.iter().take(SHOWN).join(", "),
            rows.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use rankconf::ResolvedConfig;
    use rankconf_testkit::dirs::get_sample_path;

    use super::*;

    #[test]
    fn test_render_text() {
        let path = get_sample_path("column_ranges.json").unwrap();
        let view = ResolvedConfig::from_file(path)
            .unwrap()
            .view_for_rank(1)
            .unwrap();
        let text = render(&view, OutputFormat::Text).unwrap();
        assert!(text.contains("array:      variants_1"));
        assert!(text.contains("columns:    [76, 76], [87, 87]"));
        assert!(text.contains("rows:       76, 77"));
        assert!(text.contains("attributes: REF, ALT"));
    }

    #[test]
    fn test_render_json() {
        let path = get_sample_path("scan_full.json").unwrap();
        let view = ResolvedConfig::from_file(path)
            .unwrap()
            .view_for_rank(3)
            .unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&render(&view, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json["rank"], 3);
        assert_eq!(json["columns"], "whole");
    }

    #[test]
    fn test_summarize_rows() {
        assert_eq!(summarize_rows(&[1, 2]), "1, 2");
        let rows: Vec<i64> = (0..20).collect();
        assert_eq!(
            summarize_rows(&rows),
            "0, 1, 2, 3, 4, 5, 6, 7, ... (20 rows)"
        );
    }
}
