//! Check command implementation

use anyhow::{Result, bail};
use rankconf::ResolvedConfig;

use crate::commands::load_config;

pub fn run(config_path: String, ranks: Option<usize>) -> Result<()> {
    let config = load_config(&config_path)?;
    let report = check_ranks(&config, ranks);
    for (rank, err) in &report.failures {
        println!("rank {rank}: {err}");
    }
    println!(
        "{} of {} rank(s) resolved successfully",
        report.checked - report.failures.len(),
        report.checked
    );
    if !report.failures.is_empty() {
        bail!("{} rank(s) failed to resolve", report.failures.len());
    }
    Ok(())
}

pub struct CheckReport {
    pub checked: usize,
    pub failures: Vec<(usize, rankconf::Error)>,
}

/// Assembles the view of every rank in `0..ranks`. Without an explicit count, the
/// largest per-rank list in the document decides (one rank if every field is shared).
pub fn check_ranks(config: &ResolvedConfig, ranks: Option<usize>) -> CheckReport {
    let checked = ranks.or_else(|| config.declared_rank_count()).unwrap_or(1);
    log::info!("checking {checked} rank(s)");
    let failures = (0..checked)
        .filter_map(|rank| config.view_for_rank(rank).err().map(|e| (rank, e)))
        .collect();
    CheckReport { checked, failures }
}
