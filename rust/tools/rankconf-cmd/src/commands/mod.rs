//! Command implementations for rankconf-cmd

use anyhow::{Context, Result};
use clap::ValueEnum;
use rankconf::ResolvedConfig;

use crate::utils;

pub mod check;
pub mod partitions;
pub mod resolve;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// Loads and resolves the configuration document at `path`.
pub fn load_config(path: &str) -> Result<ResolvedConfig> {
    utils::validate_file_exists(path)?;
    ResolvedConfig::from_file(path)
        .with_context(|| format!("Failed to resolve configuration: {path}"))
}
