//! Test utilities and helpers for the rankconf crates.
//!
//! - Sample configuration documents and their paths ([`dirs`])
//! - Temporary config files and random partition generation ([`config_gen`])

pub mod config_gen;
pub mod dirs;
