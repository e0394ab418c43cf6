use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod utils;

use commands::OutputFormat;

#[derive(Parser)]
#[command(name = "rankconf-cmd")]
#[command(about = "Command-line utility for resolving rank query configurations")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the configuration seen by one rank
    Resolve {
        /// Rank to resolve the configuration for
        #[arg(short, long, default_value_t = 0)]
        rank: usize,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to the JSON configuration document
        config: String,
    },

    /// List the resolved column partitions in begin order
    Partitions {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to the JSON configuration document
        config: String,
    },

    /// Check that every rank resolves to a complete configuration
    Check {
        /// Number of ranks to check (defaults to the largest per-rank list in the document)
        #[arg(short = 'n', long)]
        ranks: Option<usize>,

        /// Path to the JSON configuration document
        config: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(utils::default_log_filter(cli.verbose)),
    )
    .init();

    match cli.command {
        Commands::Resolve {
            rank,
            format,
            config,
        } => commands::resolve::run(config, rank, format),
        Commands::Partitions { format, config } => commands::partitions::run(config, format),
        Commands::Check { ranks, config } => commands::check::run(config, ranks),
    }
}
