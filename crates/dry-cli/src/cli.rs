//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Dryflow - predict the schema of every model without materializing data
#[derive(Parser, Debug)]
#[command(name = "dryflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".", env = "DRYFLOW_PROJECT_DIR")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dry run every model and seed in the manifest
    Run(RunArgs),
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Manifest path (overrides manifest_path from config)
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// DuckDB database path or :memory: (overrides database.path)
    #[arg(short, long, env = "DRYFLOW_DATABASE")]
    pub database: Option<String>,

    /// Report path (overrides report_path from config)
    #[arg(short, long)]
    pub report: Option<String>,

    /// Node ids to run (comma-separated, upstreams included, default: all)
    #[arg(short, long)]
    pub select: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: RunOutput,
}

/// Run output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutput {
    /// Summary table
    Table,
    /// Full report as JSON
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
