//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use sg_core::ClearStrategy;

/// Seedgraph - load named fixture rows into a database in dependency order
#[derive(Parser, Debug)]
#[command(name = "sg")]
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
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database path)
    #[arg(short, long, global = true)]
    pub target: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert every fixture row, dependencies first
    Load(LoadArgs),

    /// Empty the tables of every model in the schema
    Clear(ClearArgs),

    /// Show creation waves without touching the database
    Plan(PlanArgs),
}

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Fixture files to load (comma-separated, default: all under fixture_paths)
    #[arg(short, long)]
    pub files: Option<String>,

    /// Clear tables with the configured strategy before loading
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for the clear command
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Override the configured clear strategy
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,
}

/// Clear strategies accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyArg {
    /// One truncate per model
    #[value(name = "truncateIndividually")]
    TruncateIndividually,
    /// One truncate covering every model
    #[value(name = "truncateAll")]
    TruncateAll,
    /// Roll back the open transaction and begin a new one
    #[value(name = "rollback")]
    Rollback,
}

impl From<StrategyArg> for ClearStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::TruncateIndividually => ClearStrategy::TruncateIndividually,
            StrategyArg::TruncateAll => ClearStrategy::TruncateAll,
            StrategyArg::Rollback => ClearStrategy::Rollback,
        }
    }
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Fixture files to plan (comma-separated, default: all under fixture_paths)
    #[arg(short, long)]
    pub files: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: PlanOutput,
}

/// Plan output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanOutput {
    /// One line per wave
    Text,
    /// JSON object with waves and unresolved rows
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
