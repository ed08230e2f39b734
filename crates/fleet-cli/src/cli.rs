//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};

/// fleetd - keeps the shared cluster database at the schema this binary expects
#[derive(Parser, Debug)]
#[command(name = "fleetd")]
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

    /// Daemon directory holding fleetd.yml and the database
    #[arg(short = 'd', long, global = true, default_value = ".")]
    pub dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the cluster database path
    #[arg(long, global = true, env = "FLEETD_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending schema updates to the cluster database
    Migrate(MigrateArgs),

    /// Show the schema version and pending updates without changing anything
    Status(StatusArgs),

    /// Check the ledger and every foreign key reference
    Verify,

    /// Print the structural definition of the database
    Dump,

    /// List tables with their row counts
    Tables,
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Stop after this version instead of the latest
    #[arg(long)]
    pub to: Option<u32>,

    /// Give up after this many seconds (overrides migration.timeout_secs)
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
