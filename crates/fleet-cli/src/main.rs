//! fleetd - cluster database schema management

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{common, dump, migrate, status, tables, verify};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match &cli.command {
        cli::Commands::Migrate(args) => migrate::execute(args, &cli.global).await,
        cli::Commands::Status(args) => status::execute(args, &cli.global).await,
        cli::Commands::Verify => verify::execute(&cli.global).await,
        cli::Commands::Dump => dump::execute(&cli.global).await,
        cli::Commands::Tables => tables::execute(&cli.global).await,
    };

    if let Err(err) = &result {
        if common::is_abandoned_work(err) {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    }
    result
}
