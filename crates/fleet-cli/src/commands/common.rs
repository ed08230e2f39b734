//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use fleet_core::Config;
use fleet_schema::connection::open_connection;
use rusqlite::Connection;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::GlobalArgs;

/// The migration did not finish before its deadline.
///
/// The step is still running on a blocking thread that cannot be cancelled,
/// and the runtime waits for such threads on shutdown. `main` exits the
/// process on this error instead of returning, which drops the connection
/// and discards the uncommitted step.
#[derive(Debug)]
pub(crate) struct MigrationTimedOut(pub(crate) Duration);

impl fmt::Display for MigrationTimedOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "schema migration did not finish within {}s",
            self.0.as_secs()
        )
    }
}

impl std::error::Error for MigrationTimedOut {}

/// Whether `err` leaves work behind that would keep the runtime from
/// shutting down.
pub(crate) fn is_abandoned_work(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<MigrationTimedOut>())
}

/// Load fleetd.yml from `--config` or the daemon directory.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(Path::new(&global.dir)),
    }
    .context("Failed to load fleetd configuration")?;
    if global.verbose {
        eprintln!("[verbose] Cluster member: {}", config.member);
    }
    Ok(config)
}

/// Cluster database path: `--database` if given, else the configured path
/// under the daemon directory.
pub(crate) fn database_path(global: &GlobalArgs, config: &Config) -> PathBuf {
    match &global.database {
        Some(path) => PathBuf::from(path),
        None => config.database_path_absolute(Path::new(&global.dir)),
    }
}

/// Open an existing cluster database for inspection, without applying any
/// update.
pub(crate) fn open_existing(global: &GlobalArgs) -> Result<Connection> {
    let config = load_config(global)?;
    let path = database_path(global, &config);
    if !path.exists() {
        anyhow::bail!(
            "Cluster database not found at {}. Run `fleetd migrate` first.",
            path.display()
        );
    }
    if global.verbose {
        eprintln!("[verbose] Cluster database: {}", path.display());
    }
    open_connection(&path, config.database.busy_timeout())
        .with_context(|| format!("Failed to open {}", path.display()))
}

/// Calculate column widths for a table given headers and row data.
pub(crate) fn calculate_column_widths(headers: &[&str], rows: &[Vec<String>]) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }
    widths
}

/// Print a formatted table to stdout.
///
/// Left-aligned header row, a separator line of dashes, then each data
/// row. Columns are separated by two spaces.
pub(crate) fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let widths = calculate_column_widths(headers, rows);

    let header_parts: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, &w)| format!("{:<width$}", h, width = w))
        .collect();
    println!("{}", header_parts.join("  "));

    let sep_parts: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep_parts.join("  "));

    for row in rows {
        let row_parts: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<width$}", cell, width = w))
            .collect();
        println!("{}", row_parts.join("  "));
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
