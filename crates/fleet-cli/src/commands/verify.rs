//! Check ledger and relational integrity of the cluster database.

use crate::cli::GlobalArgs;
use crate::commands::common::open_existing;
use anyhow::{Context, Result};
use fleet_schema::verify::{check_foreign_keys, verify_ledger};
use fleet_schema::Registry;

/// Execute the verify command.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let conn = open_existing(global)?;
    let registry = Registry::cluster();

    let version = verify_ledger(&conn, &registry).context("Schema ledger check failed")?;
    if global.verbose {
        eprintln!("[verbose] Ledger holds versions 1 to {version}");
    }
    check_foreign_keys(&conn).context("Foreign key check failed")?;

    println!("Cluster database OK (schema version {version})");
    Ok(())
}
