//! Report schema version and pending updates without migrating.

use crate::cli::{GlobalArgs, StatusArgs};
use crate::commands::common::{self, open_existing};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fleet_schema::bootstrap::infer_legacy_version;
use fleet_schema::ledger::{applied_versions, recorded_version};
use fleet_schema::verify::schema_checksum;
use fleet_schema::Registry;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusOutput {
    /// Version recorded in the ledger, or inferred for a legacy database.
    current: u32,
    latest: u32,
    /// False when the database predates the ledger.
    ledger: bool,
    /// SHA-256 of the structural dump; equal across members on one version.
    schema_checksum: String,
    pending: Vec<StepEntry>,
    applied: Vec<AppliedEntry>,
}

#[derive(Debug, Serialize)]
struct StepEntry {
    version: u32,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct AppliedEntry {
    version: u32,
    name: Option<&'static str>,
    updated_at: DateTime<Utc>,
}

/// Execute the status command.
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let conn = open_existing(global)?;
    let registry = Registry::cluster();

    let recorded = recorded_version(&conn).context("Failed to read schema ledger")?;
    let current = match recorded {
        Some(version) => version,
        None => infer_legacy_version(&conn).context("Failed to infer legacy schema version")?,
    };

    let pending = registry
        .steps_from(current)
        .iter()
        .map(|step| StepEntry {
            version: step.version,
            name: step.name,
        })
        .collect();
    let applied = applied_versions(&conn)
        .context("Failed to read schema ledger")?
        .into_iter()
        .map(|row| AppliedEntry {
            version: row.version,
            name: registry.step(row.version).ok().map(|s| s.name),
            updated_at: row.updated_at,
        })
        .collect();

    let status = StatusOutput {
        current,
        latest: registry.latest(),
        ledger: recorded.is_some(),
        schema_checksum: schema_checksum(&conn).context("Failed to read schema")?,
        pending,
        applied,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&status).context("Failed to serialize status")?;
        println!("{json}");
    } else {
        print_status(&status);
    }
    Ok(())
}

fn print_status(status: &StatusOutput) {
    if status.ledger {
        println!("Schema version: {} (latest {})", status.current, status.latest);
    } else {
        println!(
            "Schema version: {} inferred, no ledger yet (latest {})",
            status.current, status.latest
        );
    }
    println!("Schema checksum: {}", status.schema_checksum);
    if status.current > status.latest {
        println!("Database is newer than this binary; it will refuse to start.");
    }

    if !status.applied.is_empty() {
        println!("\nApplied:");
        let rows: Vec<Vec<String>> = status
            .applied
            .iter()
            .map(|a| {
                vec![
                    a.version.to_string(),
                    a.name.unwrap_or("unknown").to_string(),
                    a.updated_at.to_rfc3339(),
                ]
            })
            .collect();
        common::print_table(&["VERSION", "NAME", "APPLIED AT"], &rows);
    }

    if status.pending.is_empty() {
        println!("\nNo pending updates.");
    } else {
        println!("\nPending ({}):", status.pending.len());
        let rows: Vec<Vec<String>> = status
            .pending
            .iter()
            .map(|p| vec![p.version.to_string(), p.name.to_string()])
            .collect();
        common::print_table(&["VERSION", "NAME"], &rows);
    }
}
