//! Version ledger: the persisted record of applied steps.
//!
//! The ledger lives in the `schema` table created by step 1. Its versions are
//! always the gap-free prefix `1..=K` of the registry; the executor is the
//! only writer.

use crate::bootstrap;
use crate::error::{SchemaError, SchemaResult};
use crate::verify::table_exists;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "schema";

/// DDL of the ledger table. Shared by step 1 and legacy bootstrap.
pub(crate) const CREATE_LEDGER: &str = "
CREATE TABLE schema (
    id         INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    version    INTEGER NOT NULL,
    updated_at DATETIME NOT NULL,
    UNIQUE (version)
);
";

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedVersion {
    pub version: u32,
    pub updated_at: DateTime<Utc>,
}

/// Whether the ledger table exists yet.
pub fn ledger_exists(conn: &Connection) -> SchemaResult<bool> {
    table_exists(conn, LEDGER_TABLE)
}

/// Highest version recorded in the ledger, or `None` if there is no ledger.
///
/// Fails with [`SchemaError::CorruptLedger`] unless the recorded versions are
/// exactly `1..=max`.
pub fn recorded_version(conn: &Connection) -> SchemaResult<Option<u32>> {
    if !ledger_exists(conn)? {
        return Ok(None);
    }
    let (count, min, max): (i64, Option<i64>, Option<i64>) = conn.query_row(
        "SELECT COUNT(*), MIN(version), MAX(version) FROM schema",
        [],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    match (min, max) {
        (None, None) => Ok(Some(0)),
        (Some(1), Some(max)) if max == count => u32::try_from(max)
            .map(Some)
            .map_err(|_| SchemaError::CorruptLedger(format!("version {max} out of range"))),
        (min, max) => Err(SchemaError::CorruptLedger(format!(
            "{count} rows spanning versions {} to {}, expected 1 to {count}",
            min.unwrap_or(0),
            max.unwrap_or(0)
        ))),
    }
}

/// Current schema version of the database.
///
/// Returns 0 for a fresh database. A database written by a binary that
/// predates the ledger is reconciled once: its version is inferred from
/// structure and recorded, so callers must pass the transaction that will be
/// committed.
pub fn current_version(conn: &Connection) -> SchemaResult<u32> {
    match recorded_version(conn)? {
        Some(version) => Ok(version),
        None => bootstrap::reconcile(conn),
    }
}

/// Append `version` to the ledger.
///
/// Runs inside the same transaction as the step's own statements.
pub fn record_applied(conn: &Connection, version: u32) -> SchemaResult<()> {
    conn.execute(
        "INSERT INTO schema (version, updated_at) VALUES (?1, ?2)",
        params![version, Utc::now()],
    )
    .map_err(|e| SchemaError::CorruptLedger(format!("failed to record version {version}: {e}")))?;
    Ok(())
}

/// Every ledger row, ascending by version. Empty if there is no ledger.
pub fn applied_versions(conn: &Connection) -> SchemaResult<Vec<AppliedVersion>> {
    if !ledger_exists(conn)? {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare("SELECT version, updated_at FROM schema ORDER BY version")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(AppliedVersion {
                version: row.get(0)?,
                updated_at: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
