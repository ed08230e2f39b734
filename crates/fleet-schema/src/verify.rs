//! Structural and relational invariant checks.

use crate::error::{SchemaError, SchemaResult};
use crate::ledger::recorded_version;
use crate::query::{execute_query, list_tables, select_strings};
use crate::registry::Registry;
use crate::row_helpers::validate_identifier;
use fleet_core::compute_checksum;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;

/// Whether a table exists.
pub fn table_exists(conn: &Connection, table: &str) -> SchemaResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Whether `table` has a column named `column`. False if the table is missing.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> SchemaResult<bool> {
    validate_identifier(table)?;
    let columns = select_strings(
        conn,
        &format!("SELECT name FROM pragma_table_info('{table}')"),
        [],
    )?;
    Ok(columns.iter().any(|c| c == column))
}

/// Fail on the first dangling foreign key reference in the database.
///
/// Steps run with enforcement off, so this is how a step proves it kept
/// every reference intact before its transaction commits.
pub fn check_foreign_keys(conn: &Connection) -> SchemaResult<()> {
    let mut stmt = conn.prepare("PRAGMA foreign_key_check")?;
    let violation = stmt
        .query_map([], |row| {
            Ok(SchemaError::ForeignKeyViolation {
                table: row.get(0)?,
                rowid: row.get::<_, Option<i64>>(1)?.unwrap_or(-1),
                parent: row.get(2)?,
            })
        })?
        .next()
        .transpose()?;
    match violation {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Check that the ledger is intact and at the registry's latest version.
///
/// Returns the verified version.
pub fn verify_ledger(conn: &Connection, registry: &Registry) -> SchemaResult<u32> {
    let version = recorded_version(conn)?
        .ok_or_else(|| SchemaError::CorruptLedger("no schema ledger".to_string()))?;
    if version > registry.latest() {
        return Err(SchemaError::Downgrade {
            current: version,
            latest: registry.latest(),
        });
    }
    if version < registry.latest() {
        return Err(SchemaError::CorruptLedger(format!(
            "at version {version}, {} updates pending",
            registry.latest() - version
        )));
    }
    Ok(version)
}

/// The structural definition of the database: one `CREATE` statement per
/// table, index and view, sorted by kind and name.
pub fn schema_dump(conn: &Connection) -> SchemaResult<String> {
    let statements = select_strings(
        conn,
        "SELECT sql FROM sqlite_master \
         WHERE sql IS NOT NULL AND name NOT LIKE 'sqlite_%' \
         ORDER BY type, name",
        [],
    )?;
    Ok(statements
        .iter()
        .map(|sql| format!("{sql};"))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// SHA-256 of [`schema_dump`]. Members on the same version of the same
/// binary report the same checksum.
pub fn schema_checksum(conn: &Connection) -> SchemaResult<String> {
    Ok(compute_checksum(&schema_dump(conn)?))
}

/// Structure plus every row of every table.
///
/// Ledger timestamps are left out so that two databases migrated at
/// different times compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    pub schema: String,
    pub rows: BTreeMap<String, Vec<Vec<String>>>,
}

/// Capture a [`StateSnapshot`] of the database.
pub fn state_snapshot(conn: &Connection) -> SchemaResult<StateSnapshot> {
    let mut rows = BTreeMap::new();
    for table in list_tables(conn)? {
        let sql = if table == crate::ledger::LEDGER_TABLE {
            "SELECT id, version FROM schema ORDER BY id".to_string()
        } else {
            format!("SELECT * FROM {table} ORDER BY rowid")
        };
        rows.insert(table, execute_query(conn, &sql)?.rows);
    }
    Ok(StateSnapshot {
        schema: schema_dump(conn)?,
        rows,
    })
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
