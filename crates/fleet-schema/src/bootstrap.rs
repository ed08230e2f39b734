//! Version inference for databases that predate the ledger.
//!
//! Binaries from before the ledger existed created the structures of steps
//! 1 to 4 without recording anything. Such a database is recognised by the
//! exact set of tables and columns it holds; anything that does not match a
//! known version is refused rather than guessed.

use crate::error::{SchemaError, SchemaResult};
use crate::ledger::{record_applied, CREATE_LEDGER};
use crate::query::list_tables;
use crate::updates::LEGACY_MARKERS;
use crate::verify::{column_exists, table_exists};
use rusqlite::Connection;
use std::collections::BTreeSet;

/// Structural fingerprint of one legacy version.
#[derive(Debug, Clone, Copy)]
pub struct LegacyMarker {
    pub version: u32,
    /// Tables first created by this version.
    pub tables: &'static [&'static str],
    /// `(table, column)` pairs first added by this version.
    pub columns: &'static [(&'static str, &'static str)],
}

impl LegacyMarker {
    fn presence(&self, conn: &Connection) -> SchemaResult<Presence> {
        let mut found = 0;
        for table in self.tables {
            if table_exists(conn, table)? {
                found += 1;
            }
        }
        for (table, column) in self.columns {
            if column_exists(conn, table, column)? {
                found += 1;
            }
        }
        let expected = self.tables.len() + self.columns.len();
        Ok(match found {
            0 => Presence::Absent,
            n if n == expected => Presence::Complete,
            _ => Presence::Partial,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Presence {
    Absent,
    Partial,
    Complete,
}

/// Infer the version of a ledger-less database from its structure using the
/// shipped legacy markers. Read-only.
pub fn infer_legacy_version(conn: &Connection) -> SchemaResult<u32> {
    infer_version_with(conn, LEGACY_MARKERS)
}

/// Infer the version of a ledger-less database against `markers`.
///
/// Returns 0 for a database with no tables at all.
pub fn infer_version_with(conn: &Connection, markers: &[LegacyMarker]) -> SchemaResult<u32> {
    let tables = list_tables(conn)?;
    if tables.is_empty() {
        return Ok(0);
    }

    let mut inferred = 0;
    let mut absent_at = None;
    for marker in markers {
        match marker.presence(conn)? {
            Presence::Complete => {
                if let Some(missing) = absent_at {
                    return Err(SchemaError::AmbiguousLegacySchema(format!(
                        "structures of version {} are present but those of version {missing} are not",
                        marker.version
                    )));
                }
                inferred = marker.version;
            }
            Presence::Partial => {
                return Err(SchemaError::AmbiguousLegacySchema(format!(
                    "structures of version {} are only partially present",
                    marker.version
                )));
            }
            Presence::Absent => {
                absent_at.get_or_insert(marker.version);
            }
        }
    }

    let known: BTreeSet<&str> = markers
        .iter()
        .filter(|m| m.version <= inferred)
        .flat_map(|m| m.tables.iter().copied())
        .collect();
    let unknown: Vec<&str> = tables
        .iter()
        .map(String::as_str)
        .filter(|t| !known.contains(t))
        .collect();
    if !unknown.is_empty() {
        return Err(SchemaError::AmbiguousLegacySchema(format!(
            "unrecognised tables for version {inferred}: {}",
            unknown.join(", ")
        )));
    }
    Ok(inferred)
}

/// Bring a ledger-less database under ledger control.
///
/// Creates the ledger and records versions `1..=K` for the inferred `K`.
/// A fresh database is left untouched (step 1 creates the ledger).
pub(crate) fn reconcile(conn: &Connection) -> SchemaResult<u32> {
    let version = infer_legacy_version(conn)?;
    if version == 0 {
        return Ok(0);
    }
    log::warn!("Database has no schema ledger; structure matches version {version}, recording it");
    conn.execute_batch(CREATE_LEDGER)?;
    for v in 1..=version {
        record_applied(conn, v)?;
    }
    Ok(version)
}

#[cfg(test)]
#[path = "bootstrap_test.rs"]
mod tests;
