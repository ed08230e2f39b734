//! Cluster database connection wrapper.
//!
//! [`ClusterDb`] owns an SQLite [`Connection`] that has been brought up to the
//! registry's latest schema version. Nothing else may query the database
//! before this handle exists.

use crate::error::{SchemaError, SchemaResult};
use crate::migration::{Executor, MigrationReport};
use crate::registry::Registry;
use fleet_core::DatabaseConfig;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::time::Duration;

/// Wrapper around the connection to the shared cluster database.
pub struct ClusterDb {
    conn: Connection,
    report: MigrationReport,
}

impl ClusterDb {
    /// Open (or create) the database at `path` and apply pending updates.
    pub fn open(path: &Path, registry: &Registry) -> SchemaResult<Self> {
        let conn = open_connection(path, DatabaseConfig::default().busy_timeout())?;
        Self::from_connection(conn, registry)
    }

    /// Open the database described by `config`, resolving a relative path
    /// against `root`.
    pub fn open_with(root: &Path, config: &DatabaseConfig, registry: &Registry) -> SchemaResult<Self> {
        let path = root.join(&config.path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SchemaError::Connection(format!("{e}: {}", parent.display()))
            })?;
        }
        let conn = open_connection(&path, config.busy_timeout())?;
        Self::from_connection(conn, registry)
    }

    /// Create an in-memory database with all updates applied.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory(registry: &Registry) -> SchemaResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| SchemaError::Connection(e.to_string()))?;
        configure(&conn, DatabaseConfig::default().busy_timeout())?;
        Self::from_connection(conn, registry)
    }

    /// Take ownership of an open connection and apply pending updates.
    pub fn from_connection(mut conn: Connection, registry: &Registry) -> SchemaResult<Self> {
        let report = Executor::new(registry).ensure_schema(&mut conn)?;
        Ok(Self { conn, report })
    }

    /// Borrow the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Schema version the database is at.
    pub fn schema_version(&self) -> u32 {
        self.report.current
    }

    /// What the startup run applied.
    pub fn migration_report(&self) -> &MigrationReport {
        &self.report
    }

    /// Execute `body` within a transaction, committing on success and
    /// rolling back on error.
    pub fn transaction<F, T>(&mut self, body: F) -> SchemaResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> SchemaResult<T>,
    {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| SchemaError::Transaction(format!("BEGIN failed: {e}")))?;
        let value = body(&tx)?;
        tx.commit()
            .map_err(|e| SchemaError::Transaction(format!("COMMIT failed: {e}")))?;
        Ok(value)
    }

    /// Hand the connection over to the rest of the daemon.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

/// Open a connection with the pragmas every daemon connection uses, without
/// touching the schema.
pub fn open_connection(path: &Path, busy_timeout: Duration) -> SchemaResult<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| SchemaError::Connection(format!("{e}: {}", path.display())))?;
    configure(&conn, busy_timeout)?;
    Ok(conn)
}

fn configure(conn: &Connection, busy_timeout: Duration) -> SchemaResult<()> {
    conn.busy_timeout(busy_timeout)
        .map_err(|e| SchemaError::Connection(format!("busy_timeout: {e}")))?;
    conn.pragma_update(None, "foreign_keys", true)
        .map_err(|e| SchemaError::Connection(format!("foreign_keys: {e}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
