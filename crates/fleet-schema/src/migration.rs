//! Schema update executor.
//!
//! Reads the ledger, then applies every pending step in ascending order, each
//! in its own transaction together with its ledger row. The first failure
//! rolls back that step and stops the walk.

use crate::error::{SchemaError, SchemaResult};
use crate::ledger::{self, ledger_exists, record_applied};
use crate::registry::Registry;
use crate::step::Step;
use crate::verify::check_foreign_keys;
use rusqlite::{Connection, TransactionBehavior};

/// Outcome of one executor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    /// Version found when the run started.
    pub initial: u32,
    /// Version after the run.
    pub current: u32,
    /// Versions applied by this run, ascending.
    pub applied: Vec<u32>,
    /// Whether a ledger-less legacy database was brought under ledger control.
    pub reconciled: bool,
}

impl MigrationReport {
    /// True when the database was already current.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Brings a database up to the registry's latest version.
///
/// Assumes exclusive write access to the database for the whole run.
#[derive(Debug, Clone, Copy)]
pub struct Executor<'r> {
    registry: &'r Registry,
}

impl<'r> Executor<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Apply every pending step.
    pub fn ensure_schema(&self, conn: &mut Connection) -> SchemaResult<MigrationReport> {
        self.ensure_schema_to(conn, self.registry.latest())
    }

    /// Apply pending steps up to and including `target`.
    ///
    /// Fails with [`SchemaError::Downgrade`] if the database is already past
    /// `target`, and with [`SchemaError::UpdateFailed`] naming the first step
    /// that could not be applied. The ledger is left at the last committed
    /// version in both cases.
    pub fn ensure_schema_to(
        &self,
        conn: &mut Connection,
        target: u32,
    ) -> SchemaResult<MigrationReport> {
        if target > self.registry.latest() {
            return Err(SchemaError::UnknownVersion(target));
        }

        let (initial, reconciled) = read_version(conn)?;
        if initial == target {
            log::debug!("Cluster schema is at version {initial}, nothing to apply");
            return Ok(MigrationReport {
                initial,
                current: initial,
                applied: Vec::new(),
                reconciled,
            });
        }
        if initial > target {
            return Err(SchemaError::Downgrade {
                current: initial,
                latest: target,
            });
        }

        let pending = self.registry.steps_between(initial, target)?;
        log::info!(
            "Updating cluster schema from version {initial} to {target} ({} steps)",
            pending.len()
        );

        let foreign_keys: bool = conn.pragma_query_value(None, "foreign_keys", |row| row.get(0))?;
        conn.pragma_update(None, "foreign_keys", false)?;
        let result = apply_all(conn, pending);
        let restored = conn.pragma_update(None, "foreign_keys", foreign_keys);

        let applied = result?;
        restored?;
        Ok(MigrationReport {
            initial,
            current: target,
            applied,
            reconciled,
        })
    }
}

/// Read the current version, reconciling a legacy database if needed.
fn read_version(conn: &mut Connection) -> SchemaResult<(u32, bool)> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Exclusive)
        .map_err(|e| SchemaError::Transaction(format!("BEGIN failed: {e}")))?;
    let had_ledger = ledger_exists(&tx)?;
    let version = ledger::current_version(&tx)?;
    tx.commit()
        .map_err(|e| SchemaError::Transaction(format!("COMMIT failed: {e}")))?;
    Ok((version, !had_ledger && version > 0))
}

fn apply_all(conn: &mut Connection, steps: &[Step]) -> SchemaResult<Vec<u32>> {
    let mut applied = Vec::with_capacity(steps.len());
    for step in steps {
        log::info!("Applying schema update v{:03} ({})", step.version, step.name);
        apply_step(conn, step).map_err(|e| SchemaError::UpdateFailed {
            version: step.version,
            name: step.name,
            source: Box::new(e),
        })?;
        applied.push(step.version);
    }
    Ok(applied)
}

/// Apply one step and record it, atomically.
///
/// Dropping the transaction on any error rolls it back.
fn apply_step(conn: &mut Connection, step: &Step) -> SchemaResult<()> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Exclusive)
        .map_err(|e| SchemaError::Transaction(format!("BEGIN failed: {e}")))?;
    (step.apply)(&tx)?;
    check_foreign_keys(&tx)?;
    record_applied(&tx, step.version)?;
    tx.commit()
        .map_err(|e| SchemaError::Transaction(format!("COMMIT failed: {e}")))?;
    Ok(())
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
