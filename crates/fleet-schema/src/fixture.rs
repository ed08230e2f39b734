//! Test fixtures for individual schema updates.
//!
//! A fixture walks a fresh in-memory database up to the version just below
//! the step under test, lets the test insert rows in that older shape, and
//! then applies the step.

use crate::error::{SchemaError, SchemaResult};
use crate::migration::Executor;
use crate::registry::Registry;
use rusqlite::Connection;

/// Seed argument for [`Registry::exercise_update`] when no rows are needed.
pub const NO_SEED: Option<fn(&Connection) -> SchemaResult<()>> = None;

impl Registry {
    /// Build an in-memory database at version `target`.
    ///
    /// Steps `1..target` are applied first, then `seed` runs against the
    /// database at version `target - 1`, then step `target` is applied. The
    /// returned connection has foreign key enforcement on. Errors from the
    /// seed or from any step are returned as-is.
    pub fn exercise_update<F>(&self, target: u32, seed: Option<F>) -> SchemaResult<Connection>
    where
        F: FnOnce(&Connection) -> SchemaResult<()>,
    {
        self.step(target)?;
        let mut conn =
            Connection::open_in_memory().map_err(|e| SchemaError::Connection(e.to_string()))?;
        conn.pragma_update(None, "foreign_keys", true)?;

        let executor = Executor::new(self);
        executor.ensure_schema_to(&mut conn, target - 1)?;
        if let Some(seed) = seed {
            seed(&conn)?;
        }
        executor.ensure_schema_to(&mut conn, target)?;
        Ok(conn)
    }
}
