//! A single versioned schema update.

use crate::error::SchemaResult;
use rusqlite::Transaction;
use std::fmt;

/// Function applying one step inside the executor's transaction.
///
/// A step may run DDL, reshape rows, or both. It must not commit, roll back,
/// or touch the ledger.
pub type StepFn = fn(&Transaction<'_>) -> SchemaResult<()>;

/// One versioned unit of schema and data transformation.
///
/// Once released, a step is never edited; later steps correct earlier ones.
#[derive(Clone, Copy)]
pub struct Step {
    /// Version the database is at after this step (1-based).
    pub version: u32,
    /// Short name for logs and error messages.
    pub name: &'static str,
    /// The transformation itself.
    pub apply: StepFn,
}

impl Step {
    pub const fn new(version: u32, name: &'static str, apply: StepFn) -> Self {
        Self {
            version,
            name,
            apply,
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish()
    }
}
