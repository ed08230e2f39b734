//! Cluster database for fleetd.
//!
//! Owns the SQLite database shared by all cluster members: the ordered
//! catalog of schema updates, the ledger recording which of them have been
//! applied, and the executor that brings a database up to date before
//! anything else reads it.

pub mod bootstrap;
pub mod connection;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fixture;
pub mod ledger;
pub mod migration;
pub mod query;
pub mod registry;
pub(crate) mod row_helpers;
pub mod step;
pub mod updates;
pub mod verify;

pub use connection::ClusterDb;
pub use error::{SchemaError, SchemaResult};
pub use migration::{Executor, MigrationReport};
pub use registry::Registry;
pub use step::{Step, StepFn};
