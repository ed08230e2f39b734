//! fleet-core - Core library for fleetd
//!
//! This crate provides the daemon configuration, the persisted identifiers
//! shared between the cluster database and the rest of the daemon (CPU
//! architectures, identity kinds), and checksums.

pub mod architecture;
pub mod checksum;
pub mod config;
pub mod error;
pub mod identity;

pub use architecture::Architecture;
pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig, MigrationConfig};
pub use error::{CoreError, CoreResult};
pub use identity::{AuthMethod, CertificateMetadata, CertificateType, IdentityType};
