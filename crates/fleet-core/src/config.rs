//! Configuration types and parsing for fleetd.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Daemon configuration from fleetd.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of this cluster member
    pub member: String,

    /// Cluster database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Schema migration settings
    #[serde(default)]
    pub migration: MigrationConfig,
}

/// Cluster database location and connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, relative to the daemon directory
    #[serde(default = "default_db_path")]
    pub path: String,

    /// How long a connection waits on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Schema migration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrationConfig {
    /// Abort startup if migrating takes longer than this. Unset means no limit.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_db_path() -> String {
    "database/global/db.sqlite".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a daemon directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("fleetd.yml");
        let yaml_path = dir.join("fleetd.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Reject values that parse but cannot work
    pub fn validate(&self) -> CoreResult<()> {
        if self.member.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "member name must not be empty".to_string(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "database.path must not be empty".to_string(),
            });
        }
        if self.migration.timeout_secs == Some(0) {
            return Err(CoreError::ConfigInvalid {
                message: "migration.timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Database path resolved against the daemon directory
    pub fn database_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.database.path)
    }

    /// Migration deadline, if one is configured
    pub fn migration_timeout(&self) -> Option<Duration> {
        self.migration.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
