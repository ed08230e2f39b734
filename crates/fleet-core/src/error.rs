//! Error types for fleet-core

use thiserror::Error;

/// Core error type for fleetd
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Architecture name or id not recognised
    #[error("[C003] Unknown architecture: {0}")]
    UnknownArchitecture(String),

    /// C004: Legacy certificate kind with no identity counterpart
    #[error("[C004] Unknown certificate type {0}")]
    UnknownCertificateType(i64),

    /// C005: Identity type code not recognised
    #[error("[C005] Unknown identity type code {0}")]
    UnknownIdentityType(i64),

    /// C006: IO error with file path context
    #[error("[C006] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C007: YAML parse error
    #[error("[C007] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
