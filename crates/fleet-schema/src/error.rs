//! Error types for the cluster database and its schema updates.

use fleet_core::CoreError;
use thiserror::Error;

/// Cluster database errors.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The step catalog is malformed: duplicate, missing or out-of-order
    /// versions (S001). A programming error, never retried.
    #[error("[S001] Invalid schema registry: {0}")]
    Registry(String),

    /// The database was written by a newer binary (S002).
    #[error("[S002] Database schema version {current} is newer than the latest version {latest} known to this binary")]
    Downgrade { current: u32, latest: u32 },

    /// A step, its integrity check, or its ledger write failed and was rolled
    /// back (S003).
    #[error("[S003] Schema update to version {version} ({name}) failed: {source}")]
    UpdateFailed {
        version: u32,
        name: &'static str,
        #[source]
        source: Box<SchemaError>,
    },

    /// A pre-ledger database does not match any known structure (S004).
    #[error("[S004] Cannot determine schema version of legacy database: {0}")]
    AmbiguousLegacySchema(String),

    /// The ledger does not hold a gap-free prefix of versions (S005).
    #[error("[S005] Schema ledger is corrupt: {0}")]
    CorruptLedger(String),

    /// `PRAGMA foreign_key_check` reported dangling references (S006).
    #[error("[S006] Foreign key violation: row {rowid} of '{table}' references missing row in '{parent}'")]
    ForeignKeyViolation {
        table: String,
        rowid: i64,
        parent: String,
    },

    /// A version outside the registry was requested (S007).
    #[error("[S007] Unknown schema version {0}")]
    UnknownVersion(u32),

    /// Existing rows cannot be reshaped without guessing (S008).
    #[error("[S008] Data transformation failed: {0}")]
    Transform(String),

    /// Failed to open or configure the database (S009).
    #[error("[S009] Cluster database connection failed: {0}")]
    Connection(String),

    /// Transaction management error (S010).
    #[error("[S010] Cluster database transaction failed: {0}")]
    Transaction(String),

    /// Domain type conversion error (S011).
    #[error("[S011] {0}")]
    Core(#[from] CoreError),

    /// SQLite driver error with preserved source chain (S012).
    #[error("[S012] SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A table or column name passed by the caller is not a plain
    /// identifier (S013).
    #[error("[S013] Invalid identifier '{0}': must contain only alphanumeric characters and underscores")]
    InvalidIdentifier(String),
}

/// Result type alias for [`SchemaError`].
pub type SchemaResult<T> = Result<T, SchemaError>;

impl From<rusqlite::Error> for SchemaError {
    fn from(err: rusqlite::Error) -> Self {
        SchemaError::Sqlite(err)
    }
}

impl SchemaError {
    /// Version of the step that failed, if this is an update failure.
    pub fn failed_version(&self) -> Option<u32> {
        match self {
            SchemaError::UpdateFailed { version, .. } => Some(*version),
            _ => None,
        }
    }

    /// Whether the root cause is an SQLite constraint violation.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            SchemaError::Sqlite(err) => is_constraint_violation(err),
            SchemaError::UpdateFailed { source, .. } => source.is_constraint_violation(),
            _ => false,
        }
    }
}

/// Whether an SQLite error is a constraint violation (unique, not null,
/// check, foreign key).
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    )
}
