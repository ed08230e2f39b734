//! Shared helpers for reading SQLite row columns as strings.

use rusqlite::types::ValueRef;

/// Read a column value as a String, whatever its storage class.
///
/// NULL becomes `"null"`; blobs are rendered as lower-case hex.
pub(crate) fn get_column_as_string(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => "null".to_string(),
        ValueRef::Integer(n) => n.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => b.iter().map(|byte| format!("{byte:02x}")).collect(),
    })
}

/// Reject anything but `[A-Za-z0-9_]` in an identifier spliced into SQL.
pub(crate) fn validate_identifier(name: &str) -> crate::SchemaResult<()> {
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(crate::SchemaError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}
