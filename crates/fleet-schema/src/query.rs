//! Query helpers for reading and counting rows.
//!
//! Used by steps to reshape data, by the invariant checks, and by callers
//! that inspect the database without a typed model.

use crate::error::SchemaResult;
use crate::row_helpers::{get_column_as_string, validate_identifier};
use rusqlite::{Connection, Params};
use std::collections::HashMap;

/// Result of executing an ad-hoc SQL query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Column names from the result set.
    pub columns: Vec<String>,
    /// Rows of string-coerced values.
    pub rows: Vec<Vec<String>>,
}

/// Execute an ad-hoc SQL query and return all results as strings.
pub fn execute_query(conn: &Connection, sql: &str) -> SchemaResult<QueryResult> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let rows = stmt
        .query_map([], |row| {
            (0..column_count)
                .map(|i| get_column_as_string(row, i))
                .collect::<rusqlite::Result<Vec<_>>>()
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QueryResult { columns, rows })
}

/// List all user tables, excluding SQLite's internal ones.
pub fn list_tables(conn: &Connection) -> SchemaResult<Vec<String>> {
    select_strings(
        conn,
        "SELECT name FROM sqlite_master \
         WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
         ORDER BY name",
        [],
    )
}

/// Get the row count for a table.
pub fn table_row_count(conn: &Connection, table: &str) -> SchemaResult<i64> {
    count(conn, table, "", [])
}

/// Count rows of `table` matching an optional `WHERE` clause.
pub fn count<P: Params>(
    conn: &Connection,
    table: &str,
    where_clause: &str,
    params: P,
) -> SchemaResult<i64> {
    validate_identifier(table)?;
    let mut sql = format!("SELECT COUNT(*) FROM {table}");
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    let n = conn.query_row(&sql, params, |row| row.get(0))?;
    Ok(n)
}

/// Run a single-column query returning integers.
pub fn select_integers<P: Params>(conn: &Connection, sql: &str, params: P) -> SchemaResult<Vec<i64>> {
    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<Result<Vec<i64>, _>>()?;
    Ok(values)
}

/// Run a single-column query returning strings.
pub fn select_strings<P: Params>(conn: &Connection, sql: &str, params: P) -> SchemaResult<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let values = stmt
        .query_map(params, |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(values)
}

/// Read `key`/`value` pairs from a config table.
///
/// NULL values read as empty strings.
pub fn select_config<P: Params>(
    conn: &Connection,
    table: &str,
    where_clause: &str,
    params: P,
) -> SchemaResult<HashMap<String, String>> {
    validate_identifier(table)?;
    let mut sql = format!("SELECT key, value FROM {table}");
    if !where_clause.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(where_clause);
    }
    let mut stmt = conn.prepare(&sql)?;
    let config = stmt
        .query_map(params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, Option<String>>(1)?.unwrap_or_default(),
            ))
        })?
        .collect::<Result<HashMap<_, _>, _>>()?;
    Ok(config)
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
