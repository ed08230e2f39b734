//! Reshaping primitives shared by several steps.

use crate::error::SchemaResult;
use crate::query::select_integers;
use crate::row_helpers::validate_identifier;
use crate::verify::table_exists;
use rusqlite::{params, Connection, OptionalExtension};

/// Storage drivers whose volumes are visible from every member.
pub(super) const REMOTE_DRIVERS: &[&str] = &["ceph", "cephfs"];

/// `IN (...)` list of [`REMOTE_DRIVERS`] for splicing into SQL.
pub(super) fn remote_drivers_sql() -> String {
    let quoted: Vec<String> = REMOTE_DRIVERS.iter().map(|d| format!("'{d}'")).collect();
    format!("({})", quoted.join(", "))
}

/// A `key`/`value` table and the column pointing at its owner row.
#[derive(Debug, Clone, Copy)]
pub(super) struct ConfigTable {
    pub table: &'static str,
    pub owner: &'static str,
}

/// Copy every config entry of `from_id` in `from` to `to_id` in `to`.
pub(super) fn copy_config(
    conn: &Connection,
    from: ConfigTable,
    from_id: i64,
    to: ConfigTable,
    to_id: i64,
) -> SchemaResult<usize> {
    let sql = format!(
        "INSERT INTO {to_table} ({to_owner}, key, value) \
         SELECT ?1, key, value FROM {from_table} WHERE {from_owner} = ?2 ORDER BY id",
        to_table = to.table,
        to_owner = to.owner,
        from_table = from.table,
        from_owner = from.owner,
    );
    Ok(conn.execute(&sql, params![to_id, from_id])?)
}

/// Recreate `table` from `definition`, copying `columns` from the old table
/// through `select`.
///
/// Foreign key enforcement must be off: dependants keep referring to the
/// table by name and see the new one once it is renamed into place.
///
/// The AUTOINCREMENT sequence of the old table carries over, so ids of rows
/// deleted before the rebuild are not handed out again.
pub(super) fn rebuild_table(
    conn: &Connection,
    table: &str,
    definition: &str,
    columns: &str,
    select: &str,
) -> SchemaResult<()> {
    validate_identifier(table)?;
    let sequence = autoincrement_sequence(conn, table)?;
    conn.execute_batch(&format!(
        "CREATE TABLE {table}_new ({definition});
         INSERT INTO {table}_new ({columns}) SELECT {select} FROM {table};
         DROP TABLE {table};
         ALTER TABLE {table}_new RENAME TO {table};"
    ))?;
    if let Some(seq) = sequence {
        restore_sequence(conn, table, seq)?;
    }
    Ok(())
}

/// Current `sqlite_sequence` value of `table`, if it has one.
fn autoincrement_sequence(conn: &Connection, table: &str) -> SchemaResult<Option<i64>> {
    if !table_exists(conn, "sqlite_sequence")? {
        return Ok(None);
    }
    Ok(conn
        .query_row(
            "SELECT seq FROM sqlite_sequence WHERE name = ?1",
            params![table],
            |row| row.get(0),
        )
        .optional()?)
}

/// Raise the sequence of `table` to at least `seq`. Never lowers it.
fn restore_sequence(conn: &Connection, table: &str, seq: i64) -> SchemaResult<()> {
    let raised = conn.execute(
        "UPDATE sqlite_sequence SET seq = MAX(seq, ?2) WHERE name = ?1",
        params![table, seq],
    )?;
    if raised == 0 {
        conn.execute(
            "INSERT INTO sqlite_sequence (name, seq) VALUES (?1, ?2)",
            params![table, seq],
        )?;
    }
    Ok(())
}

/// Duplicate member-agnostic config rows whose key is member-specific once
/// per cluster member, then drop the global row.
///
/// `table` must have `(id, <owner>, node_id, key, value)` columns. With no
/// members there is nowhere to put the value, so global rows are kept.
/// Returns the number of global rows widened.
pub(super) fn widen_config_scope(
    conn: &Connection,
    config: ConfigTable,
    member_keys: &[&str],
) -> SchemaResult<usize> {
    let nodes = select_integers(conn, "SELECT id FROM nodes ORDER BY id", [])?;

    let sql = format!(
        "SELECT id, {owner}, key, value FROM {table} WHERE node_id IS NULL ORDER BY id",
        owner = config.owner,
        table = config.table,
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    let global: Vec<_> = rows
        .into_iter()
        .filter(|(_, _, key, _)| member_keys.contains(&key.as_str()))
        .collect();

    if global.is_empty() {
        return Ok(0);
    }
    if nodes.is_empty() {
        log::warn!(
            "No cluster members: keeping {} member-specific keys of {} global",
            global.len(),
            config.table
        );
        return Ok(0);
    }

    let insert = format!(
        "INSERT INTO {table} ({owner}, node_id, key, value) VALUES (?1, ?2, ?3, ?4)",
        table = config.table,
        owner = config.owner,
    );
    let delete = format!("DELETE FROM {} WHERE id = ?1", config.table);
    for (id, owner_id, key, value) in &global {
        for node_id in &nodes {
            conn.execute(&insert, params![owner_id, node_id, key, value])?;
        }
        conn.execute(&delete, params![id])?;
    }
    Ok(global.len())
}
