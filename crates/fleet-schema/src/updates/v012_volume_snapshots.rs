//! Volume snapshots move out of `storage_volumes` into their own table.
//!
//! Snapshot rows keep their ids so that anything that recorded one keeps
//! pointing at the same snapshot. `node_id` becomes nullable for volumes
//! that live on no particular member; uniqueness treats NULL as one value.

use super::helpers::{copy_config, rebuild_table, ConfigTable};
use crate::error::{SchemaError, SchemaResult};
use rusqlite::{params, OptionalExtension, Transaction};

const VOLUME_CONFIG: ConfigTable = ConfigTable {
    table: "storage_volumes_config",
    owner: "storage_volume_id",
};
const SNAPSHOT_CONFIG: ConfigTable = ConfigTable {
    table: "storage_volumes_snapshots_config",
    owner: "storage_volume_snapshot_id",
};

struct LegacySnapshot {
    id: i64,
    name: String,
    storage_pool_id: i64,
    node_id: i64,
    kind: i64,
    description: Option<String>,
}

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
CREATE TABLE storage_volumes_snapshots (
    id                INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    storage_volume_id INTEGER NOT NULL,
    name              TEXT NOT NULL,
    description       TEXT,
    UNIQUE (storage_volume_id, name),
    FOREIGN KEY (storage_volume_id) REFERENCES storage_volumes (id) ON DELETE CASCADE
);

CREATE TABLE storage_volumes_snapshots_config (
    id                         INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    storage_volume_snapshot_id INTEGER NOT NULL,
    key                        TEXT NOT NULL,
    value                      TEXT,
    UNIQUE (storage_volume_snapshot_id, key),
    FOREIGN KEY (storage_volume_snapshot_id) REFERENCES storage_volumes_snapshots (id) ON DELETE CASCADE
);
",
    )?;

    let snapshots = {
        let mut stmt = tx.prepare(
            "SELECT id, name, storage_pool_id, node_id, type, description
               FROM storage_volumes WHERE snapshot = 1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LegacySnapshot {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    storage_pool_id: row.get(2)?,
                    node_id: row.get(3)?,
                    kind: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    for snapshot in &snapshots {
        let Some((parent, name)) = snapshot.name.split_once('/') else {
            return Err(SchemaError::Transform(format!(
                "volume snapshot {} has malformed name '{}'",
                snapshot.id, snapshot.name
            )));
        };
        let volume_id: i64 = tx
            .query_row(
                "SELECT id FROM storage_volumes
                  WHERE storage_pool_id = ?1 AND node_id = ?2 AND type = ?3
                    AND name = ?4 AND snapshot = 0",
                params![snapshot.storage_pool_id, snapshot.node_id, snapshot.kind, parent],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| {
                SchemaError::Transform(format!(
                    "volume snapshot '{}' has no parent volume '{parent}'",
                    snapshot.name
                ))
            })?;
        tx.execute(
            "INSERT INTO storage_volumes_snapshots (id, storage_volume_id, name, description)
             VALUES (?1, ?2, ?3, ?4)",
            params![snapshot.id, volume_id, name, snapshot.description],
        )?;
        copy_config(tx, VOLUME_CONFIG, snapshot.id, SNAPSHOT_CONFIG, snapshot.id)?;
    }

    tx.execute_batch(
        "
DELETE FROM storage_volumes_config WHERE storage_volume_id IN (
    SELECT id FROM storage_volumes WHERE snapshot = 1);
DELETE FROM storage_volumes WHERE snapshot = 1;
",
    )?;

    let columns = "id, name, storage_pool_id, node_id, type, description";
    rebuild_table(
        tx,
        "storage_volumes",
        "
    id              INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name            TEXT NOT NULL,
    storage_pool_id INTEGER NOT NULL,
    node_id         INTEGER,
    type            INTEGER NOT NULL,
    description     TEXT,
    FOREIGN KEY (storage_pool_id) REFERENCES storage_pools (id) ON DELETE CASCADE,
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
",
        columns,
        columns,
    )?;
    tx.execute_batch(
        "CREATE UNIQUE INDEX storage_volumes_unique_storage_pool_id_node_id_name_type
             ON storage_volumes (storage_pool_id, IFNULL(node_id, -1), name, type);",
    )?;
    Ok(())
}
