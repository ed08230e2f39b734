//! Snapshots used to be instances of type 1 named `parent/snapshot`. They
//! move into their own tables, taking config, devices and device config
//! with them.

use super::helpers::{copy_config, ConfigTable};
use crate::error::{SchemaError, SchemaResult};
use rusqlite::types::Value;
use rusqlite::{params, OptionalExtension, Transaction};

/// Legacy `instances.type` of a snapshot row.
const SNAPSHOT_TYPE: i64 = 1;

const INSTANCE_CONFIG: ConfigTable = ConfigTable {
    table: "instances_config",
    owner: "instance_id",
};
const SNAPSHOT_CONFIG: ConfigTable = ConfigTable {
    table: "instances_snapshots_config",
    owner: "instance_snapshot_id",
};
const DEVICE_CONFIG: ConfigTable = ConfigTable {
    table: "instances_devices_config",
    owner: "instance_device_id",
};
const SNAPSHOT_DEVICE_CONFIG: ConfigTable = ConfigTable {
    table: "instances_snapshots_devices_config",
    owner: "instance_snapshot_device_id",
};

struct LegacySnapshot {
    id: i64,
    project_id: i64,
    name: String,
    creation_date: Value,
    stateful: i64,
    description: Option<String>,
    expiry_date: Value,
}

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(SCHEMA)?;

    let snapshots = {
        let mut stmt = tx.prepare(
            "SELECT id, project_id, name, creation_date, stateful, description, expiry_date
               FROM instances WHERE type = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![SNAPSHOT_TYPE], |row| {
                Ok(LegacySnapshot {
                    id: row.get(0)?,
                    project_id: row.get(1)?,
                    name: row.get(2)?,
                    creation_date: row.get(3)?,
                    stateful: row.get(4)?,
                    description: row.get(5)?,
                    expiry_date: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    for snapshot in &snapshots {
        move_snapshot(tx, snapshot)?;
    }

    tx.execute_batch(&format!(
        "
DELETE FROM instances_devices_config WHERE instance_device_id IN (
    SELECT id FROM instances_devices WHERE instance_id IN (
        SELECT id FROM instances WHERE type = {SNAPSHOT_TYPE}));
DELETE FROM instances_devices WHERE instance_id IN (
    SELECT id FROM instances WHERE type = {SNAPSHOT_TYPE});
DELETE FROM instances_config WHERE instance_id IN (
    SELECT id FROM instances WHERE type = {SNAPSHOT_TYPE});
DELETE FROM instances WHERE type = {SNAPSHOT_TYPE};
"
    ))?;
    Ok(())
}

fn move_snapshot(tx: &Transaction<'_>, snapshot: &LegacySnapshot) -> SchemaResult<()> {
    let Some((parent, name)) = snapshot.name.split_once('/') else {
        return Err(SchemaError::Transform(format!(
            "snapshot instance {} has malformed name '{}'",
            snapshot.id, snapshot.name
        )));
    };
    let instance_id: i64 = tx
        .query_row(
            "SELECT id FROM instances WHERE project_id = ?1 AND name = ?2 AND type != ?3",
            params![snapshot.project_id, parent, SNAPSHOT_TYPE],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| {
            SchemaError::Transform(format!(
                "snapshot '{}' has no parent instance '{parent}'",
                snapshot.name
            ))
        })?;

    tx.execute(
        "INSERT INTO instances_snapshots
             (instance_id, name, creation_date, stateful, description, expiry_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            instance_id,
            name,
            snapshot.creation_date,
            snapshot.stateful,
            snapshot.description,
            snapshot.expiry_date
        ],
    )?;
    let snapshot_id = tx.last_insert_rowid();
    copy_config(tx, INSTANCE_CONFIG, snapshot.id, SNAPSHOT_CONFIG, snapshot_id)?;

    let devices = {
        let mut stmt =
            tx.prepare("SELECT id, name, type FROM instances_devices WHERE instance_id = ?1 ORDER BY id")?;
        let rows = stmt
            .query_map(params![snapshot.id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };
    for (device_id, device_name, device_type) in devices {
        tx.execute(
            "INSERT INTO instances_snapshots_devices (instance_snapshot_id, name, type)
             VALUES (?1, ?2, ?3)",
            params![snapshot_id, device_name, device_type],
        )?;
        let snapshot_device_id = tx.last_insert_rowid();
        copy_config(
            tx,
            DEVICE_CONFIG,
            device_id,
            SNAPSHOT_DEVICE_CONFIG,
            snapshot_device_id,
        )?;
    }
    Ok(())
}

const SCHEMA: &str = "
CREATE TABLE instances_snapshots (
    id            INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    instance_id   INTEGER NOT NULL,
    name          TEXT NOT NULL,
    creation_date DATETIME NOT NULL DEFAULT 0,
    stateful      INTEGER NOT NULL DEFAULT 0,
    description   TEXT,
    expiry_date   DATETIME,
    UNIQUE (instance_id, name),
    FOREIGN KEY (instance_id) REFERENCES instances (id) ON DELETE CASCADE
);

CREATE TABLE instances_snapshots_config (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    instance_snapshot_id INTEGER NOT NULL,
    key                  TEXT NOT NULL,
    value                TEXT,
    UNIQUE (instance_snapshot_id, key),
    FOREIGN KEY (instance_snapshot_id) REFERENCES instances_snapshots (id) ON DELETE CASCADE
);

CREATE TABLE instances_snapshots_devices (
    id                   INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    instance_snapshot_id INTEGER NOT NULL,
    name                 TEXT NOT NULL,
    type                 INTEGER NOT NULL DEFAULT 0,
    UNIQUE (instance_snapshot_id, name),
    FOREIGN KEY (instance_snapshot_id) REFERENCES instances_snapshots (id) ON DELETE CASCADE
);

CREATE TABLE instances_snapshots_devices_config (
    id                          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    instance_snapshot_device_id INTEGER NOT NULL,
    key                         TEXT NOT NULL,
    value                       TEXT,
    UNIQUE (instance_snapshot_device_id, key),
    FOREIGN KEY (instance_snapshot_device_id) REFERENCES instances_snapshots_devices (id) ON DELETE CASCADE
);
";
