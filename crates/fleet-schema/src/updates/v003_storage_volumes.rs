use crate::error::SchemaResult;
use rusqlite::Transaction;

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
CREATE TABLE storage_volumes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name            TEXT NOT NULL,
    storage_pool_id INTEGER NOT NULL,
    node_id         INTEGER NOT NULL,
    type            INTEGER NOT NULL,
    description     TEXT,
    snapshot        INTEGER NOT NULL DEFAULT 0,
    UNIQUE (storage_pool_id, node_id, name, type),
    FOREIGN KEY (storage_pool_id) REFERENCES storage_pools (id) ON DELETE CASCADE,
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);

CREATE TABLE storage_volumes_config (
    id                INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    storage_volume_id INTEGER NOT NULL,
    key               TEXT NOT NULL,
    value             TEXT,
    UNIQUE (storage_volume_id, key),
    FOREIGN KEY (storage_volume_id) REFERENCES storage_volumes (id) ON DELETE CASCADE
);
",
    )?;
    Ok(())
}
