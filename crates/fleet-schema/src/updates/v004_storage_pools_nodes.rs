use crate::error::SchemaResult;
use rusqlite::Transaction;

/// Pool membership per member, plus the pool lifecycle state.
pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
ALTER TABLE storage_pools ADD COLUMN state INTEGER NOT NULL DEFAULT 0;

CREATE TABLE storage_pools_nodes (
    id              INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    storage_pool_id INTEGER NOT NULL,
    node_id         INTEGER NOT NULL,
    UNIQUE (storage_pool_id, node_id),
    FOREIGN KEY (storage_pool_id) REFERENCES storage_pools (id) ON DELETE CASCADE,
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);
",
    )?;
    Ok(())
}
