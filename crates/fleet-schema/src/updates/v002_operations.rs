use crate::error::SchemaResult;
use rusqlite::Transaction;

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
CREATE TABLE operations (
    id      INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    uuid    TEXT NOT NULL,
    node_id INTEGER NOT NULL,
    UNIQUE (uuid),
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);
",
    )?;
    Ok(())
}
