use crate::error::SchemaResult;
use rusqlite::Transaction;

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch("ALTER TABLE operations ADD COLUMN type INTEGER NOT NULL DEFAULT 0;")?;
    Ok(())
}
