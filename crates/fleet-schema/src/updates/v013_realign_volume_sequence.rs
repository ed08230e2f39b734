use crate::error::SchemaResult;
use rusqlite::Transaction;

/// Snapshots kept their volume ids when they moved out, but the volume
/// sequence was not told. Raise it so a new volume never takes an id a
/// snapshot already has.
pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    let raised = tx.execute(
        "UPDATE sqlite_sequence
            SET seq = (SELECT MAX(id) FROM storage_volumes_snapshots)
          WHERE name = 'storage_volumes'
            AND seq < (SELECT MAX(id) FROM storage_volumes_snapshots)",
        [],
    )?;
    if raised > 0 {
        log::debug!("Raised storage volume sequence past snapshot ids");
    }
    Ok(())
}
