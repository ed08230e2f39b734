//! Remote volumes go back to a single row not tied to any member, undoing
//! the per-member replication. The newest row of each group survives.

use super::helpers::remote_drivers_sql;
use crate::error::SchemaResult;
use rusqlite::{params, Transaction};

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    let sql = format!(
        "SELECT v.storage_pool_id, v.name, v.type, MAX(v.id)
           FROM storage_volumes v
           JOIN storage_pools p ON p.id = v.storage_pool_id
          WHERE p.driver IN {}
          GROUP BY v.storage_pool_id, v.name, v.type
          ORDER BY MAX(v.id)",
        remote_drivers_sql()
    );
    let groups = {
        let mut stmt = tx.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    let mut removed = 0;
    for (pool_id, name, kind, keep) in &groups {
        let duplicates = "SELECT id FROM storage_volumes
                           WHERE storage_pool_id = ?1 AND name = ?2 AND type = ?3 AND id != ?4";
        tx.execute(
            &format!(
                "DELETE FROM storage_volumes_snapshots_config WHERE storage_volume_snapshot_id IN (
                     SELECT id FROM storage_volumes_snapshots WHERE storage_volume_id IN ({duplicates}))"
            ),
            params![pool_id, name, kind, keep],
        )?;
        tx.execute(
            &format!("DELETE FROM storage_volumes_snapshots WHERE storage_volume_id IN ({duplicates})"),
            params![pool_id, name, kind, keep],
        )?;
        tx.execute(
            &format!("DELETE FROM storage_volumes_config WHERE storage_volume_id IN ({duplicates})"),
            params![pool_id, name, kind, keep],
        )?;
        removed += tx.execute(
            &format!("DELETE FROM storage_volumes WHERE id IN ({duplicates})"),
            params![pool_id, name, kind, keep],
        )?;
        tx.execute(
            "UPDATE storage_volumes SET node_id = NULL WHERE id = ?1",
            params![keep],
        )?;
    }
    log::debug!(
        "Collapsed {} remote volumes, removed {removed} replicas",
        groups.len()
    );
    Ok(())
}
