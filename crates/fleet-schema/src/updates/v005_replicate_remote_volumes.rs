//! Volumes on remote storage are reachable from every member, so every
//! member gets its own row for them.

use super::helpers::{copy_config, remote_drivers_sql, ConfigTable};
use crate::error::SchemaResult;
use crate::query::select_integers;
use rusqlite::{params, Transaction};
use std::collections::{BTreeSet, HashMap};

const VOLUME_CONFIG: ConfigTable = ConfigTable {
    table: "storage_volumes_config",
    owner: "storage_volume_id",
};

/// Rows sharing a pool, name and type; `source` is the lowest id.
struct VolumeGroup {
    source: i64,
    nodes: BTreeSet<i64>,
}

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    let nodes = select_integers(tx, "SELECT id FROM nodes ORDER BY id", [])?;

    let sql = format!(
        "SELECT v.id, v.storage_pool_id, v.name, v.type, v.node_id
           FROM storage_volumes v
           JOIN storage_pools p ON p.id = v.storage_pool_id
          WHERE p.driver IN {}
          ORDER BY v.id",
        remote_drivers_sql()
    );
    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                (
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ),
                row.get::<_, i64>(4)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: Vec<VolumeGroup> = Vec::new();
    let mut index: HashMap<(i64, String, i64), usize> = HashMap::new();
    for (id, key, node_id) in rows {
        let idx = *index.entry(key).or_insert_with(|| {
            groups.push(VolumeGroup {
                source: id,
                nodes: BTreeSet::new(),
            });
            groups.len() - 1
        });
        groups[idx].nodes.insert(node_id);
    }

    for group in &groups {
        for node_id in nodes.iter().filter(|n| !group.nodes.contains(*n)) {
            tx.execute(
                "INSERT INTO storage_volumes (name, storage_pool_id, node_id, type, description, snapshot)
                 SELECT name, storage_pool_id, ?1, type, description, snapshot
                   FROM storage_volumes WHERE id = ?2",
                params![node_id, group.source],
            )?;
            let replica = tx.last_insert_rowid();
            copy_config(tx, VOLUME_CONFIG, group.source, VOLUME_CONFIG, replica)?;
        }
    }
    Ok(())
}
