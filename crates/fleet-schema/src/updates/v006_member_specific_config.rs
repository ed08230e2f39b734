//! Some config keys only make sense per member. Global rows holding them are
//! copied to every member.

use super::helpers::{widen_config_scope, ConfigTable};
use crate::error::SchemaResult;
use rusqlite::Transaction;

const STORAGE_POOL_KEYS: &[&str] = &[
    "source",
    "volatile.initial_source",
    "zfs.pool_name",
    "lvm.thinpool_name",
    "lvm.vg_name",
];

const NETWORK_KEYS: &[&str] = &["bridge.external_interfaces"];

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    let pools = widen_config_scope(
        tx,
        ConfigTable {
            table: "storage_pools_config",
            owner: "storage_pool_id",
        },
        STORAGE_POOL_KEYS,
    )?;
    let networks = widen_config_scope(
        tx,
        ConfigTable {
            table: "networks_config",
            owner: "network_id",
        },
        NETWORK_KEYS,
    )?;
    log::debug!("Widened {pools} storage pool and {networks} network config rows");
    Ok(())
}
