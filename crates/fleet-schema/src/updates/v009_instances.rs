use crate::error::SchemaResult;
use rusqlite::Transaction;

/// Containers become instances.
pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
ALTER TABLE containers RENAME TO instances;
ALTER TABLE containers_config RENAME TO instances_config;
ALTER TABLE instances_config RENAME COLUMN container_id TO instance_id;
ALTER TABLE containers_devices RENAME TO instances_devices;
ALTER TABLE instances_devices RENAME COLUMN container_id TO instance_id;
ALTER TABLE containers_devices_config RENAME TO instances_devices_config;
ALTER TABLE instances_devices_config RENAME COLUMN container_device_id TO instance_device_id;
ALTER TABLE instances ADD COLUMN expiry_date DATETIME;
",
    )?;
    Ok(())
}
