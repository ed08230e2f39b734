use super::helpers::rebuild_table;
use crate::error::SchemaResult;
use fleet_core::Architecture;
use rusqlite::Transaction;

/// Every member records its architecture. Existing members are assumed to
/// run on the same architecture as the member applying the update.
pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    let arch = Architecture::local()?.id();
    let columns = "id, name, description, address, schema, api_extensions, heartbeat, pending";
    rebuild_table(
        tx,
        "nodes",
        "
    id             INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name           TEXT NOT NULL,
    description    TEXT DEFAULT '',
    address        TEXT NOT NULL,
    schema         INTEGER NOT NULL,
    api_extensions INTEGER NOT NULL,
    heartbeat      DATETIME DEFAULT CURRENT_TIMESTAMP,
    pending        INTEGER NOT NULL DEFAULT 0,
    arch           INTEGER NOT NULL CHECK (arch > 0),
    UNIQUE (name),
    UNIQUE (address)
",
        &format!("{columns}, arch"),
        &format!("{columns}, {arch}"),
    )?;
    Ok(())
}
