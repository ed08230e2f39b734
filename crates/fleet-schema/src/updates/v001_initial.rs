use crate::error::SchemaResult;
use crate::ledger::CREATE_LEDGER;
use rusqlite::Transaction;

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(CREATE_LEDGER)?;
    tx.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = "
CREATE TABLE nodes (
    id             INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name           TEXT NOT NULL,
    description    TEXT DEFAULT '',
    address        TEXT NOT NULL,
    schema         INTEGER NOT NULL,
    api_extensions INTEGER NOT NULL,
    heartbeat      DATETIME DEFAULT CURRENT_TIMESTAMP,
    pending        INTEGER NOT NULL DEFAULT 0,
    UNIQUE (name),
    UNIQUE (address)
);

CREATE TABLE config (
    id    INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    key   TEXT NOT NULL,
    value TEXT,
    UNIQUE (key)
);

CREATE TABLE certificates (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    fingerprint TEXT NOT NULL,
    type        INTEGER NOT NULL,
    name        TEXT NOT NULL,
    certificate TEXT NOT NULL,
    UNIQUE (fingerprint)
);

CREATE TABLE networks (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    state       INTEGER NOT NULL DEFAULT 0,
    UNIQUE (name)
);

CREATE TABLE networks_config (
    id         INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    network_id INTEGER NOT NULL,
    node_id    INTEGER,
    key        TEXT NOT NULL,
    value      TEXT,
    UNIQUE (network_id, node_id, key),
    FOREIGN KEY (network_id) REFERENCES networks (id) ON DELETE CASCADE,
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);

CREATE TABLE storage_pools (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name        TEXT NOT NULL,
    driver      TEXT NOT NULL,
    description TEXT,
    UNIQUE (name)
);

CREATE TABLE storage_pools_config (
    id              INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    storage_pool_id INTEGER NOT NULL,
    node_id         INTEGER,
    key             TEXT NOT NULL,
    value           TEXT,
    UNIQUE (storage_pool_id, node_id, key),
    FOREIGN KEY (storage_pool_id) REFERENCES storage_pools (id) ON DELETE CASCADE,
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);

CREATE TABLE containers (
    id            INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    node_id       INTEGER NOT NULL,
    name          TEXT NOT NULL,
    architecture  INTEGER NOT NULL,
    type          INTEGER NOT NULL,
    ephemeral     INTEGER NOT NULL DEFAULT 0,
    creation_date DATETIME NOT NULL DEFAULT 0,
    stateful      INTEGER NOT NULL DEFAULT 0,
    last_use_date DATETIME,
    description   TEXT,
    UNIQUE (name),
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE
);

CREATE TABLE containers_config (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    container_id INTEGER NOT NULL,
    key          TEXT NOT NULL,
    value        TEXT,
    UNIQUE (container_id, key),
    FOREIGN KEY (container_id) REFERENCES containers (id) ON DELETE CASCADE
);

CREATE TABLE containers_devices (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    container_id INTEGER NOT NULL,
    name         TEXT NOT NULL,
    type         INTEGER NOT NULL DEFAULT 0,
    UNIQUE (container_id, name),
    FOREIGN KEY (container_id) REFERENCES containers (id) ON DELETE CASCADE
);

CREATE TABLE containers_devices_config (
    id                  INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    container_device_id INTEGER NOT NULL,
    key                 TEXT NOT NULL,
    value               TEXT,
    UNIQUE (container_device_id, key),
    FOREIGN KEY (container_device_id) REFERENCES containers_devices (id) ON DELETE CASCADE
);

CREATE TABLE images (
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    fingerprint  TEXT NOT NULL,
    filename     TEXT NOT NULL,
    size         INTEGER NOT NULL,
    public       INTEGER NOT NULL DEFAULT 0,
    architecture INTEGER NOT NULL,
    upload_date  DATETIME NOT NULL,
    UNIQUE (fingerprint)
);

CREATE TABLE images_aliases (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name        TEXT NOT NULL,
    image_id    INTEGER NOT NULL,
    description TEXT,
    UNIQUE (name),
    FOREIGN KEY (image_id) REFERENCES images (id) ON DELETE CASCADE
);
";
