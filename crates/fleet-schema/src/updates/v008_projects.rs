//! Projects. Everything that existed before lands in the `default` project,
//! and names only need to be unique within a project.

use super::helpers::rebuild_table;
use crate::error::SchemaResult;
use rusqlite::Transaction;

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
CREATE TABLE projects (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name        TEXT NOT NULL,
    description TEXT,
    UNIQUE (name)
);

CREATE TABLE projects_config (
    id         INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    project_id INTEGER NOT NULL,
    key        TEXT NOT NULL,
    value      TEXT,
    UNIQUE (project_id, key),
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
);

INSERT INTO projects (id, name, description) VALUES (1, 'default', 'Default project');
",
    )?;

    let columns = "id, node_id, name, architecture, type, ephemeral, creation_date, \
                   stateful, last_use_date, description";
    rebuild_table(
        tx,
        "containers",
        "
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
    project_id    INTEGER NOT NULL DEFAULT 1,
    UNIQUE (project_id, name),
    FOREIGN KEY (node_id) REFERENCES nodes (id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
",
        columns,
        columns,
    )?;

    let columns = "id, fingerprint, filename, size, public, architecture, upload_date";
    rebuild_table(
        tx,
        "images",
        "
    id           INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    fingerprint  TEXT NOT NULL,
    filename     TEXT NOT NULL,
    size         INTEGER NOT NULL,
    public       INTEGER NOT NULL DEFAULT 0,
    architecture INTEGER NOT NULL,
    upload_date  DATETIME NOT NULL,
    project_id   INTEGER NOT NULL DEFAULT 1,
    UNIQUE (project_id, fingerprint),
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
",
        columns,
        columns,
    )?;

    let columns = "id, name, image_id, description";
    rebuild_table(
        tx,
        "images_aliases",
        "
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    name        TEXT NOT NULL,
    image_id    INTEGER NOT NULL,
    description TEXT,
    project_id  INTEGER NOT NULL DEFAULT 1,
    UNIQUE (project_id, name),
    FOREIGN KEY (image_id) REFERENCES images (id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
",
        columns,
        columns,
    )?;
    Ok(())
}
