use crate::error::SchemaResult;
use rusqlite::Transaction;

/// Certificates can be restricted to a set of projects.
pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
ALTER TABLE certificates ADD COLUMN restricted INTEGER NOT NULL DEFAULT 0;

CREATE TABLE certificates_projects (
    certificate_id INTEGER NOT NULL,
    project_id     INTEGER NOT NULL,
    UNIQUE (certificate_id, project_id),
    FOREIGN KEY (certificate_id) REFERENCES certificates (id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
);
",
    )?;
    Ok(())
}
