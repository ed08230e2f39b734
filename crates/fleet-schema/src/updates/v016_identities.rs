//! Certificates become TLS identities.
//!
//! The identifier is the stored fingerprint, unchanged. Fingerprints are
//! unique among certificates, so every certificate yields exactly one
//! identity; a clash on `(auth_method, identifier)` fails the step.

use crate::error::SchemaResult;
use fleet_core::{AuthMethod, CertificateMetadata, CertificateType, IdentityType};
use rusqlite::{params, Transaction};

struct LegacyCertificate {
    id: i64,
    fingerprint: String,
    kind: i64,
    name: String,
    certificate: String,
    restricted: bool,
}

pub(super) fn apply(tx: &Transaction<'_>) -> SchemaResult<()> {
    tx.execute_batch(
        "
CREATE TABLE identities (
    id          INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    auth_method INTEGER NOT NULL,
    type        INTEGER NOT NULL,
    identifier  TEXT NOT NULL,
    name        TEXT NOT NULL,
    metadata    TEXT NOT NULL,
    UNIQUE (auth_method, identifier)
);

CREATE TABLE identities_projects (
    identity_id INTEGER NOT NULL,
    project_id  INTEGER NOT NULL,
    UNIQUE (identity_id, project_id),
    FOREIGN KEY (identity_id) REFERENCES identities (id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects (id) ON DELETE CASCADE
);
",
    )?;

    let certificates = {
        let mut stmt = tx.prepare(
            "SELECT id, fingerprint, type, name, certificate, restricted
               FROM certificates ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(LegacyCertificate {
                    id: row.get(0)?,
                    fingerprint: row.get(1)?,
                    kind: row.get(2)?,
                    name: row.get(3)?,
                    certificate: row.get(4)?,
                    restricted: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows
    };

    let tls = AuthMethod::Tls.code();
    for cert in &certificates {
        let identity_type =
            IdentityType::from_certificate(CertificateType::from_code(cert.kind)?, cert.restricted);
        let identifier = cert.fingerprint.as_str();

        let metadata = CertificateMetadata::new(cert.certificate.as_str()).to_json()?;
        tx.execute(
            "INSERT INTO identities (auth_method, type, identifier, name, metadata)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![tls, identity_type.code(), identifier, cert.name, metadata],
        )?;
        let identity_id = tx.last_insert_rowid();
        tx.execute(
            "INSERT INTO identities_projects (identity_id, project_id)
             SELECT ?1, project_id FROM certificates_projects WHERE certificate_id = ?2
              ORDER BY project_id",
            params![identity_id, cert.id],
        )?;
    }

    tx.execute_batch(
        "
DROP TABLE certificates_projects;
DROP TABLE certificates;
",
    )?;
    Ok(())
}
