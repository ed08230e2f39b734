use super::*;
use crate::ledger::{applied_versions, recorded_version};
use crate::{Executor, Registry};
use rusqlite::Connection;

/// A database built by a binary that predates the ledger: the steps up to
/// `version` were applied and then the ledger dropped.
fn legacy_database(version: u32) -> Connection {
    let registry = Registry::cluster();
    let mut conn = Connection::open_in_memory().unwrap();
    Executor::new(&registry)
        .ensure_schema_to(&mut conn, version)
        .unwrap();
    conn.execute_batch("DROP TABLE schema").unwrap();
    conn
}

#[test]
fn empty_database_infers_zero() {
    let conn = Connection::open_in_memory().unwrap();
    assert_eq!(infer_legacy_version(&conn).unwrap(), 0);
}

#[test]
fn each_legacy_version_is_recognised() {
    for version in 1..=4 {
        let conn = legacy_database(version);
        assert_eq!(infer_legacy_version(&conn).unwrap(), version, "v{version}");
    }
}

#[test]
fn inference_does_not_write() {
    let conn = legacy_database(2);
    infer_legacy_version(&conn).unwrap();
    assert_eq!(recorded_version(&conn).unwrap(), None);
}

#[test]
fn partial_version_is_ambiguous() {
    let conn = legacy_database(3);
    conn.execute_batch("DROP TABLE storage_volumes_config").unwrap();
    let err = infer_legacy_version(&conn).unwrap_err();
    assert!(matches!(err, SchemaError::AmbiguousLegacySchema(_)));
    assert!(err.to_string().contains("version 3"));
}

#[test]
fn missing_column_marker_is_ambiguous() {
    let conn = legacy_database(3);
    conn.execute_batch(
        "CREATE TABLE storage_pools_nodes (id INTEGER PRIMARY KEY, storage_pool_id INTEGER, node_id INTEGER)",
    )
    .unwrap();
    assert!(matches!(
        infer_legacy_version(&conn),
        Err(SchemaError::AmbiguousLegacySchema(_))
    ));
}

#[test]
fn later_version_without_earlier_one_is_ambiguous() {
    let conn = legacy_database(3);
    conn.execute_batch("DROP TABLE operations").unwrap();
    let err = infer_legacy_version(&conn).unwrap_err();
    assert!(err.to_string().contains("version 2"));
}

#[test]
fn unknown_table_is_ambiguous() {
    let conn = legacy_database(2);
    conn.execute_batch("CREATE TABLE widgets (id INTEGER PRIMARY KEY)")
        .unwrap();
    let err = infer_legacy_version(&conn).unwrap_err();
    assert!(err.to_string().contains("widgets"));
}

#[test]
fn unrelated_database_is_ambiguous() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE accounts (id INTEGER PRIMARY KEY)")
        .unwrap();
    assert!(matches!(
        infer_legacy_version(&conn),
        Err(SchemaError::AmbiguousLegacySchema(_))
    ));
}

#[test]
fn custom_markers_are_honoured() {
    const MARKERS: &[LegacyMarker] = &[
        LegacyMarker {
            version: 1,
            tables: &["a"],
            columns: &[],
        },
        LegacyMarker {
            version: 2,
            tables: &[],
            columns: &[("a", "extra")],
        },
    ];
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE a (id INTEGER)").unwrap();
    assert_eq!(infer_version_with(&conn, MARKERS).unwrap(), 1);
    conn.execute_batch("ALTER TABLE a ADD COLUMN extra TEXT").unwrap();
    assert_eq!(infer_version_with(&conn, MARKERS).unwrap(), 2);
}

#[test]
fn reconcile_records_inferred_prefix() {
    let conn = legacy_database(4);
    assert_eq!(reconcile(&conn).unwrap(), 4);
    let versions: Vec<u32> = applied_versions(&conn)
        .unwrap()
        .iter()
        .map(|a| a.version)
        .collect();
    assert_eq!(versions, vec![1, 2, 3, 4]);
}

#[test]
fn reconcile_leaves_fresh_database_alone() {
    let conn = Connection::open_in_memory().unwrap();
    assert_eq!(reconcile(&conn).unwrap(), 0);
    assert_eq!(recorded_version(&conn).unwrap(), None);
}

#[test]
fn executor_completes_legacy_database() {
    let registry = Registry::cluster();
    let mut conn = legacy_database(2);
    conn.execute(
        "INSERT INTO nodes (id, name, address, schema, api_extensions) VALUES (1, 'n1', '1.1.1.1', 1, 1)",
        [],
    )
    .unwrap();

    let report = Executor::new(&registry).ensure_schema(&mut conn).unwrap();
    assert!(report.reconciled);
    assert_eq!(report.initial, 2);
    assert_eq!(report.current, registry.latest());
    assert_eq!(report.applied.first(), Some(&3));

    let nodes: i64 = conn
        .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))
        .unwrap();
    assert_eq!(nodes, 1);
}
