//! End-to-end tests for the fleetd binary.

use std::path::Path;
use std::process::Command;

/// Path to the compiled fleetd binary
fn fleetd_bin() -> String {
    env!("CARGO_BIN_EXE_fleetd").to_string()
}

/// Run `fleetd` in `dir` and return (stdout, stderr, success).
fn run_fleetd(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(fleetd_bin())
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("FLEETD_DATABASE")
        .output()
        .unwrap_or_else(|e| panic!("Failed to execute fleetd with args {:?}: {}", args, e));
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn daemon_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fleetd.yml"), "member: node1\n").unwrap();
    dir
}

fn db_path(dir: &Path) -> std::path::PathBuf {
    dir.join("database/global/db.sqlite")
}

// ── migrate ────────────────────────────────────────────────────────────

#[test]
fn migrate_creates_database_at_latest() {
    let dir = daemon_dir();
    let (stdout, stderr, ok) = run_fleetd(dir.path(), &["migrate"]);
    assert!(ok, "migrate failed: {stderr}");
    assert!(stdout.contains("from version 0 to 16"), "{stdout}");
    assert!(db_path(dir.path()).exists());

    let (stdout, _, ok) = run_fleetd(dir.path(), &["migrate"]);
    assert!(ok);
    assert!(stdout.contains("up to date (version 16)"), "{stdout}");
}

#[test]
fn migrate_to_intermediate_version() {
    let dir = daemon_dir();
    let (stdout, _, ok) = run_fleetd(dir.path(), &["migrate", "--to", "5"]);
    assert!(ok);
    assert!(stdout.contains("to 5"), "{stdout}");

    let (stdout, _, ok) = run_fleetd(dir.path(), &["status"]);
    assert!(ok);
    assert!(stdout.contains("Schema version: 5 (latest 16)"), "{stdout}");
    assert!(stdout.contains("Pending (11)"), "{stdout}");
}

#[test]
fn migrate_refuses_unknown_target() {
    let dir = daemon_dir();
    let (_, stderr, ok) = run_fleetd(dir.path(), &["migrate", "--to", "99"]);
    assert!(!ok);
    assert!(stderr.contains("S007"), "{stderr}");
}

#[test]
fn migrate_refuses_newer_database() {
    let dir = daemon_dir();
    assert!(run_fleetd(dir.path(), &["migrate"]).2);

    let conn = rusqlite::Connection::open(db_path(dir.path())).unwrap();
    conn.execute(
        "INSERT INTO schema (version, updated_at) VALUES (17, '2030-01-01T00:00:00Z')",
        [],
    )
    .unwrap();
    drop(conn);

    let (_, stderr, ok) = run_fleetd(dir.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("S002"), "{stderr}");
}

#[test]
fn migrate_without_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, ok) = run_fleetd(dir.path(), &["migrate"]);
    assert!(!ok);
    assert!(stderr.contains("configuration"), "{stderr}");
}

// ── inspection ─────────────────────────────────────────────────────────

#[test]
fn status_json_after_migrate() {
    let dir = daemon_dir();
    assert!(run_fleetd(dir.path(), &["migrate"]).2);

    let (stdout, _, ok) = run_fleetd(dir.path(), &["status", "--json"]);
    assert!(ok);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["current"], 16);
    assert_eq!(status["latest"], 16);
    assert_eq!(status["ledger"], true);
    assert_eq!(status["pending"].as_array().unwrap().len(), 0);
    assert_eq!(status["applied"].as_array().unwrap().len(), 16);
    assert_eq!(status["applied"][0]["name"], "initial");
    assert_eq!(status["schema_checksum"].as_str().unwrap().len(), 64);
}

#[test]
fn status_reports_legacy_database() {
    let dir = daemon_dir();
    assert!(run_fleetd(dir.path(), &["migrate", "--to", "2"]).2);
    let conn = rusqlite::Connection::open(db_path(dir.path())).unwrap();
    conn.execute_batch("DROP TABLE schema").unwrap();
    drop(conn);

    let (stdout, _, ok) = run_fleetd(dir.path(), &["status", "--json"]);
    assert!(ok);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["current"], 2);
    assert_eq!(status["ledger"], false);

    let (stdout, _, ok) = run_fleetd(dir.path(), &["migrate"]);
    assert!(ok);
    assert!(stdout.contains("predates the ledger"), "{stdout}");
}

#[test]
fn verify_passes_at_latest_and_fails_when_pending() {
    let dir = daemon_dir();
    assert!(run_fleetd(dir.path(), &["migrate", "--to", "10"]).2);
    let (_, stderr, ok) = run_fleetd(dir.path(), &["verify"]);
    assert!(!ok);
    assert!(stderr.contains("pending"), "{stderr}");

    assert!(run_fleetd(dir.path(), &["migrate"]).2);
    let (stdout, _, ok) = run_fleetd(dir.path(), &["verify"]);
    assert!(ok);
    assert!(stdout.contains("OK (schema version 16)"), "{stdout}");
}

#[test]
fn dump_and_tables() {
    let dir = daemon_dir();
    assert!(run_fleetd(dir.path(), &["migrate"]).2);

    let (stdout, _, ok) = run_fleetd(dir.path(), &["dump"]);
    assert!(ok);
    assert!(stdout.contains("CREATE TABLE identities"));

    let (stdout, _, ok) = run_fleetd(dir.path(), &["tables"]);
    assert!(ok);
    assert!(stdout.contains("schema"));
    assert!(stdout.contains("instances_snapshots"));
}

#[test]
fn inspection_needs_existing_database() {
    let dir = daemon_dir();
    let (_, stderr, ok) = run_fleetd(dir.path(), &["tables"]);
    assert!(!ok);
    assert!(stderr.contains("not found"), "{stderr}");
}
