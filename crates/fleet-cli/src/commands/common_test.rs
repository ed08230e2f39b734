use super::*;

fn global(dir: &Path) -> GlobalArgs {
    GlobalArgs {
        verbose: false,
        dir: dir.display().to_string(),
        config: None,
        database: None,
    }
}

#[test]
fn column_widths_fit_longest_cell() {
    let rows = vec![
        vec!["1".to_string(), "initial".to_string()],
        vec!["16".to_string(), "identities".to_string()],
    ];
    assert_eq!(calculate_column_widths(&["VERSION", "NAME"], &rows), vec![7, 10]);
}

#[test]
fn database_path_defaults_under_daemon_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fleetd.yml"), "member: node1\n").unwrap();

    let global = global(dir.path());
    let config = load_config(&global).unwrap();
    assert_eq!(
        database_path(&global, &config),
        dir.path().join("database/global/db.sqlite")
    );
}

#[test]
fn database_flag_overrides_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fleetd.yml"), "member: node1\n").unwrap();

    let mut global = global(dir.path());
    global.database = Some("/tmp/other.sqlite".to_string());
    let config = load_config(&global).unwrap();
    assert_eq!(database_path(&global, &config), PathBuf::from("/tmp/other.sqlite"));
}

#[test]
fn missing_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_config(&global(dir.path())).is_err());
}

#[test]
fn open_existing_refuses_missing_database() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("fleetd.yml"), "member: node1\n").unwrap();

    let err = open_existing(&global(dir.path())).unwrap_err();
    assert!(err.to_string().contains("fleetd migrate"));
    assert!(!dir.path().join("database").exists());
}

#[test]
fn timed_out_migration_is_abandoned_work() {
    let err = anyhow::Error::new(MigrationTimedOut(Duration::from_secs(30)))
        .context("Failed to update cluster schema");
    assert!(is_abandoned_work(&err));
    assert_eq!(
        format!("{err:#}"),
        "Failed to update cluster schema: schema migration did not finish within 30s"
    );
    assert!(!is_abandoned_work(&anyhow::anyhow!("Cluster database not found")));
}
