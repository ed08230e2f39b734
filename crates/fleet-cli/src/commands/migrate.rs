//! Apply pending schema updates.

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{database_path, load_config, MigrationTimedOut};
use anyhow::{Context, Result};
use fleet_schema::connection::open_connection;
use fleet_schema::{Executor, MigrationReport, Registry, SchemaResult};
use std::time::Duration;

/// Execute the migrate command.
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let path = database_path(global, &config);
    let busy_timeout = config.database.busy_timeout();
    let deadline = args
        .timeout
        .map(Duration::from_secs)
        .or_else(|| config.migration_timeout());
    let target = args.to;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    if global.verbose {
        eprintln!("[verbose] Cluster database: {}", path.display());
        if let Some(deadline) = deadline {
            eprintln!("[verbose] Migration deadline: {}s", deadline.as_secs());
        }
    }

    let task = tokio::task::spawn_blocking(move || -> SchemaResult<MigrationReport> {
        let registry = Registry::cluster();
        let executor = Executor::new(&registry);
        let mut conn = open_connection(&path, busy_timeout)?;
        match target {
            Some(target) => executor.ensure_schema_to(&mut conn, target),
            None => executor.ensure_schema(&mut conn),
        }
    });

    let joined = match deadline {
        Some(deadline) => match tokio::time::timeout(deadline, task).await {
            Ok(joined) => joined,
            Err(_) => {
                return Err(MigrationTimedOut(deadline))
                    .context("Failed to update cluster schema");
            }
        },
        None => task.await,
    };
    let report = joined
        .context("Migration task panicked")?
        .context("Failed to update cluster schema")?;

    print_report(&report, global.verbose);
    Ok(())
}

fn print_report(report: &MigrationReport, verbose: bool) {
    if report.reconciled {
        println!(
            "Recorded existing schema as version {} (database predates the ledger)",
            report.initial
        );
    }
    if report.is_noop() {
        println!("Cluster schema is up to date (version {})", report.current);
        return;
    }

    println!(
        "Updated cluster schema from version {} to {} ({} updates)",
        report.initial,
        report.current,
        report.applied.len()
    );
    if verbose {
        let registry = Registry::cluster();
        for version in &report.applied {
            if let Ok(step) = registry.step(*version) {
                eprintln!("[verbose]   v{:03} {}", step.version, step.name);
            }
        }
    }
}
