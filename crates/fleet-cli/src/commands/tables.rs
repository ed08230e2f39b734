//! List cluster database tables with row counts.

use crate::cli::GlobalArgs;
use crate::commands::common::{self, open_existing};
use anyhow::{Context, Result};
use fleet_schema::query::{list_tables, table_row_count};

/// Execute the tables command.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let conn = open_existing(global)?;
    let tables = list_tables(&conn).context("Failed to list cluster database tables")?;

    let mut rows = Vec::with_capacity(tables.len());
    for table in &tables {
        let count = table_row_count(&conn, table)
            .with_context(|| format!("Failed to count rows of {table}"))?;
        rows.push(vec![table.clone(), count.to_string()]);
    }

    println!("Cluster database tables ({}):\n", tables.len());
    common::print_table(&["TABLE", "ROWS"], &rows);
    Ok(())
}
