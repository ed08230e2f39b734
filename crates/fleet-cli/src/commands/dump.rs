//! Print the structural definition of the cluster database.

use crate::cli::GlobalArgs;
use crate::commands::common::open_existing;
use anyhow::{Context, Result};
use fleet_schema::verify::schema_dump;

/// Execute the dump command.
pub async fn execute(global: &GlobalArgs) -> Result<()> {
    let conn = open_existing(global)?;
    let dump = schema_dump(&conn).context("Failed to read schema")?;
    println!("{dump}");
    Ok(())
}
