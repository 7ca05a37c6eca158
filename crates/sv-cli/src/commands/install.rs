//! Install command implementation - provisions the ledger table

use anyhow::{Context, Result};

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;

/// Execute the install command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = ctx.open_store()?;

    if store.exists()? {
        println!("Deployment repository '{}' already exists.", store.table());
        return Ok(());
    }

    store
        .create()
        .context("Failed to create deployment repository")?;
    println!("Deployment repository '{}' created.", store.table());
    Ok(())
}
