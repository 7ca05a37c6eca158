//! Status command implementation - lists deployments and whether they ran

use anyhow::Result;
use std::collections::HashSet;
use sv_core::discover;

use crate::cli::GlobalArgs;
use crate::context::ProjectContext;

/// Execute the status command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let store = ctx.open_store()?;
    let files = discover(&ctx.deployment_paths())?;

    let ran: HashSet<String> = if store.exists()? {
        store.ran()?.into_iter().map(|n| n.into_inner()).collect()
    } else {
        println!("Deployment repository not found; run `shipver install`.");
        HashSet::new()
    };

    if files.is_empty() {
        println!("No deployments found.");
        return Ok(());
    }

    let width = files.iter().map(|f| f.name.as_str().len()).max().unwrap_or(0);
    let mut pending = 0;
    for file in &files {
        let state = if ran.contains(file.name.as_str()) {
            "ran"
        } else {
            pending += 1;
            "pending"
        };
        println!(
            "{:<7}  {:<width$}  {}",
            state,
            file.name.as_str(),
            file.created_at.format("%Y-%m-%d %H:%M:%S"),
            width = width
        );
    }
    println!();
    println!("{} deployment(s), {} pending", files.len(), pending);
    Ok(())
}
