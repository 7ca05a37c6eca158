//! Deploy command implementation

use anyhow::{anyhow, bail, Context, Result};
use sv_core::Environment;

use crate::cli::{DeployArgs, GlobalArgs};
use crate::context::ProjectContext;
use crate::maintenance::{FileMaintenance, MaintenanceGuard};

/// Execute the deploy command
pub(crate) fn execute(args: &DeployArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    if ctx.config.environment == Environment::Production && !args.force {
        bail!("Refusing to deploy to production without --force");
    }

    let maintenance = FileMaintenance::new(&ctx.root);
    let _guard = if ctx.config.maintenance.enabled {
        if let Some(marker) = maintenance.marker() {
            log::warn!("Maintenance mode already active since {}", marker.since);
        }
        let message = args
            .message
            .as_deref()
            .or(ctx.config.maintenance.message.as_deref());
        let guard = MaintenanceGuard::enter(&maintenance, message)
            .map_err(|e| anyhow!(e))
            .context("Failed to enter maintenance mode")?;
        println!("Maintenance mode enabled.");
        Some(guard)
    } else {
        None
    };

    let store = ctx.open_store()?;
    let before = ctx.version_service(&store).release()?;

    let mut deployer = ctx.deployer(store)?;
    if !deployer.repository_exists()? {
        deployer
            .create_repository()
            .context("Failed to create deployment repository")?;
        println!("Deployment repository created.");
    }

    let report = deployer.run(&ctx.deployment_paths())?;
    for note in &report.notes {
        println!("{note}");
    }

    if report.count() > 0 {
        let after = ctx.version_service(deployer.store()).release()?;
        println!();
        println!("Deployments successful: {}", report.count());
        println!("Project updated from {before} to {after}");
    }
    Ok(())
}
