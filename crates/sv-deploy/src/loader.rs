//! Loading deployment implementations for discovered files.

use crate::deployment::{Deployment, SqlDeployment};
use crate::error::DeployResult;
use crate::registry::DeploymentRegistry;
use sv_core::DeploymentFile;

/// Makes the implementation behind each pending file resolvable.
///
/// Called once per run with the pending files, before any unit executes.
pub trait DeploymentLoader {
    fn load(&self, files: &[DeploymentFile], registry: &mut DeploymentRegistry)
        -> DeployResult<()>;
}

/// Registers a [`SqlDeployment`] factory for every pending manifest file.
///
/// Identifiers already registered in code take precedence; their files only
/// fix the position in the deployment order. Manifests are parsed at
/// resolution time, so a malformed file fails that unit's resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestLoader;

impl DeploymentLoader for ManifestLoader {
    fn load(
        &self,
        files: &[DeploymentFile],
        registry: &mut DeploymentRegistry,
    ) -> DeployResult<()> {
        for file in files {
            if registry.contains(&file.name) {
                log::debug!("'{}' is registered in code, skipping manifest", file.name);
                continue;
            }
            let path = file.path.clone();
            registry.register(file.name.clone(), move || {
                let unit = SqlDeployment::load(&path)?;
                Ok(Box::new(unit) as Box<dyn Deployment>)
            })?;
        }
        Ok(())
    }
}
