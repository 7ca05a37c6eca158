//! Deployment runner for shipver.
//!
//! Discovers pending deployment units, executes each exactly once (inside a
//! transaction when the connection allows it), records the resulting
//! semantic version in the ledger, and renders version strings and release
//! notes from the recorded history.

pub mod collaborators;
pub mod deployer;
pub mod deployment;
pub mod error;
pub mod loader;
pub mod registry;
pub mod shell;
pub mod version_service;

pub use collaborators::{
    CacheInvalidator, CommandExecutor, CommandOutput, Maintenance, MigrationRunner,
    RevisionLookup,
};
pub use deployer::{DeployedUnit, Deployer, RunPhase, RunReport, NOTHING_TO_DEPLOY};
pub use deployment::{ActionError, Deployment, SqlDeployment};
pub use error::{DeployError, DeployResult};
pub use loader::{DeploymentLoader, ManifestLoader};
pub use registry::DeploymentRegistry;
pub use version_service::{NotesLevel, ReleaseEntry, ReleaseInfo, VersionFormat, VersionService};
