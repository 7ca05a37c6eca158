//! Executable deployment units.

use duckdb::Connection;
use std::path::{Path, PathBuf};
use sv_core::{CoreResult, DeploymentManifest, DeploymentMeta};

/// Error raised by a unit's action or a collaborator.
pub type ActionError = Box<dyn std::error::Error + Send + Sync>;

/// A deployment unit: metadata plus an action run against the ledger's
/// connection.
///
/// Actions are not assumed to be idempotent. The runner guarantees a unit is
/// never executed again once its ledger record exists.
pub trait Deployment {
    /// Bump kind, pre-release tag, migration flag and release notes.
    fn meta(&self) -> &DeploymentMeta;

    /// Run the unit. When the runner wraps the action in a transaction, `conn`
    /// is inside it and an error rolls back everything the action did.
    fn deploy(&self, conn: &Connection) -> Result<(), ActionError>;
}

/// A unit backed by a YAML manifest whose action is a list of SQL statements.
#[derive(Debug, Clone)]
pub struct SqlDeployment {
    manifest: DeploymentManifest,
    path: Option<PathBuf>,
}

impl SqlDeployment {
    pub fn new(manifest: DeploymentManifest) -> Self {
        Self {
            manifest,
            path: None,
        }
    }

    /// Load the manifest at `path`.
    pub fn load(path: &Path) -> CoreResult<Self> {
        Ok(Self {
            manifest: DeploymentManifest::load(path)?,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn statements(&self) -> &[String] {
        &self.manifest.sql
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Deployment for SqlDeployment {
    fn meta(&self) -> &DeploymentMeta {
        &self.manifest.meta
    }

    fn deploy(&self, conn: &Connection) -> Result<(), ActionError> {
        for (i, sql) in self.manifest.sql.iter().enumerate() {
            log::debug!("Executing statement {} of {}", i + 1, self.manifest.sql.len());
            conn.execute_batch(sql)
                .map_err(|e| format!("statement {} failed: {e}", i + 1))?;
        }
        Ok(())
    }
}
