//! Hooks the runner calls around deployment execution.
//!
//! Each concern is a trait so embedding applications and tests can supply
//! their own implementations. [`crate::shell`] provides the command-backed
//! defaults used by the CLI.

use crate::deployment::ActionError;

/// Runs schema migrations at most once per run cycle.
pub trait MigrationRunner {
    fn run_migrations(&self) -> Result<(), ActionError>;
}

/// Supplies the short source-control revision recorded as the build id.
///
/// An empty string means no revision is available.
pub trait RevisionLookup {
    fn short_revision(&self) -> String;
}

/// Invalidates an application cache after a successful run.
pub trait CacheInvalidator {
    /// Label used in run notes.
    fn name(&self) -> &str;
    fn invalidate(&self) -> Result<(), ActionError>;
}

/// Result of a post-deploy command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub output: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes post-deploy commands.
pub trait CommandExecutor {
    fn run(&self, command: &str) -> CommandOutput;
}

/// Toggles the application's maintenance mode around a deploy.
pub trait Maintenance {
    fn enter(&self, message: Option<&str>) -> Result<(), ActionError>;
    fn exit(&self) -> Result<(), ActionError>;
    fn is_active(&self) -> bool;
}

/// Migration runner used when no migration command is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMigrations;

impl MigrationRunner for NoMigrations {
    fn run_migrations(&self) -> Result<(), ActionError> {
        log::warn!("A deployment requested migrations but no migration command is configured");
        Ok(())
    }
}

/// Revision lookup that never finds a revision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRevision;

impl RevisionLookup for NoRevision {
    fn short_revision(&self) -> String {
        String::new()
    }
}

/// Fixed revision, for embedding applications that know their build id.
#[derive(Debug, Clone, Default)]
pub struct StaticRevision(pub String);

impl RevisionLookup for StaticRevision {
    fn short_revision(&self) -> String {
        self.0.clone()
    }
}
