//! The deployment run cycle.
//!
//! ```text
//! Idle -> Scanning -> Filtering -> Executing -> Finalizing -> Idle
//! ```
//!
//! A run discovers deployment files, drops those already in the ledger,
//! executes the rest in file-name order and records each one's version. A
//! failing unit aborts the run; units recorded before it stay recorded.

use crate::collaborators::{
    CacheInvalidator, CommandExecutor, MigrationRunner, NoMigrations, NoRevision, RevisionLookup,
};
use crate::deployment::{ActionError, Deployment};
use crate::error::{DeployError, DeployResult};
use crate::loader::{DeploymentLoader, ManifestLoader};
use crate::registry::DeploymentRegistry;
use crate::shell::{
    is_scm_mutation, CommandInvalidator, CommandMigrations, GitRevision, ShellExecutor,
};
use std::fmt;
use std::path::Path;
use sv_core::{
    discover, pending, Config, DeploymentName, Environment, PreRelease, StartingVersion, Version,
};
use sv_ledger::{LedgerResult, LedgerStore, NewDeploymentRecord};

/// Note emitted when every discovered unit is already recorded.
pub const NOTHING_TO_DEPLOY: &str = "Nothing to deploy.";

/// Where the runner is within a run cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunPhase {
    #[default]
    Idle,
    Scanning,
    Filtering,
    Executing,
    Finalizing,
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunPhase::Idle => "idle",
            RunPhase::Scanning => "scanning",
            RunPhase::Filtering => "filtering",
            RunPhase::Executing => "executing",
            RunPhase::Finalizing => "finalizing",
        };
        f.write_str(s)
    }
}

/// A unit executed and recorded during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedUnit {
    pub name: DeploymentName,
    pub version: Version,
    pub pre_release: Option<PreRelease>,
}

impl DeployedUnit {
    /// `X.Y.Z[-pre]`
    pub fn release(&self) -> String {
        match &self.pre_release {
            Some(pre) => format!("{}-{}", self.version, pre),
            None => self.version.to_string(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Units executed in this run, in execution order.
    pub executed: Vec<DeployedUnit>,
    /// Human-readable notes in emission order.
    pub notes: Vec<String>,
}

impl RunReport {
    pub fn count(&self) -> usize {
        self.executed.len()
    }
}

/// Executes pending deployment units against a ledger.
pub struct Deployer {
    store: LedgerStore,
    registry: DeploymentRegistry,
    loader: Box<dyn DeploymentLoader>,
    migrations: Box<dyn MigrationRunner>,
    revision: Box<dyn RevisionLookup>,
    invalidators: Vec<Box<dyn CacheInvalidator>>,
    executor: Box<dyn CommandExecutor>,
    post_deploy: Vec<String>,
    environment: Environment,
    starting_version: StartingVersion,
    phase: RunPhase,
}

impl Deployer {
    /// Runner over `store` with manifest loading, no migrations, no build id,
    /// no invalidators and no post-deploy commands.
    pub fn new(store: LedgerStore) -> Self {
        Self {
            store,
            registry: DeploymentRegistry::new(),
            loader: Box::new(ManifestLoader),
            migrations: Box::new(NoMigrations),
            revision: Box::new(NoRevision),
            invalidators: Vec::new(),
            executor: Box::new(ShellExecutor::new()),
            post_deploy: Vec::new(),
            environment: Environment::default(),
            starting_version: StartingVersion::default(),
            phase: RunPhase::Idle,
        }
    }

    /// Runner wired from project configuration, with commands executed in
    /// `root`.
    pub fn from_config(store: LedgerStore, config: &Config, root: &Path) -> DeployResult<Self> {
        let shell = ShellExecutor::in_dir(root);
        let mut deployer = Self::new(store)
            .with_starting_version(config.starting_version()?)
            .with_environment(config.environment)
            .with_revision(GitRevision::new(root))
            .with_executor(shell.clone())
            .with_post_deploy(config.post_deploy.clone());

        if let Some(cmd) = &config.migrate_command {
            deployer = deployer.with_migrations(CommandMigrations::new(cmd, shell.clone()));
        }
        if let Some(cmd) = &config.cache_command {
            deployer =
                deployer.with_invalidator(CommandInvalidator::new("cache", cmd, shell.clone()));
        }
        if let Some(cmd) = &config.view_command {
            deployer = deployer.with_invalidator(CommandInvalidator::new("views", cmd, shell));
        }
        Ok(deployer)
    }

    pub fn with_loader(mut self, loader: impl DeploymentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_migrations(mut self, migrations: impl MigrationRunner + 'static) -> Self {
        self.migrations = Box::new(migrations);
        self
    }

    pub fn with_revision(mut self, revision: impl RevisionLookup + 'static) -> Self {
        self.revision = Box::new(revision);
        self
    }

    pub fn with_invalidator(mut self, invalidator: impl CacheInvalidator + 'static) -> Self {
        self.invalidators.push(Box::new(invalidator));
        self
    }

    pub fn with_executor(mut self, executor: impl CommandExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    pub fn with_post_deploy(mut self, commands: Vec<String>) -> Self {
        self.post_deploy = commands;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_starting_version(mut self, starting: StartingVersion) -> Self {
        self.starting_version = starting;
        self
    }

    /// Units registered in code, resolved before manifest files.
    pub fn registry_mut(&mut self) -> &mut DeploymentRegistry {
        &mut self.registry
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Phase reached by the current or last run. A failed run stays at the
    /// phase it failed in.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn repository_exists(&self) -> LedgerResult<bool> {
        self.store.exists()
    }

    pub fn create_repository(&self) -> LedgerResult<()> {
        self.store.create()
    }

    /// Deploy every pending unit under `paths`.
    pub fn run<P: AsRef<Path>>(&mut self, paths: &[P]) -> DeployResult<RunReport> {
        let mut report = RunReport::default();

        self.enter(RunPhase::Scanning);
        let files = discover(paths)?;

        self.enter(RunPhase::Filtering);
        let ran = self.store.ran()?;
        let pending = pending(&files, &ran);
        if pending.is_empty() {
            report.notes.push(NOTHING_TO_DEPLOY.to_string());
            self.enter(RunPhase::Idle);
            return Ok(report);
        }
        log::info!("{} pending deployment(s)", pending.len());
        self.loader.load(&pending, &mut self.registry)?;

        self.enter(RunPhase::Executing);
        let mut migrated = false;
        for file in &pending {
            let unit = self.registry.resolve(&file.name)?;
            let meta = unit.meta();

            if meta.migrate && !migrated {
                log::info!("Running migrations before '{}'", file.name);
                self.migrations
                    .run_migrations()
                    .map_err(|source| DeployError::Migration {
                        name: file.name.to_string(),
                        source,
                    })?;
                migrated = true;
            }

            let current = match self.store.latest()? {
                Some(record) => record.version,
                None => self.starting_version.version,
            };
            let version = current.next(meta.bump);
            let build = Some(self.revision.short_revision()).filter(|b| !b.is_empty());

            let record = NewDeploymentRecord {
                build,
                pre_release: meta.pre_release.clone(),
                release_notes: meta.release_notes.clone(),
                ..NewDeploymentRecord::new(file.name.clone(), version)
            };
            self.execute(unit.as_ref(), &record)?;

            log::info!("Deployed '{}' as {}", file.name, version);
            report.notes.push(format!("Deployed: {}", file.name));
            report.executed.push(DeployedUnit {
                name: file.name.clone(),
                version,
                pre_release: record.pre_release,
            });
        }

        self.enter(RunPhase::Finalizing);
        self.finalize(&mut report.notes);

        self.enter(RunPhase::Idle);
        Ok(report)
    }

    fn enter(&mut self, phase: RunPhase) {
        log::debug!("Run phase: {} -> {}", self.phase, phase);
        self.phase = phase;
    }

    /// Run one unit and append its record, atomically when possible.
    fn execute(&self, unit: &dyn Deployment, record: &NewDeploymentRecord) -> DeployResult<()> {
        let action_failed = |source: ActionError| DeployError::Action {
            name: record.deployment.to_string(),
            source,
        };

        let db = self.store.db();
        if db.supports_schema_transactions() && unit.meta().within_transaction {
            return db.transaction(|conn| {
                unit.deploy(conn).map_err(action_failed)?;
                self.store.append(record)?;
                Ok(())
            });
        }

        log::warn!(
            "Deploying '{}' without a transaction; a failure may leave partial changes",
            record.deployment
        );
        unit.deploy(db.conn()).map_err(action_failed)?;
        self.store.append(record)?;
        Ok(())
    }

    /// Cache invalidation and post-deploy commands. Failures become notes.
    fn finalize(&self, notes: &mut Vec<String>) {
        for invalidator in &self.invalidators {
            match invalidator.invalidate() {
                Ok(()) => notes.push(format!("Cleared {}.", invalidator.name())),
                Err(e) => {
                    log::warn!("Clearing {} failed: {e}", invalidator.name());
                    notes.push(format!("Failed to clear {}: {e}", invalidator.name()));
                }
            }
        }

        for command in &self.post_deploy {
            if self.environment.is_local() && is_scm_mutation(command) {
                log::info!("Skipping '{command}' in {} environment", self.environment);
                notes.push(format!("Skipped in {}: {command}", self.environment));
                continue;
            }
            let out = self.executor.run(command);
            if out.success() {
                notes.push(format!("Ran: {command}"));
            } else {
                log::warn!("'{command}' exited with {}: {}", out.exit_code, out.output);
                notes.push(format!("Command failed ({}): {command}", out.exit_code));
            }
        }
    }
}

#[cfg(test)]
#[path = "deployer_test.rs"]
mod tests;
