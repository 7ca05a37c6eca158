//! Runtime context for CLI commands

use anyhow::{Context, Result};
use std::path::PathBuf;
use sv_core::{Config, StartingVersion};
use sv_deploy::{Deployer, VersionService};
use sv_ledger::{LedgerDb, LedgerStore};

use crate::cli::GlobalArgs;

/// Loaded project configuration plus the resolved paths commands need.
pub(crate) struct ProjectContext {
    /// Project root; post-deploy commands run here
    pub root: PathBuf,

    /// Parsed and validated configuration
    pub config: Config,

    /// Ledger database path (`:memory:` passes through)
    pub database: String,

    /// Version used while the ledger is empty
    pub starting: StartingVersion,
}

impl ProjectContext {
    /// Load configuration from the `--config` path or the project directory.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = args.project_dir.clone();
        let config = match &args.config {
            Some(path) => Config::load(path).context("Failed to load configuration file")?,
            None => Config::load_from_dir(&root).context("Failed to load project configuration")?,
        };
        config.validate().context("Invalid project configuration")?;

        let database = match &args.database {
            Some(path) => path.clone(),
            None => config.database_path(&root),
        };
        let starting = config.starting_version()?;
        log::debug!("Project '{}' using ledger at {}", config.name, database);

        Ok(Self {
            root,
            config,
            database,
            starting,
        })
    }

    /// Deployment directories, absolute.
    pub fn deployment_paths(&self) -> Vec<PathBuf> {
        self.config.deployment_paths_absolute(&self.root)
    }

    /// Open the ledger store. Does not create the table.
    pub fn open_store(&self) -> Result<LedgerStore> {
        let db = LedgerDb::new(&self.database)
            .with_context(|| format!("Failed to open ledger database '{}'", self.database))?
            .with_schema_transactions(self.config.transactional);
        Ok(LedgerStore::new(db, self.config.table.as_str())?)
    }

    pub fn version_service<'a>(&self, store: &'a LedgerStore) -> VersionService<'a> {
        VersionService::new(store, self.starting.clone(), self.config.name.as_str())
    }

    /// Runner wired from the configuration, owning `store`.
    pub fn deployer(&self, store: LedgerStore) -> Result<Deployer> {
        Ok(Deployer::from_config(store, &self.config, &self.root)?)
    }
}
