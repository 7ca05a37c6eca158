//! Configuration types and parsing for shipver.yml

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use crate::version::StartingVersion;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file names probed by [`Config::load_from_dir`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["shipver.yml", "shipver.yaml"];

/// Main project configuration from shipver.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Ledger table name
    #[serde(default = "default_table")]
    pub table: String,

    /// Directories scanned for deployment manifests
    #[serde(default = "default_deployment_paths")]
    pub deployment_paths: Vec<String>,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Version reported before any deployment has run (`X.Y.Z[-pre]`)
    #[serde(default = "default_starting_version")]
    pub starting_version: String,

    /// Environment the project is deployed in
    #[serde(default)]
    pub environment: Environment,

    /// Whether the connection supports transactional schema changes.
    ///
    /// Set to `false` for backends where DDL auto-commits; deployments then run
    /// unwrapped and a failing action may leave partial changes behind.
    #[serde(default = "default_true")]
    pub transactional: bool,

    /// Maintenance mode toggled around `shipver deploy`
    #[serde(default)]
    pub maintenance: MaintenanceConfig,

    /// Shell command that runs the application's schema migrations
    #[serde(default)]
    pub migrate_command: Option<String>,

    /// Shell command that clears the application cache after a deploy
    #[serde(default)]
    pub cache_command: Option<String>,

    /// Shell command that clears compiled views after a deploy
    #[serde(default)]
    pub view_command: Option<String>,

    /// Shell commands executed in order after a successful deploy
    #[serde(default)]
    pub post_deploy: Vec<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Ledger DuckDB file, relative to the project root, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Developer machine
    Local,
    /// Shared development server
    Development,
    /// Pre-production
    Staging,
    /// Production (default)
    #[default]
    Production,
}

impl Environment {
    /// Environments where source-control mutations are never run
    /// automatically because they would clobber a working tree.
    pub fn is_local(&self) -> bool {
        matches!(self, Environment::Local | Environment::Development)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maintenance mode configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceConfig {
    /// Put the application into maintenance mode while deploying
    #[serde(default)]
    pub enabled: bool,

    /// Message shown while in maintenance mode
    #[serde(default)]
    pub message: Option<String>,
}

fn default_table() -> String {
    "deployments".to_string()
}

fn default_deployment_paths() -> Vec<String> {
    vec!["deployments".to_string()]
}

fn default_starting_version() -> String {
    "0.0.0".to_string()
}

/// Ledger file created in the project root when `database.path` is unset.
pub const DEFAULT_DB_PATH: &str = "shipver.duckdb";

/// Path value selecting a throwaway in-memory ledger.
pub const MEMORY_DB_PATH: &str = ":memory:";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Configuration with every field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: default_table(),
            deployment_paths: default_deployment_paths(),
            database: DatabaseConfig::default(),
            starting_version: default_starting_version(),
            environment: Environment::default(),
            transactional: true,
            maintenance: MaintenanceConfig::default(),
            migrate_command: None,
            cache_command: None,
            view_command: None,
            post_deploy: Vec::new(),
        }
    }

    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {e}", path.display()),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for shipver.yml or shipver.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_sql_identifier(&self.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "table '{}' must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*)",
                    self.table
                ),
            });
        }

        if self.deployment_paths.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "At least one deployment_paths entry must be specified".to_string(),
            });
        }

        self.starting_version()
            .map_err(|e| CoreError::ConfigInvalid {
                message: format!("starting_version: {e}"),
            })?;

        if self.post_deploy.iter().any(|c| c.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "post_deploy commands must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Parsed starting version.
    pub fn starting_version(&self) -> CoreResult<StartingVersion> {
        self.starting_version.parse()
    }

    /// Deployment directories resolved against the project root.
    pub fn deployment_paths_absolute(&self, root: &Path) -> Vec<PathBuf> {
        self.deployment_paths.iter().map(|p| root.join(p)).collect()
    }

    /// Database path resolved against the project root (`:memory:` passes
    /// through untouched).
    pub fn database_path(&self, root: &Path) -> String {
        if self.database.path == MEMORY_DB_PATH {
            self.database.path.clone()
        } else {
            root.join(&self.database.path).display().to_string()
        }
    }
}

/// True for identifiers that can be interpolated into DDL unquoted.
pub fn is_sql_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
