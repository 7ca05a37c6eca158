//! Error types for the deployment runner

use crate::deployment::ActionError;
use sv_core::CoreError;
use sv_ledger::LedgerError;
use thiserror::Error;

/// Deployment runner errors
#[derive(Error, Debug)]
pub enum DeployError {
    /// No loadable implementation for a deployment identifier (D001)
    #[error("[D001] Cannot resolve deployment '{name}': {reason}")]
    Resolution { name: String, reason: String },

    /// The deployment's own action failed (D002)
    #[error("[D002] Deployment '{name}' failed: {source}")]
    Action {
        name: String,
        #[source]
        source: ActionError,
    },

    /// The migration runner failed (D003)
    #[error("[D003] Migrations failed before '{name}': {source}")]
    Migration {
        name: String,
        #[source]
        source: ActionError,
    },

    /// A deployment was registered twice (D004)
    #[error("[D004] Deployment '{name}' is already registered")]
    DuplicateRegistration { name: String },

    /// Ledger failure
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Discovery or configuration failure
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type alias for DeployError
pub type DeployResult<T> = Result<T, DeployError>;
