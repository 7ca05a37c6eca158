//! Error types for the deployment ledger.

use thiserror::Error;

/// Ledger errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The database could not be opened or the connection is unusable (L001).
    #[error("[L001] Ledger store unavailable: {0}")]
    StoreUnavailable(String),

    /// The ledger table cannot be provisioned (L002).
    #[error("[L002] Ledger schema error: {0}")]
    Schema(String),

    /// A record for this deployment already exists (L003).
    #[error("[L003] Deployment '{0}' is already recorded in the ledger")]
    DuplicateDeployment(String),

    /// SQL execution error inside the ledger (L004).
    #[error("[L004] Ledger query failed: {0}")]
    Query(String),

    /// Transaction management error (L005).
    #[error("[L005] Ledger transaction failed: {0}")]
    Transaction(String),

    /// A stored row could not be decoded (L006).
    #[error("[L006] Ledger row could not be decoded: {0}")]
    Decode(String),

    /// DuckDB driver error with preserved source chain (L007).
    #[error("[L007] DuckDB error")]
    DuckDb(#[source] duckdb::Error),
}

/// Result type alias for [`LedgerError`].
pub type LedgerResult<T> = Result<T, LedgerError>;

impl From<duckdb::Error> for LedgerError {
    fn from(err: duckdb::Error) -> Self {
        LedgerError::DuckDb(err)
    }
}

/// Attach a short description of the failed operation to driver errors.
pub(crate) trait LedgerResultExt<T> {
    fn query_context(self, what: &str) -> LedgerResult<T>;
}

impl<T> LedgerResultExt<T> for Result<T, duckdb::Error> {
    fn query_context(self, what: &str) -> LedgerResult<T> {
        self.map_err(|e| LedgerError::Query(format!("{what}: {e}")))
    }
}
