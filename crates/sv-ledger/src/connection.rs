//! Ledger database connection wrapper.
//!
//! [`LedgerDb`] owns a DuckDB [`Connection`] and provides helpers for opening
//! and transacting against the ledger database.

use crate::error::{LedgerError, LedgerResult};
use duckdb::Connection;
use std::path::Path;

/// Path value that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// Wrapper around the DuckDB connection holding the ledger table.
///
/// Single-threaded: the runner executes deployments strictly sequentially,
/// so no `Mutex` is needed.
pub struct LedgerDb {
    conn: Connection,
    transactional: bool,
}

impl LedgerDb {
    /// Open (or create) the database at `path`.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| LedgerError::StoreUnavailable(format!("{e}: {}", path.display())))?;
        Ok(Self::from_connection(conn))
    }

    /// Create an in-memory database.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> LedgerResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| LedgerError::StoreUnavailable(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Open from a path string (handles the `:memory:` special case).
    pub fn new(path: &str) -> LedgerResult<Self> {
        if path == MEMORY_PATH {
            Self::open_memory()
        } else {
            Self::open(Path::new(path))
        }
    }

    /// Wrap an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            transactional: true,
        }
    }

    /// Declare whether schema changes on this connection are transactional.
    ///
    /// DuckDB supports transactional DDL, so this defaults to `true`; setting
    /// it to `false` forces deployments onto the unwrapped code path.
    pub fn with_schema_transactions(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    /// Whether deployment actions can be wrapped in a transaction.
    pub fn supports_schema_transactions(&self) -> bool {
        self.transactional
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Check that the connection still answers queries.
    pub fn ping(&self) -> LedgerResult<()> {
        self.conn
            .query_row("SELECT 1", [], |row| row.get::<_, i32>(0))
            .map(|_| ())
            .map_err(|e| LedgerError::StoreUnavailable(e.to_string()))
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    ///
    /// Generic over the body's error type so callers can run their own
    /// fallible work (e.g. a deployment action) inside the transaction.
    pub fn transaction<F, T, E>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Connection) -> Result<T, E>,
        E: From<LedgerError>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| LedgerError::Transaction(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(LedgerError::Transaction(format!(
                        "COMMIT failed: {commit_err}"
                    ))
                    .into());
                }
            }
            Err(_) => {
                if let Err(rollback_err) = self.conn.execute_batch("ROLLBACK") {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
            }
        }
        result
    }
}

#[cfg(test)]
#[path = "connection_test.rs"]
mod tests;
