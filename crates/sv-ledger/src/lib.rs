//! Deployment ledger for shipver.
//!
//! Provides a DuckDB-backed, append-only table with one row per executed
//! deployment. The table is the audit trail: rows are inserted once and never
//! updated or deleted, and the latest row answers "what version are we at".

pub mod connection;
pub mod ddl;
pub mod error;
pub mod record;
pub mod store;

pub use connection::LedgerDb;
pub use error::{LedgerError, LedgerResult};
pub use record::{DeploymentRecord, NewDeploymentRecord, RecordFilter};
pub use store::LedgerStore;
