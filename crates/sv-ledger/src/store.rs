//! Ledger store: provisioning, queries and appends against the ledger table.
//!
//! Every call re-queries the database; nothing is cached. Ordering is done
//! on decoded [`sv_core::Version`] values so `10.0.0` sorts above `2.0.0`.

use crate::connection::LedgerDb;
use crate::ddl::{checked_table_name, create_table_sql, RECORD_COLUMNS};
use crate::error::{LedgerError, LedgerResult, LedgerResultExt};
use crate::record::{DeploymentRecord, NewDeploymentRecord, RawRecord, RecordFilter};
use sv_core::DeploymentName;

/// Append-only ledger of executed deployments.
pub struct LedgerStore {
    db: LedgerDb,
    table: String,
}

impl LedgerStore {
    /// Wrap a connection, storing records in `table`.
    pub fn new(db: LedgerDb, table: impl Into<String>) -> LedgerResult<Self> {
        let table = table.into();
        checked_table_name(&table)?;
        Ok(Self { db, table })
    }

    /// Borrow the underlying connection wrapper.
    pub fn db(&self) -> &LedgerDb {
        &self.db
    }

    /// Name of the ledger table.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether the ledger table has been provisioned.
    pub fn exists(&self) -> LedgerResult<bool> {
        let count: i64 = self
            .db
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM information_schema.tables
                 WHERE table_schema = 'main' AND table_name = ?",
                duckdb::params![self.table],
                |row| row.get(0),
            )
            .map_err(|e| LedgerError::StoreUnavailable(e.to_string()))?;
        Ok(count > 0)
    }

    /// Provision the ledger table.
    ///
    /// Fails with [`LedgerError::Schema`] if the table already exists or the
    /// connection cannot run DDL.
    pub fn create(&self) -> LedgerResult<()> {
        self.db
            .ping()
            .map_err(|e| LedgerError::Schema(format!("connection unusable: {e}")))?;
        if self.exists()? {
            return Err(LedgerError::Schema(format!(
                "table '{}' already exists",
                self.table
            )));
        }

        let sql = create_table_sql(&self.table);
        self.db.transaction(|conn| {
            conn.execute_batch(&sql).map_err(|e| {
                LedgerError::Schema(format!("failed to create '{}': {e}", self.table))
            })
        })?;

        log::info!("Created deployment ledger table '{}'", self.table);
        Ok(())
    }

    /// Identifiers of every recorded deployment, ordered by version
    /// descending then identifier ascending.
    pub fn ran(&self) -> LedgerResult<Vec<DeploymentName>> {
        let mut records = self.load_records()?;
        records.sort_by(|a, b| {
            b.version
                .cmp(&a.version)
                .then_with(|| a.deployment.cmp(&b.deployment))
        });
        Ok(records.into_iter().map(|r| r.deployment).collect())
    }

    /// The record with the highest version, ties broken by identifier
    /// descending. `None` for an empty ledger.
    pub fn latest(&self) -> LedgerResult<Option<DeploymentRecord>> {
        let records = self.load_records()?;
        Ok(records.into_iter().max_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then_with(|| a.deployment.cmp(&b.deployment))
        }))
    }

    /// Records matching `filter`, ordered by version, deployment time and
    /// identifier, all descending.
    pub fn all(&self, filter: RecordFilter) -> LedgerResult<Vec<DeploymentRecord>> {
        let mut records: Vec<DeploymentRecord> = self
            .load_records()?
            .into_iter()
            .filter(|r| filter.matches(&r.version))
            .collect();
        records.sort_by(DeploymentRecord::cmp_latest_first);
        Ok(records)
    }

    /// Whether a record exists for `deployment`.
    pub fn contains(&self, deployment: &DeploymentName) -> LedgerResult<bool> {
        let sql = format!("SELECT COUNT(*) FROM {} WHERE deployment = ?", self.table);
        let count: i64 = self
            .db
            .conn()
            .query_row(&sql, duckdb::params![deployment.as_str()], |row| row.get(0))
            .map_err(|e| classify_failure("count deployment", &e.to_string(), deployment))?;
        Ok(count > 0)
    }

    /// Number of recorded deployments.
    pub fn count(&self) -> LedgerResult<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let count: i64 = self
            .db
            .conn()
            .query_row(&sql, [], |row| row.get(0))
            .query_context("count deployments")?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Insert one record.
    ///
    /// This is the commit point of a deployment. Fails with
    /// [`LedgerError::DuplicateDeployment`] if the identifier is already
    /// recorded.
    pub fn append(&self, record: &NewDeploymentRecord) -> LedgerResult<()> {
        self.db.ping()?;
        if self.contains(&record.deployment)? {
            return Err(LedgerError::DuplicateDeployment(
                record.deployment.to_string(),
            ));
        }

        let sql = format!(
            "INSERT INTO {} (deployment, version, pre_release, build, release_notes, deployed_at)
             VALUES (?, ?, ?, ?, ?, CAST(? AS TIMESTAMP))",
            self.table
        );
        self.db
            .conn()
            .execute(
                &sql,
                duckdb::params![
                    record.deployment.as_str(),
                    record.version.to_string(),
                    record.pre_release.as_ref().map(|p| p.as_str()),
                    record.build.as_deref(),
                    record.release_notes.to_json(),
                    record.deployed_at_sql(),
                ],
            )
            .map_err(|e| {
                classify_failure("insert deployment record", &e.to_string(), &record.deployment)
            })?;

        log::debug!(
            "Recorded deployment {} at version {}",
            record.deployment,
            record.version
        );
        Ok(())
    }

    fn load_records(&self) -> LedgerResult<Vec<DeploymentRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM {}", self.table);
        let mut stmt = self
            .db
            .conn()
            .prepare(&sql)
            .query_context("prepare ledger select")?;

        let raw: Vec<RawRecord> = stmt
            .query_map([], RawRecord::from_row)
            .query_context("query ledger")?
            .collect::<Result<Vec<_>, _>>()
            .query_context("collect ledger rows")?;

        raw.into_iter().map(RawRecord::decode).collect()
    }
}

/// Map a driver message from a ledger write path onto the ledger taxonomy.
///
/// Connection-level failures surface as [`LedgerError::StoreUnavailable`]
/// so callers can tell a dead store from a bad statement.
fn classify_failure(what: &str, msg: &str, deployment: &DeploymentName) -> LedgerError {
    if msg.contains("Constraint Error") || msg.contains("Duplicate key") {
        LedgerError::DuplicateDeployment(deployment.to_string())
    } else if is_connection_failure(msg) {
        LedgerError::StoreUnavailable(format!("{what}: {msg}"))
    } else {
        LedgerError::Query(format!("{what}: {msg}"))
    }
}

fn is_connection_failure(msg: &str) -> bool {
    const MARKERS: &[&str] = &[
        "Connection Error",
        "IO Error",
        "FATAL Error",
        "database has been invalidated",
        "Connection already closed",
    ];
    MARKERS.iter().any(|m| msg.contains(m))
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
