//! Ledger rows.

use crate::error::{LedgerError, LedgerResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::cmp::Ordering;
use sv_core::{DeploymentName, PreRelease, ReleaseNotes, Version};

/// Format used to write timestamps; DuckDB parses it as a `TIMESTAMP`.
pub(crate) const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Format used to read `deployed_at::VARCHAR`; the fraction is optional.
pub(crate) const TIMESTAMP_READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One executed deployment as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentRecord {
    pub id: i64,
    pub deployment: DeploymentName,
    pub version: Version,
    pub pre_release: Option<String>,
    pub build: Option<String>,
    pub release_notes: ReleaseNotes,
    pub deployed_at: Option<NaiveDateTime>,
}

impl DeploymentRecord {
    /// `X.Y.Z[-pre]`
    pub fn release(&self) -> String {
        match self.pre_release.as_deref().filter(|p| !p.is_empty()) {
            Some(pre) => format!("{}-{}", self.version, pre),
            None => self.version.to_string(),
        }
    }

    /// Ledger precedence: highest version first, then most recently deployed,
    /// then identifier descending.
    pub fn cmp_latest_first(&self, other: &Self) -> Ordering {
        other
            .version
            .cmp(&self.version)
            .then_with(|| other.deployed_at.cmp(&self.deployed_at))
            .then_with(|| other.deployment.cmp(&self.deployment))
    }
}

/// Row values before validation.
pub(crate) struct RawRecord {
    id: i64,
    deployment: String,
    version: String,
    pre_release: Option<String>,
    build: Option<String>,
    release_notes: String,
    deployed_at: Option<String>,
}

impl RawRecord {
    /// Read a row selected with [`crate::ddl::RECORD_COLUMNS`].
    pub(crate) fn from_row(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            deployment: row.get(1)?,
            version: row.get(2)?,
            pre_release: row.get(3)?,
            build: row.get(4)?,
            release_notes: row.get(5)?,
            deployed_at: row.get(6)?,
        })
    }

    pub(crate) fn decode(self) -> LedgerResult<DeploymentRecord> {
        let deployment = DeploymentName::try_new(self.deployment.clone()).ok_or_else(|| {
            LedgerError::Decode(format!(
                "row {}: invalid deployment name '{}'",
                self.id, self.deployment
            ))
        })?;
        let deployed_at = self
            .deployed_at
            .as_deref()
            .map(|ts| {
                NaiveDateTime::parse_from_str(ts, TIMESTAMP_READ_FORMAT).map_err(|e| {
                    LedgerError::Decode(format!("row {}: deployed_at '{ts}': {e}", self.id))
                })
            })
            .transpose()?;

        Ok(DeploymentRecord {
            id: self.id,
            deployment,
            // Lenient on read: a malformed stored version counts as zeros.
            version: Version::parse_lenient(&self.version),
            pre_release: self.pre_release,
            build: self.build,
            release_notes: ReleaseNotes::from_json(&self.release_notes),
            deployed_at,
        })
    }
}

/// A record about to be appended.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDeploymentRecord {
    pub deployment: DeploymentName,
    pub version: Version,
    pub pre_release: Option<PreRelease>,
    pub build: Option<String>,
    pub release_notes: ReleaseNotes,
    pub deployed_at: NaiveDateTime,
}

impl NewDeploymentRecord {
    /// Record stamped with the current UTC time and no build id.
    pub fn new(deployment: DeploymentName, version: Version) -> Self {
        Self {
            deployment,
            version,
            pre_release: None,
            build: None,
            release_notes: ReleaseNotes::default(),
            deployed_at: chrono::Utc::now().naive_utc(),
        }
    }

    pub(crate) fn deployed_at_sql(&self) -> String {
        self.deployed_at
            .format(TIMESTAMP_WRITE_FORMAT)
            .to_string()
    }
}

/// Subset of the ledger returned by [`crate::LedgerStore::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    /// Every record
    #[default]
    All,
    /// Records whose major component equals the given value
    Major(u64),
    /// Records whose major and minor components equal the given values
    MajorMinor(u64, u64),
}

impl RecordFilter {
    pub fn matches(&self, version: &Version) -> bool {
        match *self {
            RecordFilter::All => true,
            RecordFilter::Major(major) => version.major == major,
            RecordFilter::MajorMinor(major, minor) => {
                version.major == major && version.minor == minor
            }
        }
    }
}
