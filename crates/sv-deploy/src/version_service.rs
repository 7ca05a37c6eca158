//! Read-only version queries over the ledger.
//!
//! Everything is re-read from the ledger on each call. Before the first
//! deployment a fallback built from the configured starting version stands
//! in for the latest record.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use sv_core::{short_hash, DeploymentName, ReleaseNotes, StartingVersion, Version};
use sv_ledger::{DeploymentRecord, LedgerResult, LedgerStore, RecordFilter};

/// Version rendering styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VersionFormat {
    /// `X.Y.Z[-pre]`
    Release,
    /// `vX.Y.Z[-pre]`
    #[default]
    Short,
    /// `Version X.Y.Z[-pre] (build B)`
    Long,
    /// `vX.Y.Z[-pre]+B`
    Full,
}

impl FromStr for VersionFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "release" => Ok(VersionFormat::Release),
            "short" => Ok(VersionFormat::Short),
            "long" => Ok(VersionFormat::Long),
            "full" => Ok(VersionFormat::Full),
            other => Err(format!("unknown version format '{other}'")),
        }
    }
}

/// Which records release notes are collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotesLevel {
    /// Every record
    #[default]
    All,
    /// Records sharing the latest major version
    Major,
    /// Records sharing the latest major and minor version
    Minor,
    /// The latest record only
    Single,
}

impl FromStr for NotesLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "all" => Ok(NotesLevel::All),
            "major" => Ok(NotesLevel::Major),
            "minor" => Ok(NotesLevel::Minor),
            "single" => Ok(NotesLevel::Single),
            other => Err(format!("unknown release notes level '{other}'")),
        }
    }
}

/// The current release: the latest ledger record or the fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseInfo {
    /// `None` for the fallback.
    pub deployment: Option<DeploymentName>,
    pub version: Version,
    pub pre_release: Option<String>,
    pub build: Option<String>,
    pub deployed_at: Option<NaiveDateTime>,
    pub release_notes: ReleaseNotes,
}

impl ReleaseInfo {
    /// Stand-in used while the ledger is empty. The build id is derived from
    /// the project name so it is stable across calls.
    pub fn fallback(starting: &StartingVersion, project: &str) -> Self {
        Self {
            deployment: None,
            version: starting.version,
            pre_release: starting.pre_release.as_ref().map(|p| p.to_string()),
            build: Some(short_hash(project)),
            deployed_at: Some(chrono::Utc::now().naive_utc()),
            release_notes: ReleaseNotes::default(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.deployment.is_none()
    }

    /// `X.Y.Z[-pre]`
    pub fn release(&self) -> String {
        match self.pre_release.as_deref().filter(|p| !p.is_empty()) {
            Some(pre) => format!("{}-{}", self.version, pre),
            None => self.version.to_string(),
        }
    }

    /// `vX.Y.Z[-pre]`
    pub fn short(&self) -> String {
        format!("v{}", self.release())
    }

    /// `vX.Y.Z[-pre]+build`; an unknown build renders as empty.
    pub fn full(&self) -> String {
        format!("{}+{}", self.short(), self.build())
    }

    /// `Version X.Y.Z[-pre] (build B)`; an unknown build renders as empty.
    pub fn long(&self) -> String {
        format!("Version {} (build {})", self.release(), self.build())
    }

    pub fn render(&self, format: VersionFormat) -> String {
        match format {
            VersionFormat::Release => self.release(),
            VersionFormat::Short => self.short(),
            VersionFormat::Long => self.long(),
            VersionFormat::Full => self.full(),
        }
    }

    fn build(&self) -> &str {
        self.build.as_deref().unwrap_or_default()
    }
}

impl From<DeploymentRecord> for ReleaseInfo {
    fn from(record: DeploymentRecord) -> Self {
        Self {
            deployment: Some(record.deployment),
            version: record.version,
            pre_release: record.pre_release,
            build: record.build,
            deployed_at: record.deployed_at,
            release_notes: record.release_notes,
        }
    }
}

impl fmt::Display for ReleaseInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

/// Release notes of one record, labelled with that record's release.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseEntry {
    pub release: String,
    pub deployed_at: Option<NaiveDateTime>,
    pub notes: ReleaseNotes,
}

impl From<ReleaseInfo> for ReleaseEntry {
    fn from(info: ReleaseInfo) -> Self {
        Self {
            release: info.release(),
            deployed_at: info.deployed_at,
            notes: info.release_notes,
        }
    }
}

/// Version queries for one project.
pub struct VersionService<'a> {
    store: &'a LedgerStore,
    starting: StartingVersion,
    project: String,
}

impl<'a> VersionService<'a> {
    pub fn new(
        store: &'a LedgerStore,
        starting: StartingVersion,
        project: impl Into<String>,
    ) -> Self {
        Self {
            store,
            starting,
            project: project.into(),
        }
    }

    /// Latest record, or the fallback when the ledger is missing or empty.
    pub fn current(&self) -> LedgerResult<ReleaseInfo> {
        Ok(self
            .latest()?
            .map(ReleaseInfo::from)
            .unwrap_or_else(|| ReleaseInfo::fallback(&self.starting, &self.project)))
    }

    pub fn render(&self, format: VersionFormat) -> LedgerResult<String> {
        Ok(self.current()?.render(format))
    }

    /// `X.Y.Z[-pre]` of the current release.
    pub fn release(&self) -> LedgerResult<String> {
        self.render(VersionFormat::Release)
    }

    /// When the current release was deployed.
    pub fn date(&self) -> LedgerResult<Option<NaiveDateTime>> {
        Ok(self.current()?.deployed_at)
    }

    /// Release notes at `level`, latest first.
    ///
    /// With an empty ledger the fallback is the only entry.
    pub fn release_notes(&self, level: NotesLevel) -> LedgerResult<Vec<ReleaseEntry>> {
        let Some(latest) = self.latest()? else {
            let fallback = ReleaseInfo::fallback(&self.starting, &self.project);
            return Ok(vec![ReleaseEntry::from(fallback)]);
        };

        let filter = match level {
            NotesLevel::All => RecordFilter::All,
            NotesLevel::Major => RecordFilter::Major(latest.version.major),
            NotesLevel::Minor => {
                RecordFilter::MajorMinor(latest.version.major, latest.version.minor)
            }
            NotesLevel::Single => {
                return Ok(vec![ReleaseEntry::from(ReleaseInfo::from(latest))]);
            }
        };

        Ok(self
            .store
            .all(filter)?
            .into_iter()
            .map(|record| ReleaseEntry::from(ReleaseInfo::from(record)))
            .collect())
    }

    fn latest(&self) -> LedgerResult<Option<DeploymentRecord>> {
        if !self.store.exists()? {
            return Ok(None);
        }
        self.store.latest()
    }
}

#[cfg(test)]
#[path = "version_service_test.rs"]
mod tests;
