//! YAML deployment manifests.
//!
//! A manifest is the on-disk form of a deployment unit:
//!
//! ```yaml
//! bump: minor
//! pre_release: beta
//! migrate: true
//! release_notes:
//!   - Added audit columns
//! sql:
//!   - ALTER TABLE users ADD COLUMN audited_at TIMESTAMP
//! ```
//!
//! The `major: true` / `minor: true` / `patch: true` flags are accepted as an
//! alternative to `bump`, but at most one may be set.

use crate::deployment::{DeploymentMeta, ReleaseNotes};
use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use crate::version::{BumpKind, PreRelease};
use serde::Deserialize;
use std::path::Path;

/// A parsed deployment manifest: metadata plus the SQL action.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentManifest {
    pub meta: DeploymentMeta,
    /// Statements executed in order as the unit's action.
    pub sql: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    #[serde(default)]
    bump: Option<BumpKind>,
    #[serde(default)]
    major: bool,
    #[serde(default)]
    minor: bool,
    #[serde(default)]
    patch: bool,
    #[serde(default)]
    pre_release: Option<String>,
    #[serde(default)]
    migrate: bool,
    #[serde(default = "default_true")]
    transaction: bool,
    #[serde(default)]
    release_notes: Option<serde_json::Value>,
    #[serde(default)]
    sql: Vec<String>,
}

impl RawManifest {
    fn resolve_bump(&self) -> CoreResult<BumpKind> {
        let flagged: Vec<BumpKind> = [
            (self.major, BumpKind::Major),
            (self.minor, BumpKind::Minor),
            (self.patch, BumpKind::Patch),
        ]
        .into_iter()
        .filter_map(|(set, kind)| set.then_some(kind))
        .collect();

        if flagged.len() > 1 {
            return Err(CoreError::InvalidMetadata {
                message: "only one of major, minor, patch may be set".to_string(),
            });
        }

        match (self.bump, flagged.first().copied()) {
            (Some(bump), Some(flag)) if bump != flag => Err(CoreError::InvalidMetadata {
                message: format!("bump: {bump} conflicts with {flag}: true"),
            }),
            (Some(bump), _) => Ok(bump),
            (None, Some(flag)) => Ok(flag),
            (None, None) => Ok(BumpKind::Patch),
        }
    }
}

impl DeploymentManifest {
    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(content: &str) -> CoreResult<Self> {
        // An empty file is a valid patch deployment with no action.
        let raw: RawManifest = if content.trim().is_empty() {
            serde_yaml::from_str("{}")?
        } else {
            serde_yaml::from_str(content)?
        };

        let bump = raw.resolve_bump()?;
        let pre_release = raw
            .pre_release
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(PreRelease::parse)
            .transpose()?;

        let meta = DeploymentMeta {
            bump,
            pre_release,
            migrate: raw.migrate,
            within_transaction: raw.transaction,
            release_notes: raw
                .release_notes
                .map(ReleaseNotes::new)
                .unwrap_or_default(),
        };

        Ok(Self { meta, sql: raw.sql })
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
