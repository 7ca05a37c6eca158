//! Discovery of timestamped deployment files.
//!
//! Deployment files are named `YYYY_MM_DD_HHMMSS_<identifier>.yml`. Sorting by
//! file name therefore sorts chronologically.

use crate::deployment_name::DeploymentName;
use crate::error::{CoreError, CoreResult};
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Timestamp format of the file name prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Extensions recognised as deployment manifests.
pub const MANIFEST_EXTENSIONS: &[&str] = &["yml", "yaml"];

fn file_stem_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}_\d{2}_\d{2}_\d{6})_(.+)$").expect("valid regex literal")
    })
}

/// A discovered deployment file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentFile {
    /// Identifier recorded in the ledger.
    pub name: DeploymentName,
    /// Full path to the manifest.
    pub path: PathBuf,
    /// Base name including timestamp and extension; the sort key.
    pub file_name: String,
    /// Creation timestamp parsed from the prefix.
    pub created_at: NaiveDateTime,
}

impl DeploymentFile {
    /// Interpret a path as a deployment file.
    pub fn from_path(path: &Path) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidDeploymentFile {
            path: path.display().to_string(),
            reason: reason.to_string(),
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| invalid("file name is not valid UTF-8"))?
            .to_string();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("file name is not valid UTF-8"))?;

        let caps = file_stem_regex()
            .captures(stem)
            .ok_or_else(|| invalid("expected YYYY_MM_DD_HHMMSS_<name>"))?;
        let created_at = NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT)
            .map_err(|e| invalid(&format!("bad timestamp prefix: {e}")))?;
        let name = DeploymentName::try_new(&caps[2])
            .ok_or_else(|| invalid("identifier may only contain [A-Za-z0-9_-]"))?;

        Ok(Self {
            name,
            path: path.to_path_buf(),
            file_name,
            created_at,
        })
    }
}

/// Extract the identifier from a deployment file name or path.
pub fn deployment_name(path: &Path) -> CoreResult<DeploymentName> {
    DeploymentFile::from_path(path).map(|f| f.name)
}

/// Find every deployment file under `paths`, ordered by file name.
///
/// Directories that do not exist contribute nothing. Two files yielding the
/// same identifier are rejected with [`CoreError::DuplicateIdentifier`].
pub fn discover<P: AsRef<Path>>(paths: &[P]) -> CoreResult<Vec<DeploymentFile>> {
    let mut files = Vec::new();

    for dir in paths {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            log::debug!("Deployment path {} does not exist, skipping", dir.display());
            continue;
        }

        for ext in MANIFEST_EXTENSIONS {
            let pattern = format!(
                "{}/*_*.{ext}",
                glob::Pattern::escape(&dir.display().to_string())
            );
            let entries = glob::glob(&pattern).map_err(|e| CoreError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
            for entry in entries {
                let path = entry.map_err(|e| CoreError::IoWithPath {
                    path: e.path().display().to_string(),
                    source: e.into_error(),
                })?;
                if path.is_file() {
                    files.push(DeploymentFile::from_path(&path)?);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name).then(a.path.cmp(&b.path)));

    let mut seen: HashMap<&DeploymentName, &Path> = HashMap::new();
    for file in &files {
        if let Some(first) = seen.insert(&file.name, &file.path) {
            return Err(CoreError::DuplicateIdentifier {
                name: file.name.to_string(),
                first: first.display().to_string(),
                second: file.path.display().to_string(),
            });
        }
    }

    log::debug!("Discovered {} deployment file(s)", files.len());
    Ok(files)
}

/// Files whose identifiers have not been recorded yet, in discovery order.
pub fn pending<'a, I>(discovered: &[DeploymentFile], ran: I) -> Vec<DeploymentFile>
where
    I: IntoIterator<Item = &'a DeploymentName>,
{
    let ran: HashSet<&str> = ran.into_iter().map(|n| n.as_str()).collect();
    discovered
        .iter()
        .filter(|f| !ran.contains(f.name.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod tests;
