//! Deployment unit metadata.
//!
//! A deployment unit is a versioned change package. Its executable action
//! lives with the runner; this module holds the storage-agnostic description
//! of what the unit does to the version and what it records.

use crate::version::{BumpKind, PreRelease};
use serde::{Deserialize, Serialize};

/// Structured release notes attached verbatim to a ledger record.
///
/// Usually a list of strings, but any JSON value is accepted. Serialized to
/// JSON text for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseNotes(serde_json::Value);

impl Default for ReleaseNotes {
    fn default() -> Self {
        Self(serde_json::Value::Array(Vec::new()))
    }
}

impl ReleaseNotes {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Notes made of plain lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(serde_json::Value::Array(
            lines
                .into_iter()
                .map(|s| serde_json::Value::String(s.into()))
                .collect(),
        ))
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Serialize to the JSON text stored in the ledger.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    /// Decode stored JSON text.
    ///
    /// Text that is not valid JSON (e.g. a hand-edited row) is kept as a
    /// plain JSON string rather than rejected.
    pub fn from_json(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => Self(value),
            Err(_) => Self(serde_json::Value::String(raw.to_string())),
        }
    }

    /// True for `[]`, `{}`, `null` and `""`.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            serde_json::Value::Null => true,
            serde_json::Value::Array(a) => a.is_empty(),
            serde_json::Value::Object(o) => o.is_empty(),
            serde_json::Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

/// Everything the runner needs to know about a unit besides its action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentMeta {
    /// Version component incremented when the unit runs.
    #[serde(default)]
    pub bump: BumpKind,

    /// Pre-release tag recorded with the resulting version.
    #[serde(default)]
    pub pre_release: Option<PreRelease>,

    /// Run the framework migrations before this unit's action.
    #[serde(default)]
    pub migrate: bool,

    /// Wrap the action in a transaction when the connection supports it.
    #[serde(default = "crate::serde_helpers::default_true")]
    pub within_transaction: bool,

    /// Notes stored with the ledger record.
    #[serde(default)]
    pub release_notes: ReleaseNotes,
}

impl Default for DeploymentMeta {
    fn default() -> Self {
        Self {
            bump: BumpKind::Patch,
            pre_release: None,
            migrate: false,
            within_transaction: true,
            release_notes: ReleaseNotes::default(),
        }
    }
}

impl DeploymentMeta {
    pub fn new(bump: BumpKind) -> Self {
        Self {
            bump,
            ..Self::default()
        }
    }

    pub fn with_pre_release(mut self, tag: PreRelease) -> Self {
        self.pre_release = Some(tag);
        self
    }

    pub fn with_migration(mut self) -> Self {
        self.migrate = true;
        self
    }

    pub fn without_transaction(mut self) -> Self {
        self.within_transaction = false;
        self
    }

    pub fn with_release_notes(mut self, notes: ReleaseNotes) -> Self {
        self.release_notes = notes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let meta = DeploymentMeta::default();
        assert_eq!(meta.bump, BumpKind::Patch);
        assert!(meta.pre_release.is_none());
        assert!(!meta.migrate);
        assert!(meta.within_transaction);
        assert!(meta.release_notes.is_empty());
    }

    #[test]
    fn test_release_notes_roundtrip_text() {
        let notes = ReleaseNotes::from_lines(["Added login", "Fixed logout"]);
        let stored = notes.to_json();
        assert_eq!(stored, r#"["Added login","Fixed logout"]"#);
        assert_eq!(ReleaseNotes::from_json(&stored), notes);
    }

    #[test]
    fn test_release_notes_invalid_json_kept_as_string() {
        let notes = ReleaseNotes::from_json("not json");
        assert_eq!(notes.value(), &serde_json::json!("not json"));
    }

    #[test]
    fn test_builder() {
        let meta = DeploymentMeta::new(BumpKind::Minor)
            .with_pre_release(PreRelease::parse("beta").unwrap())
            .with_migration()
            .without_transaction();
        assert_eq!(meta.bump, BumpKind::Minor);
        assert_eq!(meta.pre_release.unwrap().as_str(), "beta");
        assert!(meta.migrate);
        assert!(!meta.within_transaction);
    }
}
