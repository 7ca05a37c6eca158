//! Strongly-typed deployment identifier.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Identifier of a deployment unit: the file name with its timestamp prefix
/// and extension removed (`2024_03_01_120000_add_users.yml` → `add_users`).
///
/// Identifiers are the ledger's unique key, so they are restricted to ASCII
/// alphanumerics, `_` and `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentName(String);

impl DeploymentName {
    /// Create a new `DeploymentName`, panicking if the name is invalid.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(is_valid_name(&s), "invalid deployment name: {s:?}");
        Self(s)
    }

    /// Try to create a new `DeploymentName`, returning `None` if the name is
    /// empty or contains characters outside `[A-Za-z0-9_-]`.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if is_valid_name(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn is_valid_name(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for DeploymentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeploymentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for DeploymentName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for DeploymentName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DeploymentName {
    type Error = String;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        if is_valid_name(&s) {
            Ok(Self(s))
        } else {
            Err(format!("invalid deployment name: {s:?}"))
        }
    }
}

impl From<DeploymentName> for String {
    fn from(name: DeploymentName) -> Self {
        name.0
    }
}

impl PartialEq<str> for DeploymentName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DeploymentName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(DeploymentName::try_new("add_users").is_some());
        assert!(DeploymentName::try_new("fix-login-2").is_some());
    }

    #[test]
    fn test_invalid_names() {
        assert!(DeploymentName::try_new("").is_none());
        assert!(DeploymentName::try_new("has space").is_none());
        assert!(DeploymentName::try_new("../escape").is_none());
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let ok: DeploymentName = serde_json::from_str("\"add_users\"").unwrap();
        assert_eq!(ok, "add_users");
        assert!(serde_json::from_str::<DeploymentName>("\"a b\"").is_err());
    }
}
