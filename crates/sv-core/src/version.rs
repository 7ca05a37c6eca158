//! Semantic versions and the version calculator.
//!
//! Only the `X.Y.Z` core is computed here. Pre-release tags and build
//! metadata are orthogonal: they are chosen by the caller and stored next to
//! the core, never derived from it.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which version component a deployment increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BumpKind {
    /// Incompatible change: `X.y.z` → `(X+1).0.0`
    Major,
    /// Backwards-compatible feature: `x.Y.z` → `x.(Y+1).0`
    Minor,
    /// Backwards-compatible fix: `x.y.Z` → `x.y.(Z+1)`
    #[default]
    Patch,
}

impl BumpKind {
    /// Lowercase name as used in manifests and CLI flags.
    pub fn as_str(&self) -> &'static str {
        match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
        }
    }
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The numeric core of a semantic version.
///
/// Field order matters: the derived `Ord` compares `major`, then `minor`,
/// then `patch`, numerically, so `10.0.0 > 2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Construct a version from its components.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parse a version core leniently.
    ///
    /// Missing or non-numeric components become `0`; a leading `v` and any
    /// `-pre`/`+build` suffix are ignored. Never fails.
    pub fn parse_lenient(s: &str) -> Self {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        let core = trimmed.split(['-', '+']).next().unwrap_or_default();

        let mut parts = core.split('.').map(|p| p.trim().parse::<u64>().unwrap_or(0));
        Self {
            major: parts.next().unwrap_or(0),
            minor: parts.next().unwrap_or(0),
            patch: parts.next().unwrap_or(0),
        }
    }

    /// Apply a bump, returning the next version. Never decrements.
    pub fn next(self, bump: BumpKind) -> Self {
        match bump {
            BumpKind::Major => Self::new(self.major.saturating_add(1), 0, 0),
            BumpKind::Minor => Self::new(self.major, self.minor.saturating_add(1), 0),
            BumpKind::Patch => Self::new(self.major, self.minor, self.patch.saturating_add(1)),
        }
    }
}

/// Compute the next version from a possibly malformed stored version string.
pub fn next_version(current: &str, bump: BumpKind) -> Version {
    Version::parse_lenient(current).next(bump)
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = CoreError;

    /// Strict parse: exactly three numeric components.
    fn from_str(s: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            version: s.to_string(),
            reason: reason.to_string(),
        };
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid("expected MAJOR.MINOR.PATCH"));
        }
        let mut nums = [0u64; 3];
        for (slot, part) in nums.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| invalid("components must be non-negative integers"))?;
        }
        Ok(Self::new(nums[0], nums[1], nums[2]))
    }
}

impl TryFrom<String> for Version {
    type Error = CoreError;
    fn try_from(s: String) -> CoreResult<Self> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(v: Version) -> Self {
        v.to_string()
    }
}

/// A validated pre-release tag such as `alpha`, `beta.2` or `rc-1`.
///
/// Dot-separated identifiers of `[0-9A-Za-z-]`, none empty, and purely
/// numeric identifiers without leading zeros. Stored without the leading `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PreRelease(String);

impl PreRelease {
    /// Validate and wrap a pre-release tag.
    pub fn parse(tag: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidPreRelease {
            tag: tag.to_string(),
            reason: reason.to_string(),
        };
        if tag.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if tag.starts_with('-') {
            return Err(invalid("omit the leading '-'"));
        }
        for ident in tag.split('.') {
            if ident.is_empty() {
                return Err(invalid("identifiers must not be empty"));
            }
            if !ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(invalid("identifiers may only contain [0-9A-Za-z-]"));
            }
            if ident.len() > 1
                && ident.starts_with('0')
                && ident.chars().all(|c| c.is_ascii_digit())
            {
                return Err(invalid("numeric identifiers must not have leading zeros"));
            }
        }
        Ok(Self(tag.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PreRelease {
    type Error = CoreError;
    fn try_from(s: String) -> CoreResult<Self> {
        Self::parse(&s)
    }
}

impl From<PreRelease> for String {
    fn from(tag: PreRelease) -> Self {
        tag.0
    }
}

/// The configured version used before any deployment has been recorded,
/// e.g. `0.0.0` or `1.0.0-alpha`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartingVersion {
    pub version: Version,
    pub pre_release: Option<PreRelease>,
}

impl StartingVersion {
    /// Render as `X.Y.Z[-pre]`.
    pub fn release(&self) -> String {
        match &self.pre_release {
            Some(pre) => format!("{}-{}", self.version, pre),
            None => self.version.to_string(),
        }
    }
}

impl FromStr for StartingVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let s = s.trim();
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Some(PreRelease::parse(pre)?)),
            None => (s, None),
        };
        Ok(Self {
            version: core.parse()?,
            pre_release: pre,
        })
    }
}

impl fmt::Display for StartingVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.release())
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
