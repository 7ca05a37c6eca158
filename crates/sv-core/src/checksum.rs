//! SHA-256 checksum utilities.

use sha2::{Digest, Sha256};

/// Length of an abbreviated hash, matching `git rev-parse --short`.
pub const SHORT_HASH_LEN: usize = 7;

/// Compute SHA256 checksum of a string
pub fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Abbreviated checksum used as a stand-in build identifier.
///
/// The fallback version record has no VCS revision, so it carries a stable
/// hash of a caller-chosen seed instead.
pub fn short_hash(seed: &str) -> String {
    let mut full = compute_checksum(seed);
    full.truncate(SHORT_HASH_LEN);
    full
}
