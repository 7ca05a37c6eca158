//! Error types for sv-core

use thiserror::Error;

/// Core error type for shipver
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {message}")]
    ConfigParseError { message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Pre-release tag does not follow semantic versioning rules
    #[error("[E004] Invalid pre-release tag '{tag}': {reason}")]
    InvalidPreRelease { tag: String, reason: String },

    /// E005: Version string could not be interpreted
    #[error("[E005] Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// E006: Deployment file name does not follow `YYYY_MM_DD_HHMMSS_name`
    #[error("[E006] Invalid deployment file name '{path}': {reason}")]
    InvalidDeploymentFile { path: String, reason: String },

    /// E007: Two deployment files normalise to the same identifier
    #[error("[E007] Duplicate deployment identifier '{name}' in {first} and {second}")]
    DuplicateIdentifier {
        name: String,
        first: String,
        second: String,
    },

    /// E008: Deployment metadata is inconsistent
    #[error("[E008] Invalid deployment metadata: {message}")]
    InvalidMetadata { message: String },

    /// E009: Glob pattern could not be built for a deployment path
    #[error("[E009] Invalid deployment path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E015: YAML parse error
    #[error("[E015] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
