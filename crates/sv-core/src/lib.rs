//! sv-core - Core library for shipver
//!
//! This crate provides the shared, storage-agnostic pieces of the deployment
//! ledger: configuration parsing, semantic versions and the version
//! calculator, deployment unit metadata, deployment names, and discovery of
//! timestamped deployment files.

pub mod checksum;
pub mod config;
pub mod deployment;
pub mod deployment_name;
pub mod error;
pub mod manifest;
pub mod scanner;
pub(crate) mod serde_helpers;
pub mod version;

pub use checksum::{compute_checksum, short_hash};
pub use config::{Config, Environment, MaintenanceConfig};
pub use deployment::{DeploymentMeta, ReleaseNotes};
pub use deployment_name::DeploymentName;
pub use error::{CoreError, CoreResult};
pub use manifest::DeploymentManifest;
pub use scanner::{discover, pending, DeploymentFile};
pub use version::{BumpKind, PreRelease, StartingVersion, Version};
