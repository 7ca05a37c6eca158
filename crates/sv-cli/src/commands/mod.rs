//! CLI command implementations

pub(crate) mod deploy;
pub(crate) mod install;
pub(crate) mod make;
pub(crate) mod notes;
pub(crate) mod status;
pub(crate) mod version;
