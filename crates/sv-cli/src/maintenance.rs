//! File-based maintenance mode.
//!
//! While a deploy runs, `<project>/.maintenance` holds a JSON document with
//! the message and start time. Applications check for the file to serve a
//! maintenance page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use sv_deploy::{ActionError, Maintenance};

/// Marker file name inside the project directory.
pub(crate) const MAINTENANCE_FILE: &str = ".maintenance";

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct MaintenanceMarker {
    pub message: Option<String>,
    pub since: DateTime<Utc>,
}

pub(crate) struct FileMaintenance {
    path: PathBuf,
}

impl FileMaintenance {
    pub fn new(root: &Path) -> Self {
        Self {
            path: root.join(MAINTENANCE_FILE),
        }
    }

    /// Read the current marker, if any.
    pub fn marker(&self) -> Option<MaintenanceMarker> {
        let content = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Maintenance for FileMaintenance {
    fn enter(&self, message: Option<&str>) -> Result<(), ActionError> {
        let marker = MaintenanceMarker {
            message: message.map(str::to_string),
            since: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&marker)?)?;
        log::info!("Maintenance mode on: {}", self.path.display());
        Ok(())
    }

    fn exit(&self) -> Result<(), ActionError> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
            log::info!("Maintenance mode off");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.path.exists()
    }
}

/// Leaves maintenance mode when dropped, including on error paths.
pub(crate) struct MaintenanceGuard<'a> {
    maintenance: &'a dyn Maintenance,
}

impl<'a> MaintenanceGuard<'a> {
    pub fn enter(
        maintenance: &'a dyn Maintenance,
        message: Option<&str>,
    ) -> Result<Self, ActionError> {
        maintenance.enter(message)?;
        Ok(Self { maintenance })
    }
}

impl Drop for MaintenanceGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.maintenance.exit() {
            log::warn!("Failed to leave maintenance mode: {e}");
        }
    }
}
