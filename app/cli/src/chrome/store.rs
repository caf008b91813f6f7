//! Persisted tab snapshots.
//!
//! One JSON file per project id, holding the last-known live tab URLs.
//! Ordering is capture order. Corrupt JSON is a decode failure, not an
//! empty result; the caller decides whether to fall back.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApertureError;

/// A captured set of live tab URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChromeTabSnapshot {
    /// Tab URLs in capture order.
    pub urls: Vec<String>,
    /// When the capture happened.
    pub captured_at: DateTime<Utc>,
}

impl ChromeTabSnapshot {
    /// Builds a snapshot stamped now.
    #[must_use]
    pub fn new(urls: Vec<String>) -> Self { Self { urls, captured_at: Utc::now() } }
}

/// File-backed snapshot store, one file per project.
#[derive(Debug, Clone)]
pub struct ChromeTabStore {
    dir: PathBuf,
}

impl ChromeTabStore {
    /// Creates a store rooted at the given directory.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self { Self { dir } }

    /// Creates a store at the default location.
    #[must_use]
    pub fn at_default_path() -> Self { Self::new(crate::paths::chrome_tabs_dir()) }

    fn snapshot_path(&self, project_id: &str) -> PathBuf {
        self.dir.join(format!("{project_id}.json"))
    }

    /// Loads the snapshot for a project, if one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] on unreadable or corrupt contents.
    pub fn load(&self, project_id: &str) -> Result<Option<ChromeTabSnapshot>, ApertureError> {
        match std::fs::read_to_string(self.snapshot_path(project_id)) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|err| ApertureError::Store(format!("tab snapshot: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ApertureError::Store(format!("tab snapshot: {err}"))),
        }
    }

    /// Persists the snapshot for a project, overwriting any existing one.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] when the file cannot be written.
    pub fn save(
        &self,
        project_id: &str,
        snapshot: &ChromeTabSnapshot,
    ) -> Result<(), ApertureError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|err| ApertureError::Store(format!("tab snapshot: {err}")))?;

        let json = serde_json::to_string_pretty(snapshot)
            .map_err(|err| ApertureError::Store(format!("tab snapshot: {err}")))?;
        std::fs::write(self.snapshot_path(project_id), json)
            .map_err(|err| ApertureError::Store(format!("tab snapshot: {err}")))
    }

    /// Deletes the snapshot for a project. Deleting a missing snapshot is a
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] when removal fails.
    pub fn delete(&self, project_id: &str) -> Result<(), ApertureError> {
        match std::fs::remove_file(self.snapshot_path(project_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApertureError::Store(format!("tab snapshot: {err}"))),
        }
    }
}
