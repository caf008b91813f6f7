//! Persisted window frames.
//!
//! A single versioned JSON document keyed by project id and screen mode,
//! with independent slots per mode. An absent entry means "nothing to
//! restore", never an error.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::screen_mode::ScreenMode;
use crate::error::ApertureError;

/// Window position file version.
pub const WINDOW_POSITIONS_VERSION: u32 = 1;

/// A window frame in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Frame {
    /// Returns this frame shifted by an offset.
    #[must_use]
    pub const fn offset_by(&self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy, w: self.w, h: self.h }
    }
}

/// The saved frames for one (project, mode) slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedWindowFrames {
    /// IDE window frame, if captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ide: Option<Frame>,
    /// Browser window frame, if captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome: Option<Frame>,
}

impl SavedWindowFrames {
    /// Whether neither frame was captured.
    #[must_use]
    pub const fn is_empty(&self) -> bool { self.ide.is_none() && self.chrome.is_none() }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct PositionDocument {
    version: u32,
    #[serde(flatten)]
    projects: BTreeMap<String, BTreeMap<ScreenMode, SavedWindowFrames>>,
}

/// File-backed window position store.
#[derive(Debug, Clone)]
pub struct WindowPositionStore {
    path: PathBuf,
}

impl WindowPositionStore {
    /// Creates a store at the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self { Self { path } }

    /// Creates a store at the default location.
    #[must_use]
    pub fn at_default_path() -> Self { Self::new(crate::paths::window_positions_path()) }

    fn read_document(&self) -> Result<PositionDocument, ApertureError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|err| ApertureError::Store(format!("window positions: {err}"))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Ok(PositionDocument { version: WINDOW_POSITIONS_VERSION, ..Default::default() })
            }
            Err(err) => Err(ApertureError::Store(format!("window positions: {err}"))),
        }
    }

    /// Loads the saved frames for a project and mode. Absent entries yield
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] on unreadable or corrupt contents.
    pub fn load(
        &self,
        project_id: &str,
        mode: ScreenMode,
    ) -> Result<Option<SavedWindowFrames>, ApertureError> {
        let document = self.read_document()?;
        Ok(document
            .projects
            .get(project_id)
            .and_then(|modes| modes.get(&mode))
            .copied())
    }

    /// Saves the frames for a project and mode, leaving the other mode's
    /// slot untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] when the document cannot be read or
    /// written.
    pub fn save(
        &self,
        project_id: &str,
        mode: ScreenMode,
        frames: SavedWindowFrames,
    ) -> Result<(), ApertureError> {
        let mut document = self.read_document()?;
        document.version = WINDOW_POSITIONS_VERSION;
        document
            .projects
            .entry(project_id.to_string())
            .or_default()
            .insert(mode, frames);

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| ApertureError::Store(format!("window positions: {err}")))?;
        }

        let json = serde_json::to_string_pretty(&document)
            .map_err(|err| ApertureError::Store(format!("window positions: {err}")))?;
        std::fs::write(&self.path, json)
            .map_err(|err| ApertureError::Store(format!("window positions: {err}")))
    }
}
