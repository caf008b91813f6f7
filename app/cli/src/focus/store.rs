//! Persisted focus history.
//!
//! Serializes the back-stack to a versioned JSON file. Loading prunes
//! entries older than the configured age and truncates to the configured
//! size, reporting how many entries were dropped. A file written by a newer
//! version of the application is a load error, never silently ignored.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use super::stack::{CapturedFocus, FocusStack};
use crate::config::FocusHistoryConfig;
use crate::error::ApertureError;

/// Highest focus history file version this build understands.
pub const FOCUS_HISTORY_VERSION: u32 = 1;

/// On-disk shape of the focus history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusHistoryState {
    /// File format version.
    pub version: u32,
    /// The back-stack, most recent last.
    pub stack: Vec<CapturedFocus>,
    /// The focus captured by the most recent select, kept separately so it
    /// survives stack eviction.
    pub most_recent: Option<CapturedFocus>,
}

impl Default for FocusHistoryState {
    fn default() -> Self {
        Self { version: FOCUS_HISTORY_VERSION, stack: Vec::new(), most_recent: None }
    }
}

/// Result of loading the history file.
#[derive(Debug)]
pub struct LoadedHistory {
    /// The pruned, bounded stack.
    pub stack: FocusStack,
    /// The persisted most-recent capture.
    pub most_recent: Option<CapturedFocus>,
    /// How many entries were dropped by age pruning and size truncation.
    pub pruned_count: usize,
}

/// File-backed focus history store.
#[derive(Debug, Clone)]
pub struct FocusHistoryStore {
    path: PathBuf,
    config: FocusHistoryConfig,
}

impl FocusHistoryStore {
    /// Creates a store at the given file path.
    #[must_use]
    pub const fn new(path: PathBuf, config: FocusHistoryConfig) -> Self { Self { path, config } }

    /// Creates a store at the default location.
    #[must_use]
    pub fn at_default_path(config: FocusHistoryConfig) -> Self {
        Self::new(crate::paths::focus_history_path(), config)
    }

    /// Loads the history, pruning stale entries.
    ///
    /// A missing file yields an empty history. A corrupt file or a version
    /// newer than [`FOCUS_HISTORY_VERSION`] is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] on unreadable/corrupt contents or a
    /// version mismatch.
    pub fn load(&self) -> Result<LoadedHistory, ApertureError> {
        let state = match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str::<FocusHistoryState>(&contents)
                .map_err(|err| ApertureError::Store(format!("focus history: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                FocusHistoryState::default()
            }
            Err(err) => return Err(ApertureError::Store(format!("focus history: {err}"))),
        };

        if state.version > FOCUS_HISTORY_VERSION {
            return Err(ApertureError::Store(format!(
                "focus history version {} is newer than supported version {FOCUS_HISTORY_VERSION}",
                state.version
            )));
        }

        let total = state.stack.len();
        let cutoff = Utc::now() - Duration::seconds(self.config.max_age_secs);
        let fresh: Vec<CapturedFocus> =
            state.stack.into_iter().filter(|entry| entry.captured_at >= cutoff).collect();

        let stack = FocusStack::from_entries(fresh, self.config.max_entries);
        let pruned_count = total - stack.len();

        if pruned_count > 0 {
            tracing::debug!(pruned_count, "pruned focus history entries on load");
        }

        Ok(LoadedHistory { stack, most_recent: state.most_recent, pruned_count })
    }

    /// Persists the stack and the most-recent capture.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::Store`] when the file cannot be written.
    pub fn save(
        &self,
        stack: &FocusStack,
        most_recent: Option<&CapturedFocus>,
    ) -> Result<(), ApertureError> {
        let state = FocusHistoryState {
            version: FOCUS_HISTORY_VERSION,
            stack: stack.entries().to_vec(),
            most_recent: most_recent.cloned(),
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|err| ApertureError::Store(format!("focus history: {err}")))?;
        }

        let json = serde_json::to_string_pretty(&state)
            .map_err(|err| ApertureError::Store(format!("focus history: {err}")))?;
        std::fs::write(&self.path, json)
            .map_err(|err| ApertureError::Store(format!("focus history: {err}")))
    }
}
