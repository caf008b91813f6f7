//! Data directory utilities.
//!
//! Provides a centralized way to resolve where Aperture persists state.
//! Uses `~/Library/Application Support/aperture/` on macOS, with a fallback
//! to `/tmp/aperture/` if the data directory is unavailable.

use std::path::PathBuf;

use crate::constants::APP_DIR_NAME;

/// Returns the root data directory for the application.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_DIR_NAME}")),
        |data| data.join(APP_DIR_NAME),
    )
}

/// Returns the path of the persisted focus history file.
#[must_use]
pub fn focus_history_path() -> PathBuf { data_dir().join("focus-history.json") }

/// Returns the path of the persisted window position file.
#[must_use]
pub fn window_positions_path() -> PathBuf { data_dir().join("window-positions.json") }

/// Returns the directory holding per-project Chrome tab snapshots.
#[must_use]
pub fn chrome_tabs_dir() -> PathBuf { data_dir().join("chrome-tabs") }

/// Returns the default configuration file path
/// (`~/.config/aperture/config.toml`).
#[must_use]
pub fn config_path() -> PathBuf {
    dirs::config_dir().map_or_else(
        || PathBuf::from(format!("/tmp/{APP_DIR_NAME}/config.toml")),
        |config| config.join(APP_DIR_NAME).join("config.toml"),
    )
}
