//! Configuration module.
//!
//! Loads and validates the TOML configuration file that supplies the ordered
//! project list, global Chrome tab settings, and tuning knobs.

pub mod types;

use std::path::Path;

pub use types::{
    ApertureConfig, ChromeConfig, FocusHistoryConfig, IdeFlavor, LayoutConfig, Project,
    ProjectTarget, TimingConfig, slugify,
};

use crate::error::ApertureError;
use crate::paths;

/// Loads the configuration from the default location
/// (`~/.config/aperture/config.toml`).
///
/// # Errors
///
/// Returns [`ApertureError::ConfigNotLoaded`] when the file is missing,
/// unreadable, syntactically invalid, or fails validation.
pub fn load() -> Result<ApertureConfig, ApertureError> { load_from_path(&paths::config_path()) }

/// Loads the configuration from an explicit path.
///
/// # Errors
///
/// Returns [`ApertureError::ConfigNotLoaded`] when the file is missing,
/// unreadable, syntactically invalid, or fails validation.
pub fn load_from_path(path: &Path) -> Result<ApertureConfig, ApertureError> {
    let contents = std::fs::read_to_string(path).map_err(|err| {
        ApertureError::ConfigNotLoaded(format!("{}: {err}", path.display()))
    })?;

    parse(&contents)
}

/// Parses and validates configuration file contents.
///
/// # Errors
///
/// Returns [`ApertureError::ConfigNotLoaded`] on syntax or validation
/// errors.
pub fn parse(contents: &str) -> Result<ApertureConfig, ApertureError> {
    let raw: types::RawConfig = toml::from_str(contents)
        .map_err(|err| ApertureError::ConfigNotLoaded(err.to_string()))?;

    let config = raw.validate().map_err(ApertureError::ConfigNotLoaded)?;
    tracing::debug!(projects = config.projects.len(), "configuration loaded");
    Ok(config)
}
