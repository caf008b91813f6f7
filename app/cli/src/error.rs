//! Error types for Aperture.
//!
//! This module provides the unified error type used throughout the
//! application. External tool failures (AeroSpace, Chrome, osascript) carry
//! the underlying exit code and stderr verbatim so failures can be diagnosed
//! without re-running with verbose flags.

use thiserror::Error;

/// Errors that can occur during application execution.
#[derive(Debug, Error)]
pub enum ApertureError {
    /// The configuration file could not be loaded or parsed.
    #[error("Configuration error: {0}")]
    ConfigNotLoaded(String),
    /// The requested project id does not exist in the configuration.
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),
    /// An AeroSpace invocation failed. The payload names the failing step
    /// and includes the tool's exit code and stderr.
    #[error("AeroSpace error: {0}")]
    AeroSpace(String),
    /// Chrome could not be launched, even after the empty-URL retry.
    #[error("Chrome launch failed: {0}")]
    ChromeLaunchFailed(String),
    /// An exit was requested while no project workspace was focused.
    #[error("No active project")]
    NoActiveProject,
    /// There is nothing to return to: the focus history is exhausted and no
    /// non-project workspace exists.
    #[error("No previous window to return to")]
    NoPreviousWindow,
    /// A persisted store could not be read or written.
    #[error("Store error: {0}")]
    Store(String),
    /// IO error.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ApertureError {
    fn from(err: std::io::Error) -> Self { Self::Io(err.to_string()) }
}

impl From<serde_json::Error> for ApertureError {
    fn from(err: serde_json::Error) -> Self { Self::Store(err.to_string()) }
}
