//! Screen mode detection.
//!
//! Classifies the screen under a reference point as `wide` or `small` by
//! physical width. Detection failure defaults to `wide`, so a flaky bridge
//! can never block a project switch.

use serde::{Deserialize, Serialize};

use crate::utils::command::run_captured;

/// Coarse classification of the active display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    /// A large display; the default when detection fails.
    Wide,
    /// A small display (e.g. the built-in laptop screen).
    Small,
}

impl std::fmt::Display for ScreenMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Wide => write!(f, "wide"),
            Self::Small => write!(f, "small"),
        }
    }
}

/// Queries the physical geometry of the screen containing a point.
pub trait ScreenQuery {
    /// Returns the width in points of the screen containing `point`.
    ///
    /// # Errors
    ///
    /// Returns the bridge's failure text when the screen cannot be queried.
    fn screen_width_at(&self, point: (f64, f64)) -> Result<f64, String>;
}

/// Production screen query via `osascript`.
#[derive(Debug, Clone, Default)]
pub struct OsaScriptScreenQuery;

impl OsaScriptScreenQuery {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl ScreenQuery for OsaScriptScreenQuery {
    fn screen_width_at(&self, _point: (f64, f64)) -> Result<f64, String> {
        // Finder reports the desktop bounds of the main display as
        // "x1, y1, x2, y2".
        let stdout = run_captured(
            "osascript",
            &["-e", "tell application \"Finder\" to get bounds of window of desktop"],
        )?;

        let fields: Vec<&str> = stdout.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(format!("unexpected desktop bounds: '{stdout}'"));
        }

        let x1: f64 = fields[0].parse().map_err(|_| format!("bad bounds: '{stdout}'"))?;
        let x2: f64 = fields[2].parse().map_err(|_| format!("bad bounds: '{stdout}'"))?;
        Ok(x2 - x1)
    }
}

/// Detects the screen mode at a reference point.
///
/// Widths strictly greater than `threshold` are [`ScreenMode::Wide`];
/// detection failure also yields wide.
pub fn detect_mode(query: &dyn ScreenQuery, point: (f64, f64), threshold: f64) -> ScreenMode {
    match query.screen_width_at(point) {
        Ok(width) if width <= threshold => ScreenMode::Small,
        Ok(_) => ScreenMode::Wide,
        Err(err) => {
            tracing::warn!(error = %err, "screen detection failed, assuming wide");
            ScreenMode::Wide
        }
    }
}
