//! Window frame capture and restore.
//!
//! Reads and applies window frames through the accessibility scripting
//! bridge. Capture tolerates per-app read failures (the slot is skipped);
//! restore reports per-app apply failures as warnings, never as hard
//! failures.

use super::store::{Frame, SavedWindowFrames};
use crate::aerospace::WindowInfo;
use crate::utils::command::run_captured;

/// Reads and writes window frames.
pub trait WindowPositioner {
    /// Reads the current frame of a window.
    ///
    /// # Errors
    ///
    /// Returns the bridge's failure text when the frame cannot be read.
    fn read_frame(&self, window: &WindowInfo) -> Result<Frame, String>;

    /// Applies a frame to a window.
    ///
    /// # Errors
    ///
    /// Returns the bridge's failure text when the frame cannot be applied.
    fn apply_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), String>;
}

/// Production positioner driving System Events through `osascript`.
#[derive(Debug, Clone, Default)]
pub struct OsaScriptPositioner;

impl OsaScriptPositioner {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self { Self }

    fn read_script(bundle_id: &str, title: &str) -> String {
        format!(
            r#"tell application "System Events"
    tell (first process whose bundle identifier is "{bundle_id}")
        set w to first window whose title contains "{title}"
        set {{x, y}} to position of w
        set {{wd, ht}} to size of w
        return (x as text) & "," & (y as text) & "," & (wd as text) & "," & (ht as text)
    end tell
end tell"#
        )
    }

    fn apply_script(bundle_id: &str, title: &str, frame: Frame) -> String {
        format!(
            r#"tell application "System Events"
    tell (first process whose bundle identifier is "{bundle_id}")
        set w to first window whose title contains "{title}"
        set position of w to {{{x}, {y}}}
        set size of w to {{{w}, {h}}}
    end tell
end tell"#,
            x = frame.x as i64,
            y = frame.y as i64,
            w = frame.w as i64,
            h = frame.h as i64,
        )
    }
}

impl WindowPositioner for OsaScriptPositioner {
    fn read_frame(&self, window: &WindowInfo) -> Result<Frame, String> {
        let script = Self::read_script(&window.app_bundle_id, &window.title);
        let stdout = run_captured("osascript", &["-e", &script])?;

        let fields: Vec<&str> = stdout.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(format!("unexpected frame output: '{stdout}'"));
        }

        let parse = |s: &str| s.parse::<f64>().map_err(|_| format!("bad frame: '{stdout}'"));
        Ok(Frame {
            x: parse(fields[0])?,
            y: parse(fields[1])?,
            w: parse(fields[2])?,
            h: parse(fields[3])?,
        })
    }

    fn apply_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), String> {
        let script = Self::apply_script(&window.app_bundle_id, &window.title, frame);
        run_captured("osascript", &["-e", &script]).map(|_| ())
    }
}

/// Captures the IDE and browser frames, skipping whichever reads fail.
///
/// A per-app failure is tolerated; the capture still returns whatever it
/// got.
pub fn capture_frames(
    positioner: &dyn WindowPositioner,
    ide_window: Option<&WindowInfo>,
    chrome_window: Option<&WindowInfo>,
) -> SavedWindowFrames {
    let read = |window: Option<&WindowInfo>, app: &str| {
        window.and_then(|w| match positioner.read_frame(w) {
            Ok(frame) => Some(frame),
            Err(err) => {
                tracing::warn!(app, error = %err, "frame read failed, skipping");
                None
            }
        })
    };

    SavedWindowFrames {
        ide: read(ide_window, "ide"),
        chrome: read(chrome_window, "chrome"),
    }
}

/// Applies a frame to every window of one app, cascading later windows by
/// `offset` so overlapping siblings stay discoverable.
///
/// Returns one warning string per failed apply.
pub fn apply_with_cascade(
    positioner: &dyn WindowPositioner,
    windows: &[WindowInfo],
    frame: Frame,
    offset: (f64, f64),
) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, window) in windows.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let shifted = frame.offset_by(offset.0 * index as f64, offset.1 * index as f64);
        if let Err(err) = positioner.apply_frame(window, shifted) {
            warnings.push(format!("window {}: {err}", window.id));
        }
    }

    warnings
}
