//! Live tab capture via the osascript bridge.
//!
//! Lists the tab URLs of the Chrome window carrying a project's title tag.
//! Errors are opaque bridge failures (non-zero exit, missing binary) and are
//! surfaced as text; the close path downgrades them to warnings.

use crate::constants::title_tag;
use crate::utils::command::run_captured;

/// Scripting bridge that lists live tab URLs for a project window.
pub trait TabCapture {
    /// Returns the tab URLs of the project's browser window, in tab order.
    ///
    /// # Errors
    ///
    /// Returns the bridge's failure text when capture fails.
    fn capture(&self, project_id: &str) -> Result<Vec<String>, String>;
}

/// Production capture adapter driving Chrome through `osascript`.
#[derive(Debug, Clone, Default)]
pub struct OsaScriptTabCapture;

impl OsaScriptTabCapture {
    /// Creates the adapter.
    #[must_use]
    pub const fn new() -> Self { Self }

    fn script(tag: &str) -> String {
        // Emits one URL per line for every tab of the first window whose
        // title contains the project tag.
        format!(
            r#"tell application "Google Chrome"
    repeat with w in windows
        if title of w contains "{tag}" then
            set output to ""
            repeat with t in tabs of w
                set output to output & (URL of t) & linefeed
            end repeat
            return output
        end if
    end repeat
    return ""
end tell"#
        )
    }
}

impl TabCapture for OsaScriptTabCapture {
    fn capture(&self, project_id: &str) -> Result<Vec<String>, String> {
        let script = Self::script(&title_tag(project_id));
        let stdout = run_captured("osascript", &["-e", &script])?;

        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }
}
