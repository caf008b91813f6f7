//! Chrome window launcher.
//!
//! Opens a new Chrome window with a URL set via `open -na`. The empty-URL
//! retry policy lives in the engine, not here.

use crate::utils::command::run_captured;

/// Launches a browser window with an initial URL set.
pub trait BrowserLauncher {
    /// Opens a new window with the given URLs. An empty set opens the
    /// browser's default new window.
    ///
    /// # Errors
    ///
    /// Returns the launcher's failure text when the browser cannot be
    /// opened.
    fn launch(&self, urls: &[String]) -> Result<(), String>;
}

/// Production launcher using the macOS `open` tool.
#[derive(Debug, Clone, Default)]
pub struct OpenChromeLauncher;

impl OpenChromeLauncher {
    /// Creates the launcher.
    #[must_use]
    pub const fn new() -> Self { Self }
}

impl BrowserLauncher for OpenChromeLauncher {
    fn launch(&self, urls: &[String]) -> Result<(), String> {
        let mut args = vec!["-na", "Google Chrome", "--args", "--new-window"];
        args.extend(urls.iter().map(String::as_str));

        tracing::debug!(url_count = urls.len(), "launching Chrome window");
        run_captured("open", &args).map(|_| ())
    }
}
