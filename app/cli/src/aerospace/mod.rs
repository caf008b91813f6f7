//! Window-manager gateway.
//!
//! Abstraction over the AeroSpace CLI. This layer is a pure query/command
//! boundary: no caching, no retries. Errors are opaque external-tool
//! failures (non-zero exit, tool not found) surfaced verbatim to the caller;
//! retry policy belongs to the engine.

mod cli;
pub mod types;

pub use cli::AeroSpaceCli;
pub use types::{WindowInfo, WorkspaceInfo};

use crate::error::ApertureError;

/// Query/command boundary over the external tiling window manager.
///
/// One production adapter shells out to the `aerospace` binary; tests use an
/// in-memory fake.
pub trait WindowGateway {
    /// Lists all windows owned by an application bundle id.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn list_windows_for_app(&self, bundle_id: &str) -> Result<Vec<WindowInfo>, ApertureError>;

    /// Lists all windows in a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn list_windows_for_workspace(&self, workspace: &str)
    -> Result<Vec<WindowInfo>, ApertureError>;

    /// Lists every window the window manager knows about.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn list_all_windows(&self) -> Result<Vec<WindowInfo>, ApertureError>;

    /// Returns the currently focused window, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn focused_window(&self) -> Result<Option<WindowInfo>, ApertureError>;

    /// Focuses a window by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn focus_window(&self, window_id: u32) -> Result<(), ApertureError>;

    /// Moves a window into a workspace, optionally following it with focus.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn move_window_to_workspace(
        &self,
        workspace: &str,
        window_id: u32,
        focus_follows: bool,
    ) -> Result<(), ApertureError>;

    /// Focuses a workspace by name.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn focus_workspace(&self, workspace: &str) -> Result<(), ApertureError>;

    /// Lists all workspaces together with which one is focused.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn list_workspaces_with_focus(&self) -> Result<Vec<WorkspaceInfo>, ApertureError>;

    /// Ensures a workspace exists. AeroSpace materializes workspaces on
    /// first use, so this focuses the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn create_workspace(&self, workspace: &str) -> Result<(), ApertureError>;

    /// Closes a workspace, evicting any remaining windows.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the external tool fails.
    fn close_workspace(&self, workspace: &str) -> Result<(), ApertureError>;
}
