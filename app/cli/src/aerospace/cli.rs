//! Production gateway adapter shelling out to the `aerospace` binary.
//!
//! Every query asks AeroSpace for JSON output with an explicit field format,
//! so parsing does not depend on the tool's default column layout. Commands
//! that take a workspace name pass `--` before it, since workspace names are
//! derived from user-controlled project names.

use serde_json::from_str;

use super::types::{WindowInfo, WorkspaceInfo};
use super::WindowGateway;
use crate::error::ApertureError;
use crate::utils::command::run_captured;

/// Format string requesting the window fields [`WindowInfo`] deserializes.
const WINDOW_FORMAT: &str = "%{window-id}%{app-bundle-id}%{workspace}%{window-title}";

/// Shells out to the AeroSpace CLI.
#[derive(Debug, Clone)]
pub struct AeroSpaceCli {
    binary: String,
}

impl Default for AeroSpaceCli {
    fn default() -> Self { Self::new() }
}

impl AeroSpaceCli {
    /// Creates an adapter using the `aerospace` binary from the search path.
    #[must_use]
    pub fn new() -> Self { Self { binary: "aerospace".to_string() } }

    /// Creates an adapter using an explicit binary name or path.
    #[must_use]
    pub fn with_binary(binary: impl Into<String>) -> Self { Self { binary: binary.into() } }

    fn run(&self, args: &[&str]) -> Result<String, ApertureError> {
        run_captured(&self.binary, args).map_err(ApertureError::AeroSpace)
    }

    fn list_windows(&self, selector: &[&str]) -> Result<Vec<WindowInfo>, ApertureError> {
        let mut args = vec!["list-windows"];
        args.extend_from_slice(selector);
        args.extend_from_slice(&["--json", "--format", WINDOW_FORMAT]);

        let stdout = self.run(&args)?;
        if stdout.is_empty() {
            return Ok(Vec::new());
        }

        from_str(&stdout).map_err(|err| {
            ApertureError::AeroSpace(format!("unparseable list-windows output: {err}"))
        })
    }
}

/// Whether an error is AeroSpace's "no window is focused" report rather
/// than a real failure.
fn is_no_focus_error(err: &ApertureError) -> bool {
    matches!(
        err,
        ApertureError::AeroSpace(detail)
            if detail.to_lowercase().contains("no window is focused")
    )
}

impl WindowGateway for AeroSpaceCli {
    fn list_windows_for_app(&self, bundle_id: &str) -> Result<Vec<WindowInfo>, ApertureError> {
        self.list_windows(&["--all", "--app-bundle-id", bundle_id])
    }

    fn list_windows_for_workspace(
        &self,
        workspace: &str,
    ) -> Result<Vec<WindowInfo>, ApertureError> {
        self.list_windows(&["--workspace", workspace])
    }

    fn list_all_windows(&self) -> Result<Vec<WindowInfo>, ApertureError> {
        self.list_windows(&["--all"])
    }

    fn focused_window(&self) -> Result<Option<WindowInfo>, ApertureError> {
        // AeroSpace reports an error when nothing is focused; only that
        // case is an empty result. Tool-not-found and the like stay errors.
        match self.list_windows(&["--focused"]) {
            Ok(windows) => Ok(windows.into_iter().next()),
            Err(err) if is_no_focus_error(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn focus_window(&self, window_id: u32) -> Result<(), ApertureError> {
        self.run(&["focus", "--window-id", &window_id.to_string()]).map(|_| ())
    }

    fn move_window_to_workspace(
        &self,
        workspace: &str,
        window_id: u32,
        focus_follows: bool,
    ) -> Result<(), ApertureError> {
        let id = window_id.to_string();
        let mut args = vec!["move-node-to-workspace", "--window-id", id.as_str()];
        if focus_follows {
            args.push("--focus-follows-window");
        }
        args.extend_from_slice(&["--", workspace]);
        self.run(&args).map(|_| ())
    }

    fn focus_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        self.run(&["workspace", "--", workspace]).map(|_| ())
    }

    fn list_workspaces_with_focus(&self) -> Result<Vec<WorkspaceInfo>, ApertureError> {
        let all = self.run(&["list-workspaces", "--all"])?;
        let focused = self.run(&["list-workspaces", "--focused"])?;
        let focused = focused.trim();

        Ok(all
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|name| WorkspaceInfo { name: name.to_string(), focused: name == focused })
            .collect())
    }

    fn create_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        // Workspaces materialize on first focus.
        self.focus_workspace(workspace)
    }

    fn close_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        // AeroSpace has no close command; a workspace disappears once it is
        // empty and unfocused. Evict remaining windows to the inbox.
        let windows = self.list_windows_for_workspace(workspace)?;
        for window in windows {
            self.move_window_to_workspace(crate::constants::RESERVED_PROJECT_ID, window.id, false)?;
        }

        // An emptied workspace only disappears once it loses focus.
        let focused = self
            .list_workspaces_with_focus()?
            .into_iter()
            .find(|ws| ws.focused)
            .map(|ws| ws.name);
        if focused.as_deref() == Some(workspace) {
            self.focus_workspace(crate::constants::RESERVED_PROJECT_ID)?;
        }
        Ok(())
    }
}
