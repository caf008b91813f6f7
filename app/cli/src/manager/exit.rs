//! Exit to whatever the user was doing before switching projects.
//!
//! Walks the focus back-stack, skipping windows that no longer exist, then
//! falls back through non-project workspaces. Only when no non-project
//! workspace exists at all does the operation fail.

use std::collections::HashSet;

use super::ProjectManager;
use crate::constants::project_for_workspace;
use crate::error::ApertureError;

/// What the exit focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitTarget {
    /// A window from the focus back-stack.
    Window(u32),
    /// A fallback non-project workspace.
    Workspace(String),
}

impl ProjectManager {
    /// Leaves the active project workspace, returning to the most recent
    /// still-valid window from the back-stack, or to a non-project
    /// workspace as a fallback.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::NoActiveProject`] when no project workspace
    /// is focused, [`ApertureError::NoPreviousWindow`] when there is
    /// nothing to return to, and [`ApertureError::AeroSpace`] when the
    /// gateway fails.
    pub fn exit_to_non_project_window(&mut self) -> Result<ExitTarget, ApertureError> {
        let workspaces = self.gateway.list_workspaces_with_focus()?;

        let focused_is_project = workspaces
            .iter()
            .find(|ws| ws.focused)
            .is_some_and(|ws| project_for_workspace(&ws.name).is_some());
        if !focused_is_project {
            return Err(ApertureError::NoActiveProject);
        }

        // Back-stack first: pop until a window that still exists. An
        // unavailable window listing must propagate; judging liveness
        // against an empty set would drain valid entries and persist the
        // emptied stack.
        let live_ids: HashSet<u32> = self
            .gateway
            .list_all_windows()?
            .into_iter()
            .map(|w| w.id)
            .collect();

        let target = self.focus_stack.pop_first_valid(|entry| live_ids.contains(&entry.window_id));
        self.persist_focus_history();

        if let Some(entry) = target {
            self.gateway.focus_window(entry.window_id)?;
            tracing::debug!(window_id = entry.window_id, "returned to previous window");
            return Ok(ExitTarget::Window(entry.window_id));
        }

        // Fallback chain: a non-project workspace with windows, then any
        // non-project workspace at all.
        let non_project: Vec<String> = workspaces
            .iter()
            .filter(|ws| !ws.focused && project_for_workspace(&ws.name).is_none())
            .map(|ws| ws.name.clone())
            .collect();

        for name in &non_project {
            let has_windows = self
                .gateway
                .list_windows_for_workspace(name)
                .map(|windows| !windows.is_empty())
                .unwrap_or(false);
            if has_windows {
                self.gateway.focus_workspace(name)?;
                tracing::debug!(workspace = %name, "fell back to populated workspace");
                return Ok(ExitTarget::Workspace(name.clone()));
            }
        }

        if let Some(name) = non_project.first() {
            self.gateway.focus_workspace(name)?;
            tracing::debug!(workspace = %name, "fell back to empty workspace");
            return Ok(ExitTarget::Workspace(name.clone()));
        }

        Err(ApertureError::NoPreviousWindow)
    }
}
