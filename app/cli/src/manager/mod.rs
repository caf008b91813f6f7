//! Workspace orchestration engine.
//!
//! The project manager reconciles the live state of the window manager, the
//! IDE, and the browser into one "project is active" view. It never talks
//! to the OS directly for policy decisions: it asks the gateway for current
//! truth, computes a plan, executes it step by step, and aborts on the
//! first irrecoverable step while reporting partial successes as warnings.
//!
//! An engine instance assumes single-threaded, single-in-flight use; the
//! focus back-stack is instance state and is not synchronized.

mod exit;
mod select;
#[cfg(test)]
pub mod testing;

pub use exit::ExitTarget;
pub use select::SelectOutcome;

use crate::aerospace::{AeroSpaceCli, WindowGateway, WindowInfo};
use crate::chrome::{
    BrowserLauncher, ChromeTabSnapshot, ChromeTabStore, OpenChromeLauncher, OsaScriptTabCapture,
    TabCapture,
};
use crate::config::ApertureConfig;
use crate::constants::{workspace_for_project, project_for_workspace, CHROME_BUNDLE_ID, IDE_BUNDLE_ID};
use crate::cycler::{self, CycleDirection};
use crate::error::ApertureError;
use crate::focus::{CapturedFocus, FocusHistoryStore, FocusStack};
use crate::ide::{CodeCliLauncher, IdeLauncher};
use crate::layout::{
    capture_frames, detect_mode, OsaScriptPositioner, OsaScriptScreenQuery, ScreenQuery,
    WindowPositionStore, WindowPositioner,
};

/// Swappable external collaborators.
pub struct Collaborators {
    pub gateway: Box<dyn WindowGateway>,
    pub ide: Box<dyn IdeLauncher>,
    pub browser: Box<dyn BrowserLauncher>,
    pub tabs: Box<dyn TabCapture>,
    pub positioner: Box<dyn WindowPositioner>,
    pub screen: Box<dyn ScreenQuery>,
}

impl Collaborators {
    /// Production adapters: AeroSpace CLI, `code`, `open`, and osascript
    /// bridges.
    #[must_use]
    pub fn production() -> Self {
        Self {
            gateway: Box::new(AeroSpaceCli::new()),
            ide: Box::new(CodeCliLauncher::new()),
            browser: Box::new(OpenChromeLauncher::new()),
            tabs: Box::new(OsaScriptTabCapture::new()),
            positioner: Box::new(OsaScriptPositioner::new()),
            screen: Box::new(OsaScriptScreenQuery::new()),
        }
    }
}

/// Persisted stores owned by the engine.
pub struct Stores {
    pub focus: FocusHistoryStore,
    pub tabs: ChromeTabStore,
    pub positions: WindowPositionStore,
}

impl Stores {
    /// Stores at the default data directory.
    #[must_use]
    pub fn at_default_paths(config: &ApertureConfig) -> Self {
        Self {
            focus: FocusHistoryStore::at_default_path(config.focus_history.clone()),
            tabs: ChromeTabStore::at_default_path(),
            positions: WindowPositionStore::at_default_path(),
        }
    }
}

/// Derived view of which projects are open and which is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    /// Project id of the focused project workspace, if any. A focused
    /// non-project workspace yields `None`.
    pub active_project_id: Option<String>,
    /// Ids of every project with an open workspace.
    pub open_project_ids: Vec<String>,
}

/// Result of closing a project.
#[derive(Debug, Clone, Default)]
pub struct CloseOutcome {
    /// Set when the live tab capture failed and the previous snapshot was
    /// preserved.
    pub tab_capture_warning: Option<String>,
}

/// The workspace orchestration engine.
pub struct ProjectManager {
    pub(crate) config: ApertureConfig,
    pub(crate) gateway: Box<dyn WindowGateway>,
    pub(crate) ide: Box<dyn IdeLauncher>,
    pub(crate) browser: Box<dyn BrowserLauncher>,
    pub(crate) tabs: Box<dyn TabCapture>,
    pub(crate) positioner: Box<dyn WindowPositioner>,
    pub(crate) screen: Box<dyn ScreenQuery>,
    pub(crate) stores: Stores,
    pub(crate) focus_stack: FocusStack,
    pub(crate) most_recent: Option<CapturedFocus>,
}

impl ProjectManager {
    /// Creates an engine from explicit collaborators and stores.
    ///
    /// The persisted focus history is hydrated here; an unreadable history
    /// is treated as empty rather than fatal.
    #[must_use]
    pub fn new(config: ApertureConfig, collaborators: Collaborators, stores: Stores) -> Self {
        let (focus_stack, most_recent) = match stores.focus.load() {
            Ok(loaded) => (loaded.stack, loaded.most_recent),
            Err(err) => {
                tracing::warn!(error = %err, "focus history unreadable, starting empty");
                (FocusStack::new(config.focus_history.max_entries), None)
            }
        };

        Self {
            gateway: collaborators.gateway,
            ide: collaborators.ide,
            browser: collaborators.browser,
            tabs: collaborators.tabs,
            positioner: collaborators.positioner,
            screen: collaborators.screen,
            stores,
            focus_stack,
            most_recent,
            config,
        }
    }

    /// Creates a production engine.
    #[must_use]
    pub fn production(config: ApertureConfig) -> Self {
        let stores = Stores::at_default_paths(&config);
        Self::new(config, Collaborators::production(), stores)
    }

    /// Derives the workspace state from current `ap-*` workspace names.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the gateway fails.
    pub fn workspace_state(&self) -> Result<WorkspaceState, ApertureError> {
        let workspaces = self.gateway.list_workspaces_with_focus()?;

        let open_project_ids = workspaces
            .iter()
            .filter_map(|ws| project_for_workspace(&ws.name))
            .map(ToString::to_string)
            .collect();

        let active_project_id = workspaces
            .iter()
            .find(|ws| ws.focused)
            .and_then(|ws| project_for_workspace(&ws.name))
            .map(ToString::to_string);

        Ok(WorkspaceState { active_project_id, open_project_ids })
    }

    /// Closes a project: snapshot its tabs, persist its window frames, then
    /// close its workspace.
    ///
    /// Tab capture failure and frame persistence failure are downgraded to
    /// a warning and a log line respectively; only the workspace close can
    /// fail the call.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::ProjectNotFound`] for an unknown id and
    /// [`ApertureError::AeroSpace`] when the workspace close fails.
    pub fn close_project(&mut self, project_id: &str) -> Result<CloseOutcome, ApertureError> {
        if self.config.project(project_id).is_none() {
            return Err(ApertureError::ProjectNotFound(project_id.to_string()));
        }

        let tab_capture_warning = self.capture_project_state(project_id);

        let workspace = workspace_for_project(project_id);
        self.gateway.close_workspace(&workspace).map_err(|err| {
            ApertureError::AeroSpace(format!("closing workspace {workspace}: {err}"))
        })?;

        tracing::info!(project = project_id, "project closed");
        Ok(CloseOutcome { tab_capture_warning })
    }

    /// Cycles focus within the active workspace (one-shot alt-tab).
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::AeroSpace`] when the gateway fails.
    pub fn cycle_focus(
        &self,
        direction: CycleDirection,
    ) -> Result<Option<WindowInfo>, ApertureError> {
        cycler::cycle_focus(self.gateway.as_ref(), direction)
    }

    /// Captures the currently focused window for the back-stack. Windows
    /// already sitting in a project workspace are not captured; exiting
    /// should land outside project land.
    #[must_use]
    pub fn capture_current_focus(&self) -> Option<CapturedFocus> {
        match self.gateway.focused_window() {
            Ok(Some(window)) if project_for_workspace(&window.workspace).is_none() => {
                Some(CapturedFocus::new(window.id, window.app_bundle_id, window.workspace))
            }
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "focused window unavailable, nothing to capture");
                None
            }
        }
    }

    // ========================================================================
    // Shared close-path capture
    // ========================================================================

    /// Captures a project's live tabs and window frames, applying the
    /// persistence policy: non-empty capture overwrites the snapshot, an
    /// empty capture deletes it, and a failed capture preserves it and
    /// yields a warning. Frame persistence failures are logged and ignored.
    pub(crate) fn capture_project_state(&self, project_id: &str) -> Option<String> {
        let tab_warning = match self.tabs.capture(project_id) {
            Ok(urls) if urls.is_empty() => {
                // The window is gone; stale data must not resurrect.
                if let Err(err) = self.stores.tabs.delete(project_id) {
                    tracing::warn!(project = project_id, error = %err, "snapshot delete failed");
                }
                None
            }
            Ok(urls) => {
                let snapshot = ChromeTabSnapshot::new(urls);
                match self.stores.tabs.save(project_id, &snapshot) {
                    Ok(()) => None,
                    Err(err) => Some(format!("tab snapshot not saved: {err}")),
                }
            }
            Err(err) => {
                tracing::warn!(project = project_id, error = %err, "tab capture failed");
                Some(format!("tab capture failed: {err}"))
            }
        };

        self.capture_window_frames(project_id);
        tab_warning
    }

    fn capture_window_frames(&self, project_id: &str) {
        let ide_window = match self.tagged_windows(IDE_BUNDLE_ID, project_id) {
            Ok(windows) => windows.into_iter().next(),
            Err(err) => {
                tracing::warn!(error = %err, "ide window discovery failed during capture");
                None
            }
        };
        let chrome_window = match self.tagged_windows(CHROME_BUNDLE_ID, project_id) {
            Ok(windows) => windows.into_iter().next(),
            Err(err) => {
                tracing::warn!(error = %err, "chrome window discovery failed during capture");
                None
            }
        };

        let frames =
            capture_frames(self.positioner.as_ref(), ide_window.as_ref(), chrome_window.as_ref());
        if frames.is_empty() {
            return;
        }

        let mode = self.current_screen_mode();
        if let Err(err) = self.stores.positions.save(project_id, mode, frames) {
            // Close must not fail due to a storage-layer problem.
            tracing::warn!(project = project_id, error = %err, "frame save failed");
        }
    }

    /// Detects the screen mode for the current operation.
    pub(crate) fn current_screen_mode(&self) -> crate::layout::ScreenMode {
        detect_mode(
            self.screen.as_ref(),
            (0.0, 0.0),
            self.config.layout.small_screen_max_width,
        )
    }

    /// Lists windows of an app that belong to a project, recognized either
    /// by workspace membership or by the title tag (for when the workspace
    /// index is stale).
    pub(crate) fn tagged_windows(
        &self,
        bundle_id: &str,
        project_id: &str,
    ) -> Result<Vec<WindowInfo>, ApertureError> {
        let workspace = workspace_for_project(project_id);
        Ok(self
            .gateway
            .list_windows_for_app(bundle_id)?
            .into_iter()
            .filter(|w| w.workspace == workspace || w.is_tagged_for(project_id))
            .collect())
    }

    /// Persists the focus back-stack, logging instead of failing: losing
    /// history is less harmful than blocking a switch.
    pub(crate) fn persist_focus_history(&self) {
        if let Err(err) = self.stores.focus.save(&self.focus_stack, self.most_recent.as_ref()) {
            tracing::warn!(error = %err, "focus history not saved");
        }
    }
}

#[cfg(test)]
mod tests;
