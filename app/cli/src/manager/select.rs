//! Project activation.
//!
//! `select_project` converges the IDE window, the browser window, and the
//! project workspace into a focused unit. The plan executes sequentially
//! (IDE before browser) so warning and error ordering is deterministic, and
//! aborts on the first irrecoverable step; the window manager has no
//! transactions, so partial moves are not rolled back.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::sleep;

use super::ProjectManager;
use crate::aerospace::WindowInfo;
use crate::chrome;
use crate::config::Project;
use crate::constants::{workspace_for_project, CHROME_BUNDLE_ID, IDE_BUNDLE_ID};
use crate::error::ApertureError;
use crate::focus::CapturedFocus;
use crate::layout::apply_with_cascade;

/// Successful activation, with any non-fatal degradations attached.
#[derive(Debug, Clone)]
pub struct SelectOutcome {
    /// The activated project id.
    pub project_id: String,
    /// The project's workspace name.
    pub workspace: String,
    /// Whether a new IDE window had to be launched.
    pub launched_ide: bool,
    /// Whether a new browser window had to be launched.
    pub launched_chrome: bool,
    /// Set when window positioning partially or fully failed.
    pub layout_warning: Option<String>,
    /// Set when the implicit capture of the previously active project
    /// failed (close-path policy).
    pub tab_capture_warning: Option<String>,
}

impl ProjectManager {
    /// Activates a project: ensure tagged IDE and browser windows exist,
    /// gather them into the project workspace, focus it, and restore saved
    /// window positions.
    ///
    /// `pre_captured_focus` is the focus captured by the caller *before*
    /// initiating the switch, since the switch itself changes focus.
    ///
    /// # Errors
    ///
    /// Returns [`ApertureError::ProjectNotFound`] for an unknown id,
    /// [`ApertureError::ChromeLaunchFailed`] when the browser cannot be
    /// launched even with an empty URL set, and
    /// [`ApertureError::AeroSpace`] when a move fails or the workspace
    /// never reports focused.
    pub async fn select_project(
        &mut self,
        project_id: &str,
        pre_captured_focus: Option<CapturedFocus>,
    ) -> Result<SelectOutcome, ApertureError> {
        let project = self
            .config
            .project(project_id)
            .cloned()
            .ok_or_else(|| ApertureError::ProjectNotFound(project_id.to_string()))?;
        let workspace = workspace_for_project(project_id);

        tracing::info!(project = project_id, "selecting project");

        if let Some(capture) = pre_captured_focus {
            self.most_recent = Some(capture.clone());
            self.focus_stack.push(capture);
            self.persist_focus_history();
        }

        // Leaving another project counts as closing it for capture
        // purposes, so its tabs and frames survive the switch.
        let mut tab_capture_warning = None;
        match self.workspace_state() {
            Ok(state) => {
                if let Some(active) = state.active_project_id {
                    if active != project_id {
                        tab_capture_warning = self.capture_project_state(&active);
                    }
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "workspace state unavailable, skipping capture");
            }
        }

        let (ide_windows, launched_ide) = self.ensure_ide_windows(&project).await?;
        let (chrome_windows, launched_chrome) = self.ensure_chrome_windows(&project).await?;

        for window in ide_windows.iter().chain(chrome_windows.iter()) {
            if window.workspace == workspace {
                continue;
            }
            self.gateway
                .move_window_to_workspace(&workspace, window.id, false)
                .map_err(|err| {
                    ApertureError::AeroSpace(format!(
                        "moving window {} into {workspace}: {err}",
                        window.id
                    ))
                })?;
        }

        self.gateway.focus_workspace(&workspace)?;
        self.await_workspace_focus(&workspace).await?;

        let layout_warning = self.restore_layout(project_id, &ide_windows, &chrome_windows);

        Ok(SelectOutcome {
            project_id: project_id.to_string(),
            workspace,
            launched_ide,
            launched_chrome,
            layout_warning,
            tab_capture_warning,
        })
    }

    // ========================================================================
    // Discover or launch
    // ========================================================================

    async fn ensure_ide_windows(
        &self,
        project: &Project,
    ) -> Result<(Vec<WindowInfo>, bool), ApertureError> {
        let known_ids = match self.tagged_windows(IDE_BUNDLE_ID, &project.id) {
            Ok(windows) if !windows.is_empty() => return Ok((windows, false)),
            Ok(_) => self.known_window_ids(IDE_BUNDLE_ID),
            Err(err) => {
                // Possibly transient; discovery is retried after launch.
                tracing::warn!(error = %err, "ide discovery failed, launching anyway");
                HashSet::new()
            }
        };

        self.ide
            .launch(project)
            .map_err(|err| ApertureError::Io(format!("IDE launch failed: {err}")))?;

        let windows = self.await_project_windows(IDE_BUNDLE_ID, &project.id, &known_ids).await?;
        Ok((windows, true))
    }

    async fn ensure_chrome_windows(
        &self,
        project: &Project,
    ) -> Result<(Vec<WindowInfo>, bool), ApertureError> {
        let known_ids = match self.tagged_windows(CHROME_BUNDLE_ID, &project.id) {
            Ok(windows) if !windows.is_empty() => return Ok((windows, false)),
            Ok(_) => self.known_window_ids(CHROME_BUNDLE_ID),
            Err(err) => {
                tracing::warn!(error = %err, "chrome discovery failed, launching anyway");
                HashSet::new()
            }
        };

        let urls = self.launch_urls(project);
        match self.browser.launch(&urls) {
            Ok(()) => {}
            Err(first_err) if !urls.is_empty() => {
                // The browser may already have a window that only needed
                // defaults; retry once with no URLs.
                tracing::warn!(error = %first_err, "chrome launch failed, retrying without urls");
                self.browser.launch(&[]).map_err(|retry_err| {
                    ApertureError::ChromeLaunchFailed(format!(
                        "{first_err}; empty-url retry: {retry_err}"
                    ))
                })?;
            }
            Err(err) => return Err(ApertureError::ChromeLaunchFailed(err)),
        }

        let windows =
            self.await_project_windows(CHROME_BUNDLE_ID, &project.id, &known_ids).await?;
        Ok((windows, true))
    }

    /// Computes the launch URL set: a persisted snapshot verbatim when one
    /// exists, otherwise the cold-start resolution. Snapshot load failure
    /// falls back to cold start rather than failing the select.
    fn launch_urls(&self, project: &Project) -> Vec<String> {
        match self.stores.tabs.load(&project.id) {
            Ok(Some(snapshot)) => {
                tracing::debug!(
                    project = %project.id,
                    urls = snapshot.urls.len(),
                    "restoring tab snapshot"
                );
                snapshot.urls
            }
            Ok(None) => self.cold_start_urls(project),
            Err(err) => {
                tracing::warn!(project = %project.id, error = %err, "snapshot unreadable");
                self.cold_start_urls(project)
            }
        }
    }

    fn cold_start_urls(&self, project: &Project) -> Vec<String> {
        chrome::resolve(&self.config.chrome, project, project.git_remote.as_deref()).ordered_urls
    }

    fn known_window_ids(&self, bundle_id: &str) -> HashSet<u32> {
        self.gateway
            .list_windows_for_app(bundle_id)
            .map(|windows| windows.into_iter().map(|w| w.id).collect())
            .unwrap_or_default()
    }

    // ========================================================================
    // Polling
    // ========================================================================

    /// Waits for a freshly launched window: either one carrying the project
    /// tag, or one whose id was unknown before the launch. A window that
    /// never appears is logged and tolerated; the switch proceeds without
    /// it.
    async fn await_project_windows(
        &self,
        bundle_id: &str,
        project_id: &str,
        known_ids: &HashSet<u32>,
    ) -> Result<Vec<WindowInfo>, ApertureError> {
        let timeout = Duration::from_millis(self.config.timing.launch_timeout_ms);
        let interval = Duration::from_millis(self.config.timing.poll_interval_ms);
        let deadline = tokio::time::Instant::now() + timeout;
        let mut discovery_errors = 0_u32;

        loop {
            match self.gateway.list_windows_for_app(bundle_id) {
                Ok(windows) => {
                    let found: Vec<WindowInfo> = windows
                        .into_iter()
                        .filter(|w| w.is_tagged_for(project_id) || !known_ids.contains(&w.id))
                        .collect();
                    if !found.is_empty() {
                        return Ok(found);
                    }
                }
                Err(err) if discovery_errors == 0 => {
                    // One transient discovery failure is retried.
                    discovery_errors += 1;
                    tracing::warn!(error = %err, "post-launch discovery failed, retrying");
                }
                Err(err) => return Err(err),
            }

            if tokio::time::Instant::now() >= deadline {
                tracing::warn!(bundle_id, project_id, "launched window never appeared");
                return Ok(Vec::new());
            }
            sleep(interval).await;
        }
    }

    /// Polls the workspace focus state until the target workspace reports
    /// focused or the timeout elapses.
    async fn await_workspace_focus(&self, workspace: &str) -> Result<(), ApertureError> {
        let timeout = Duration::from_millis(self.config.timing.focus_timeout_ms);
        let interval = Duration::from_millis(self.config.timing.poll_interval_ms);
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let focused = self
                .gateway
                .list_workspaces_with_focus()?
                .into_iter()
                .any(|ws| ws.focused && ws.name == workspace);
            if focused {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(ApertureError::AeroSpace(format!(
                    "workspace {workspace} could not be focused"
                )));
            }
            sleep(interval).await;
        }
    }

    // ========================================================================
    // Layout restore
    // ========================================================================

    /// Applies saved frames for the detected screen mode. Absent frames are
    /// a no-op; every failure along the way collapses into a warning.
    fn restore_layout(
        &self,
        project_id: &str,
        ide_windows: &[WindowInfo],
        chrome_windows: &[WindowInfo],
    ) -> Option<String> {
        let mode = self.current_screen_mode();
        let frames = match self.stores.positions.load(project_id, mode) {
            Ok(Some(frames)) => frames,
            Ok(None) => return None,
            Err(err) => return Some(format!("saved positions unreadable: {err}")),
        };

        let offset = self.config.layout.cascade_offset;
        let mut warnings = Vec::new();

        if let Some(frame) = frames.ide {
            warnings.extend(apply_with_cascade(
                self.positioner.as_ref(),
                ide_windows,
                frame,
                offset,
            ));
        }
        if let Some(frame) = frames.chrome {
            warnings.extend(apply_with_cascade(
                self.positioner.as_ref(),
                chrome_windows,
                frame,
                offset,
            ));
        }

        if warnings.is_empty() { None } else { Some(warnings.join("; ")) }
    }
}
