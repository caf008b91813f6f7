//! In-workspace window cycling (alt-tab style).
//!
//! A session snapshots the current workspace's window list, then moves a
//! selection circularly until it is committed (focus the selection) or
//! cancelled (refocus the anchor). The one-shot [`cycle_focus`] performs
//! start plus commit in a single call.

use crate::aerospace::{WindowGateway, WindowInfo};
use crate::error::ApertureError;

/// Direction to move the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleDirection {
    Next,
    Previous,
}

/// An in-progress cycling session. Dropping a session without committing or
/// cancelling leaves focus untouched.
#[derive(Debug, Clone)]
pub struct CyclerSession {
    /// The window that was focused when the session started.
    pub initial_window_id: u32,
    candidates: Vec<WindowInfo>,
    selected: usize,
}

impl CyclerSession {
    /// The currently selected candidate.
    #[must_use]
    pub fn selection(&self) -> &WindowInfo { &self.candidates[self.selected] }

    /// All candidates, in workspace enumeration order at session start.
    #[must_use]
    pub fn candidates(&self) -> &[WindowInfo] { &self.candidates }

    /// Moves the selection circularly from the current selection.
    pub fn advance(&mut self, direction: CycleDirection) {
        self.selected = step(self.selected, self.candidates.len(), direction);
    }
}

const fn step(index: usize, len: usize, direction: CycleDirection) -> usize {
    match direction {
        CycleDirection::Next => (index + 1) % len,
        CycleDirection::Previous => {
            if index == 0 { len - 1 } else { index - 1 }
        }
    }
}

/// Starts a cycling session in the focused workspace.
///
/// Returns `None` when there is nothing to cycle: no focused window, the
/// focused window is missing from its workspace enumeration, or the
/// workspace has at most one window.
///
/// # Errors
///
/// Returns [`ApertureError::AeroSpace`] when the gateway fails.
pub fn start_session(
    gateway: &dyn WindowGateway,
    direction: CycleDirection,
) -> Result<Option<CyclerSession>, ApertureError> {
    let Some(focused) = gateway.focused_window()? else {
        tracing::debug!("cycle: no focused window");
        return Ok(None);
    };

    let candidates = gateway.list_windows_for_workspace(&focused.workspace)?;
    if candidates.len() <= 1 {
        tracing::debug!("cycle: nothing to cycle");
        return Ok(None);
    }

    let Some(index) = candidates.iter().position(|w| w.id == focused.id) else {
        tracing::debug!(window_id = focused.id, "cycle: focused window not in workspace list");
        return Ok(None);
    };

    let selected = step(index, candidates.len(), direction);
    Ok(Some(CyclerSession { initial_window_id: focused.id, candidates, selected }))
}

/// Commits the session by focusing the selected candidate.
///
/// On failure the session (and its selection) is handed back unchanged.
///
/// # Errors
///
/// Returns the session and [`ApertureError::AeroSpace`] when focusing
/// fails.
pub fn commit_selection(
    gateway: &dyn WindowGateway,
    session: CyclerSession,
) -> Result<WindowInfo, (CyclerSession, ApertureError)> {
    let target = session.selection().clone();
    match gateway.focus_window(target.id) {
        Ok(()) => Ok(target),
        Err(err) => Err((session, err)),
    }
}

/// Cancels the session by refocusing the window that was focused when the
/// session started.
///
/// # Errors
///
/// Returns [`ApertureError::AeroSpace`] when focusing fails.
pub fn cancel_session(
    gateway: &dyn WindowGateway,
    session: &CyclerSession,
) -> Result<(), ApertureError> {
    gateway.focus_window(session.initial_window_id)
}

/// One-shot cycle: start a session and immediately commit it.
///
/// Returns the newly focused window, or `None` when there was nothing to
/// cycle.
///
/// # Errors
///
/// Returns [`ApertureError::AeroSpace`] when the gateway fails.
pub fn cycle_focus(
    gateway: &dyn WindowGateway,
    direction: CycleDirection,
) -> Result<Option<WindowInfo>, ApertureError> {
    match start_session(gateway, direction)? {
        Some(session) => commit_selection(gateway, session)
            .map(Some)
            .map_err(|(_, err)| err),
        None => Ok(None),
    }
}
