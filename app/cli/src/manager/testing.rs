//! In-memory collaborators for tests.
//!
//! One fake per production adapter, with interior mutability so they can be
//! driven through the same `&dyn` seams the engine uses.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::aerospace::{WindowGateway, WindowInfo, WorkspaceInfo};
use crate::chrome::{BrowserLauncher, TabCapture};
use crate::error::ApertureError;
use crate::ide::IdeLauncher;
use crate::layout::{Frame, ScreenQuery, WindowPositioner};

// ============================================================================
// Gateway
// ============================================================================

#[derive(Default)]
struct GatewayState {
    windows: Vec<WindowInfo>,
    workspaces: BTreeSet<String>,
    focused_window: Option<u32>,
    focused_workspace: Option<String>,
    fail_focus_window: bool,
    fail_move: bool,
    fail_listing: bool,
    fail_list_all: bool,
    withhold_workspace_focus: bool,
    move_count: usize,
}

/// In-memory window manager.
#[derive(Default)]
pub struct FakeGateway {
    state: RefCell<GatewayState>,
}

impl FakeGateway {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn add_window(&self, id: u32, bundle_id: &str, workspace: &str, title: &str) {
        let mut state = self.state.borrow_mut();
        state.workspaces.insert(workspace.to_string());
        state.windows.push(WindowInfo {
            id,
            app_bundle_id: bundle_id.to_string(),
            workspace: workspace.to_string(),
            title: title.to_string(),
        });
    }

    pub fn add_workspace(&self, name: &str) {
        self.state.borrow_mut().workspaces.insert(name.to_string());
    }

    pub fn set_focused_window(&self, id: u32) {
        let mut state = self.state.borrow_mut();
        state.focused_window = Some(id);
        if let Some(ws) =
            state.windows.iter().find(|w| w.id == id).map(|w| w.workspace.clone())
        {
            state.focused_workspace = Some(ws);
        }
    }

    pub fn set_focused_workspace(&self, name: &str) {
        let mut state = self.state.borrow_mut();
        state.workspaces.insert(name.to_string());
        state.focused_workspace = Some(name.to_string());
    }

    pub fn fail_focus_window(&self, fail: bool) {
        self.state.borrow_mut().fail_focus_window = fail;
    }

    pub fn fail_move(&self, fail: bool) { self.state.borrow_mut().fail_move = fail; }

    pub fn fail_listing(&self, fail: bool) { self.state.borrow_mut().fail_listing = fail; }

    /// Fails only the all-windows listing, leaving other queries working.
    pub fn fail_list_all(&self, fail: bool) { self.state.borrow_mut().fail_list_all = fail; }

    /// Makes workspace focusing succeed without actually taking focus.
    pub fn withhold_workspace_focus(&self, withhold: bool) {
        self.state.borrow_mut().withhold_workspace_focus = withhold;
    }

    #[must_use]
    pub fn move_count(&self) -> usize { self.state.borrow().move_count }

    #[must_use]
    pub fn window_workspace(&self, id: u32) -> Option<String> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.id == id)
            .map(|w| w.workspace.clone())
    }

    #[must_use]
    pub fn focused_workspace_name(&self) -> Option<String> {
        self.state.borrow().focused_workspace.clone()
    }

    fn check_listing(&self) -> Result<(), ApertureError> {
        if self.state.borrow().fail_listing {
            Err(ApertureError::AeroSpace("listing failed".to_string()))
        } else {
            Ok(())
        }
    }
}

impl WindowGateway for FakeGateway {
    fn list_windows_for_app(&self, bundle_id: &str) -> Result<Vec<WindowInfo>, ApertureError> {
        self.check_listing()?;
        Ok(self
            .state
            .borrow()
            .windows
            .iter()
            .filter(|w| w.app_bundle_id == bundle_id)
            .cloned()
            .collect())
    }

    fn list_windows_for_workspace(
        &self,
        workspace: &str,
    ) -> Result<Vec<WindowInfo>, ApertureError> {
        self.check_listing()?;
        Ok(self
            .state
            .borrow()
            .windows
            .iter()
            .filter(|w| w.workspace == workspace)
            .cloned()
            .collect())
    }

    fn list_all_windows(&self) -> Result<Vec<WindowInfo>, ApertureError> {
        self.check_listing()?;
        let state = self.state.borrow();
        if state.fail_list_all {
            return Err(ApertureError::AeroSpace("window listing failed".to_string()));
        }
        Ok(state.windows.clone())
    }

    fn focused_window(&self) -> Result<Option<WindowInfo>, ApertureError> {
        let state = self.state.borrow();
        Ok(state
            .focused_window
            .and_then(|id| state.windows.iter().find(|w| w.id == id).cloned()))
    }

    fn focus_window(&self, window_id: u32) -> Result<(), ApertureError> {
        let mut state = self.state.borrow_mut();
        if state.fail_focus_window {
            return Err(ApertureError::AeroSpace("focus failed".to_string()));
        }
        state.focused_window = Some(window_id);
        if let Some(ws) =
            state.windows.iter().find(|w| w.id == window_id).map(|w| w.workspace.clone())
        {
            state.focused_workspace = Some(ws);
        }
        Ok(())
    }

    fn move_window_to_workspace(
        &self,
        workspace: &str,
        window_id: u32,
        focus_follows: bool,
    ) -> Result<(), ApertureError> {
        let mut state = self.state.borrow_mut();
        if state.fail_move {
            return Err(ApertureError::AeroSpace("move failed".to_string()));
        }
        state.move_count += 1;
        state.workspaces.insert(workspace.to_string());
        if let Some(window) = state.windows.iter_mut().find(|w| w.id == window_id) {
            window.workspace = workspace.to_string();
        }
        if focus_follows {
            state.focused_window = Some(window_id);
            state.focused_workspace = Some(workspace.to_string());
        }
        Ok(())
    }

    fn focus_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        let mut state = self.state.borrow_mut();
        state.workspaces.insert(workspace.to_string());
        if !state.withhold_workspace_focus {
            state.focused_workspace = Some(workspace.to_string());
        }
        Ok(())
    }

    fn list_workspaces_with_focus(&self) -> Result<Vec<WorkspaceInfo>, ApertureError> {
        self.check_listing()?;
        let state = self.state.borrow();
        Ok(state
            .workspaces
            .iter()
            .map(|name| WorkspaceInfo {
                name: name.clone(),
                focused: state.focused_workspace.as_deref() == Some(name),
            })
            .collect())
    }

    fn create_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        self.state.borrow_mut().workspaces.insert(workspace.to_string());
        Ok(())
    }

    fn close_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        let mut state = self.state.borrow_mut();
        for window in &mut state.windows {
            if window.workspace == workspace {
                window.workspace = crate::constants::RESERVED_PROJECT_ID.to_string();
            }
        }
        state.workspaces.remove(workspace);
        if state.focused_workspace.as_deref() == Some(workspace) {
            state.focused_workspace = Some(crate::constants::RESERVED_PROJECT_ID.to_string());
            state.workspaces.insert(crate::constants::RESERVED_PROJECT_ID.to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Launchers and bridges
// ============================================================================

/// IDE launcher that records launches and can materialize a window in a
/// gateway-independent list for the engine's appearance poll.
#[derive(Default)]
pub struct FakeIde {
    pub launches: RefCell<usize>,
    pub fail: bool,
    /// Invoked on launch, letting tests materialize windows in the fake
    /// gateway.
    #[allow(clippy::type_complexity)]
    pub on_launch: Option<Box<dyn Fn()>>,
}

impl IdeLauncher for FakeIde {
    fn launch(&self, _project: &crate::config::Project) -> Result<(), String> {
        if self.fail {
            return Err("ide launch failed".to_string());
        }
        *self.launches.borrow_mut() += 1;
        if let Some(hook) = &self.on_launch {
            hook();
        }
        Ok(())
    }
}

/// Browser launcher that records each launch's URL set and can fail the
/// first N attempts.
#[derive(Default)]
pub struct FakeBrowser {
    pub launches: RefCell<Vec<Vec<String>>>,
    pub failures_remaining: RefCell<usize>,
    #[allow(clippy::type_complexity)]
    pub on_launch: Option<Box<dyn Fn()>>,
}

impl FakeBrowser {
    pub fn fail_next(&self, count: usize) { *self.failures_remaining.borrow_mut() = count; }
}

impl BrowserLauncher for FakeBrowser {
    fn launch(&self, urls: &[String]) -> Result<(), String> {
        let mut remaining = self.failures_remaining.borrow_mut();
        if *remaining > 0 {
            *remaining -= 1;
            return Err("chrome launch failed".to_string());
        }
        drop(remaining);
        self.launches.borrow_mut().push(urls.to_vec());
        if let Some(hook) = &self.on_launch {
            hook();
        }
        Ok(())
    }
}

/// Tab capture returning a canned result.
pub struct FakeTabCapture {
    pub result: RefCell<Result<Vec<String>, String>>,
}

impl Default for FakeTabCapture {
    fn default() -> Self { Self::returning(Vec::new()) }
}

impl FakeTabCapture {
    #[must_use]
    pub fn returning(urls: Vec<String>) -> Self { Self { result: RefCell::new(Ok(urls)) } }

    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self { result: RefCell::new(Err(message.to_string())) }
    }
}

impl TabCapture for FakeTabCapture {
    fn capture(&self, _project_id: &str) -> Result<Vec<String>, String> {
        self.result.borrow().clone()
    }
}

/// Positioner storing frames keyed by window id.
#[derive(Default)]
pub struct FakePositioner {
    pub frames: RefCell<std::collections::HashMap<u32, Frame>>,
    pub fail_reads: bool,
    pub fail_applies: bool,
    pub applied: RefCell<Vec<(u32, Frame)>>,
}

impl WindowPositioner for FakePositioner {
    fn read_frame(&self, window: &WindowInfo) -> Result<Frame, String> {
        if self.fail_reads {
            return Err("read failed".to_string());
        }
        self.frames
            .borrow()
            .get(&window.id)
            .copied()
            .ok_or_else(|| format!("no frame for window {}", window.id))
    }

    fn apply_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), String> {
        if self.fail_applies {
            return Err("apply failed".to_string());
        }
        self.applied.borrow_mut().push((window.id, frame));
        Ok(())
    }
}

/// Screen query with a fixed width.
pub struct FakeScreen {
    pub width: Result<f64, String>,
}

impl Default for FakeScreen {
    fn default() -> Self { Self { width: Ok(3440.0) } }
}

impl ScreenQuery for FakeScreen {
    fn screen_width_at(&self, _point: (f64, f64)) -> Result<f64, String> { self.width.clone() }
}

// ============================================================================
// Rc delegation
// ============================================================================

// The engine owns its collaborators behind `Box<dyn>`. Tests that need to
// assert on a fake after handing it to the engine wrap it in `Rc` and give
// the engine a clone.

impl WindowGateway for std::rc::Rc<FakeGateway> {
    fn list_windows_for_app(&self, bundle_id: &str) -> Result<Vec<WindowInfo>, ApertureError> {
        self.as_ref().list_windows_for_app(bundle_id)
    }

    fn list_windows_for_workspace(
        &self,
        workspace: &str,
    ) -> Result<Vec<WindowInfo>, ApertureError> {
        self.as_ref().list_windows_for_workspace(workspace)
    }

    fn list_all_windows(&self) -> Result<Vec<WindowInfo>, ApertureError> {
        self.as_ref().list_all_windows()
    }

    fn focused_window(&self) -> Result<Option<WindowInfo>, ApertureError> {
        self.as_ref().focused_window()
    }

    fn focus_window(&self, window_id: u32) -> Result<(), ApertureError> {
        self.as_ref().focus_window(window_id)
    }

    fn move_window_to_workspace(
        &self,
        workspace: &str,
        window_id: u32,
        focus_follows: bool,
    ) -> Result<(), ApertureError> {
        self.as_ref().move_window_to_workspace(workspace, window_id, focus_follows)
    }

    fn focus_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        self.as_ref().focus_workspace(workspace)
    }

    fn list_workspaces_with_focus(&self) -> Result<Vec<WorkspaceInfo>, ApertureError> {
        self.as_ref().list_workspaces_with_focus()
    }

    fn create_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        self.as_ref().create_workspace(workspace)
    }

    fn close_workspace(&self, workspace: &str) -> Result<(), ApertureError> {
        self.as_ref().close_workspace(workspace)
    }
}

impl IdeLauncher for std::rc::Rc<FakeIde> {
    fn launch(&self, project: &crate::config::Project) -> Result<(), String> {
        self.as_ref().launch(project)
    }
}

impl BrowserLauncher for std::rc::Rc<FakeBrowser> {
    fn launch(&self, urls: &[String]) -> Result<(), String> { self.as_ref().launch(urls) }
}

impl TabCapture for std::rc::Rc<FakeTabCapture> {
    fn capture(&self, project_id: &str) -> Result<Vec<String>, String> {
        self.as_ref().capture(project_id)
    }
}

impl WindowPositioner for std::rc::Rc<FakePositioner> {
    fn read_frame(&self, window: &WindowInfo) -> Result<Frame, String> {
        self.as_ref().read_frame(window)
    }

    fn apply_frame(&self, window: &WindowInfo, frame: Frame) -> Result<(), String> {
        self.as_ref().apply_frame(window, frame)
    }
}

impl ScreenQuery for std::rc::Rc<FakeScreen> {
    fn screen_width_at(&self, point: (f64, f64)) -> Result<f64, String> {
        self.as_ref().screen_width_at(point)
    }
}
