//! Engine tests, driven entirely through in-memory collaborators and
//! tempdir-backed stores.

use std::rc::Rc;

use super::testing::{
    FakeBrowser, FakeGateway, FakeIde, FakePositioner, FakeScreen, FakeTabCapture,
};
use super::{Collaborators, ExitTarget, ProjectManager, Stores};
use crate::chrome::{ChromeTabSnapshot, ChromeTabStore};
use crate::config::{
    ApertureConfig, ChromeConfig, FocusHistoryConfig, IdeFlavor, LayoutConfig, Project,
    ProjectTarget, TimingConfig, slugify,
};
use crate::constants::{CHROME_BUNDLE_ID, IDE_BUNDLE_ID};
use crate::error::ApertureError;
use crate::focus::{CapturedFocus, FocusHistoryStore};
use crate::layout::{Frame, SavedWindowFrames, ScreenMode, WindowPositionStore};

const PROJECT: &str = "my-cool-project";
const PROJECT_WS: &str = "ap-my-cool-project";

fn project(name: &str, tabs: &[&str]) -> Project {
    Project {
        id: slugify(name),
        name: name.to_string(),
        target: ProjectTarget::Local("/tmp/p".into()),
        color: None,
        ide: IdeFlavor::Stable,
        pinned_tabs: Vec::new(),
        tabs: tabs.iter().map(ToString::to_string).collect(),
        git_remote: None,
    }
}

fn config() -> ApertureConfig {
    ApertureConfig {
        projects: vec![
            project("My Cool Project", &["https://tab.example"]),
            project("Beta", &["https://beta.example"]),
        ],
        chrome: ChromeConfig::default(),
        layout: LayoutConfig::default(),
        // Keep polling tight so the never-appears paths finish quickly.
        timing: TimingConfig { focus_timeout_ms: 50, poll_interval_ms: 1, launch_timeout_ms: 30 },
        focus_history: FocusHistoryConfig::default(),
    }
}

struct Parts {
    gateway: Rc<FakeGateway>,
    ide: FakeIde,
    browser: FakeBrowser,
    tabs: FakeTabCapture,
    positioner: FakePositioner,
    screen: FakeScreen,
}

impl Default for Parts {
    fn default() -> Self {
        Self {
            gateway: Rc::new(FakeGateway::new()),
            ide: FakeIde::default(),
            browser: FakeBrowser::default(),
            tabs: FakeTabCapture::default(),
            positioner: FakePositioner::default(),
            screen: FakeScreen::default(),
        }
    }
}

struct Harness {
    gateway: Rc<FakeGateway>,
    ide: Rc<FakeIde>,
    browser: Rc<FakeBrowser>,
    positioner: Rc<FakePositioner>,
    dir: tempfile::TempDir,
    manager: ProjectManager,
}

impl Harness {
    fn from_parts(parts: Parts) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let gateway = parts.gateway;
        let ide = Rc::new(parts.ide);
        let browser = Rc::new(parts.browser);
        let tabs = Rc::new(parts.tabs);
        let positioner = Rc::new(parts.positioner);

        let stores = Stores {
            focus: FocusHistoryStore::new(
                dir.path().join("focus-history.json"),
                FocusHistoryConfig::default(),
            ),
            tabs: ChromeTabStore::new(dir.path().join("tabs")),
            positions: WindowPositionStore::new(dir.path().join("window-positions.json")),
        };
        let collaborators = Collaborators {
            gateway: Box::new(Rc::clone(&gateway)),
            ide: Box::new(Rc::clone(&ide)),
            browser: Box::new(Rc::clone(&browser)),
            tabs: Box::new(Rc::clone(&tabs)),
            positioner: Box::new(Rc::clone(&positioner)),
            screen: Box::new(parts.screen),
        };
        let manager = ProjectManager::new(config(), collaborators, stores);

        Self { gateway, ide, browser, positioner, dir, manager }
    }

    fn new() -> Self { Self::from_parts(Parts::default()) }

    /// Reopens the engine's tab store for out-of-band inspection.
    fn tab_store(&self) -> ChromeTabStore { ChromeTabStore::new(self.dir.path().join("tabs")) }

    fn focus_store(&self) -> FocusHistoryStore {
        FocusHistoryStore::new(
            self.dir.path().join("focus-history.json"),
            FocusHistoryConfig::default(),
        )
    }

    fn position_store(&self) -> WindowPositionStore {
        WindowPositionStore::new(self.dir.path().join("window-positions.json"))
    }
}

// ============================================================================
// Select: discovery and idempotence
// ============================================================================

#[tokio::test]
async fn test_select_gathers_existing_windows() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, "inbox", "AP:my-cool-project main.rs");
    harness.gateway.add_window(2, CHROME_BUNDLE_ID, "inbox", "AP:my-cool-project docs");
    let mut harness = harness;

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(!outcome.launched_ide);
    assert!(!outcome.launched_chrome);
    assert!(outcome.layout_warning.is_none());
    assert!(outcome.tab_capture_warning.is_none());
    assert_eq!(outcome.workspace, PROJECT_WS);
    assert_eq!(harness.gateway.window_workspace(1).as_deref(), Some(PROJECT_WS));
    assert_eq!(harness.gateway.window_workspace(2).as_deref(), Some(PROJECT_WS));
    assert_eq!(harness.gateway.focused_workspace_name().as_deref(), Some(PROJECT_WS));
    assert_eq!(*harness.ide.launches.borrow(), 0);
    assert!(harness.browser.launches.borrow().is_empty());
}

#[tokio::test]
async fn test_reselect_is_a_no_op() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    harness.gateway.add_window(2, CHROME_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project docs");
    harness.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = harness;

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(!outcome.launched_ide);
    assert!(!outcome.launched_chrome);
    assert_eq!(harness.gateway.move_count(), 0);
    assert_eq!(*harness.ide.launches.borrow(), 0);
    assert!(harness.browser.launches.borrow().is_empty());
}

#[tokio::test]
async fn test_select_unknown_project() {
    let mut harness = Harness::new();
    let err = harness.manager.select_project("nope", None).await.unwrap_err();
    assert!(matches!(err, ApertureError::ProjectNotFound(_)));
}

// ============================================================================
// Select: launch paths
// ============================================================================

fn launching_parts() -> Parts {
    let mut parts = Parts::default();
    let gateway = Rc::clone(&parts.gateway);
    parts.ide.on_launch = Some(Box::new(move || {
        gateway.add_window(10, IDE_BUNDLE_ID, "inbox", "AP:my-cool-project main.rs");
    }));
    let gateway = Rc::clone(&parts.gateway);
    parts.browser.on_launch = Some(Box::new(move || {
        gateway.add_window(20, CHROME_BUNDLE_ID, "inbox", "AP:my-cool-project docs");
    }));
    parts
}

#[tokio::test]
async fn test_select_launches_missing_windows() {
    let mut harness = Harness::from_parts(launching_parts());

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.launched_ide);
    assert!(outcome.launched_chrome);
    assert_eq!(*harness.ide.launches.borrow(), 1);
    assert_eq!(
        *harness.browser.launches.borrow(),
        vec![vec!["https://tab.example".to_string()]]
    );
    assert_eq!(harness.gateway.window_workspace(10).as_deref(), Some(PROJECT_WS));
    assert_eq!(harness.gateway.window_workspace(20).as_deref(), Some(PROJECT_WS));
}

#[tokio::test]
async fn test_select_restores_snapshot_urls_verbatim() {
    let harness = Harness::from_parts(launching_parts());
    harness
        .tab_store()
        .save(
            PROJECT,
            &ChromeTabSnapshot::new(vec![
                "https://restored.example/a".to_string(),
                "https://restored.example/b".to_string(),
            ]),
        )
        .unwrap();
    let mut harness = harness;

    harness.manager.select_project(PROJECT, None).await.unwrap();

    assert_eq!(
        *harness.browser.launches.borrow(),
        vec![vec![
            "https://restored.example/a".to_string(),
            "https://restored.example/b".to_string(),
        ]]
    );
}

#[tokio::test]
async fn test_chrome_launch_retries_without_urls() {
    let parts = launching_parts();
    parts.browser.fail_next(1);
    let mut harness = Harness::from_parts(parts);

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.launched_chrome);
    // The only recorded launch is the empty-URL retry.
    assert_eq!(*harness.browser.launches.borrow(), vec![Vec::<String>::new()]);
}

#[tokio::test]
async fn test_chrome_launch_double_failure_is_fatal() {
    let parts = launching_parts();
    parts.gateway.add_window(1, IDE_BUNDLE_ID, "inbox", "AP:my-cool-project main.rs");
    parts.browser.fail_next(2);
    let mut harness = Harness::from_parts(parts);

    let err = harness.manager.select_project(PROJECT, None).await.unwrap_err();

    assert!(matches!(err, ApertureError::ChromeLaunchFailed(_)));
    assert!(err.to_string().contains("empty-url retry"));
}

#[tokio::test]
async fn test_chrome_launch_failure_with_no_urls_is_fatal() {
    let parts = Parts::default();
    parts.gateway.add_window(1, IDE_BUNDLE_ID, "inbox", "AP:my-cool-project main.rs");
    parts.browser.fail_next(1);
    let mut harness = Harness::from_parts(parts);
    // No snapshot, no configured tabs: the launch URL set is empty and
    // there is nothing to retry without.
    harness.manager.config.projects[0].tabs.clear();

    let err = harness.manager.select_project(PROJECT, None).await.unwrap_err();

    assert!(matches!(err, ApertureError::ChromeLaunchFailed(_)));
    assert!(harness.browser.launches.borrow().is_empty());
}

#[tokio::test]
async fn test_move_failure_aborts_select() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, "inbox", "AP:my-cool-project main.rs");
    harness.gateway.add_window(2, CHROME_BUNDLE_ID, "inbox", "AP:my-cool-project docs");
    harness.gateway.fail_move(true);
    let mut harness = harness;

    let err = harness.manager.select_project(PROJECT, None).await.unwrap_err();

    assert!(matches!(err, ApertureError::AeroSpace(_)));
    assert!(err.to_string().contains("moving window"));
}

#[tokio::test]
async fn test_workspace_never_focusing_is_fatal() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    harness.gateway.add_window(2, CHROME_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project docs");
    harness.gateway.withhold_workspace_focus(true);
    let mut harness = harness;

    let err = harness.manager.select_project(PROJECT, None).await.unwrap_err();

    assert!(matches!(err, ApertureError::AeroSpace(_)));
    assert!(err.to_string().contains("could not be focused"));
}

#[tokio::test]
async fn test_launched_window_never_appearing_is_tolerated() {
    // Default fakes: launches succeed but no window ever materializes.
    let mut harness = Harness::new();

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.launched_ide);
    assert!(outcome.launched_chrome);
    assert_eq!(harness.gateway.move_count(), 0);
    assert_eq!(harness.gateway.focused_workspace_name().as_deref(), Some(PROJECT_WS));
}

// ============================================================================
// Select: focus history and implicit capture
// ============================================================================

#[tokio::test]
async fn test_select_persists_pre_captured_focus() {
    let mut harness = Harness::from_parts(launching_parts());

    let capture = CapturedFocus::new(42, "com.apple.mail", "mail");
    harness.manager.select_project(PROJECT, Some(capture)).await.unwrap();

    let loaded = harness.focus_store().load().unwrap();
    assert_eq!(loaded.stack.len(), 1);
    assert_eq!(loaded.stack.entries()[0].window_id, 42);
    assert_eq!(loaded.most_recent.unwrap().window_id, 42);
}

#[tokio::test]
async fn test_select_captures_previously_active_project() {
    let mut parts = launching_parts();
    parts.tabs = FakeTabCapture::returning(vec!["https://beta.example/live".to_string()]);
    parts.gateway.add_window(30, CHROME_BUNDLE_ID, "ap-beta", "AP:beta docs");
    parts.gateway.set_focused_workspace("ap-beta");
    let mut harness = Harness::from_parts(parts);

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.tab_capture_warning.is_none());
    let snapshot = harness.tab_store().load("beta").unwrap().unwrap();
    assert_eq!(snapshot.urls, vec!["https://beta.example/live"]);
}

#[tokio::test]
async fn test_select_surfaces_capture_failure_as_warning() {
    let mut parts = launching_parts();
    parts.tabs = FakeTabCapture::failing("osascript died");
    parts.gateway.set_focused_workspace("ap-beta");
    let mut harness = Harness::from_parts(parts);

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    let warning = outcome.tab_capture_warning.unwrap();
    assert!(warning.contains("tab capture failed"));
}

// ============================================================================
// Select: layout restore
// ============================================================================

#[tokio::test]
async fn test_select_restores_saved_frames() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    harness.gateway.add_window(2, CHROME_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project docs");

    let ide_frame = Frame { x: 0.0, y: 0.0, w: 2000.0, h: 1400.0 };
    let chrome_frame = Frame { x: 2000.0, y: 0.0, w: 1440.0, h: 1400.0 };
    harness
        .position_store()
        .save(
            PROJECT,
            ScreenMode::Wide,
            SavedWindowFrames { ide: Some(ide_frame), chrome: Some(chrome_frame) },
        )
        .unwrap();
    let mut harness = harness;

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.layout_warning.is_none());
    let applied = harness.positioner.applied.borrow();
    assert!(applied.contains(&(1, ide_frame)));
    assert!(applied.contains(&(2, chrome_frame)));
}

#[tokio::test]
async fn test_frame_apply_failure_is_a_warning() {
    let parts = Parts {
        positioner: FakePositioner { fail_applies: true, ..FakePositioner::default() },
        ..Parts::default()
    };
    parts.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    parts.gateway.add_window(2, CHROME_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project docs");
    let harness = Harness::from_parts(parts);
    harness
        .position_store()
        .save(
            PROJECT,
            ScreenMode::Wide,
            SavedWindowFrames {
                ide: Some(Frame { x: 0.0, y: 0.0, w: 100.0, h: 100.0 }),
                chrome: None,
            },
        )
        .unwrap();
    let mut harness = harness;

    let outcome = harness.manager.select_project(PROJECT, None).await.unwrap();

    assert!(outcome.layout_warning.is_some());
}

// ============================================================================
// Close
// ============================================================================

#[test]
fn test_close_snapshots_tabs_and_closes_workspace() {
    let mut parts = Parts::default();
    parts.tabs = FakeTabCapture::returning(vec!["https://tab.example/pr/7".to_string()]);
    parts.gateway.add_window(2, CHROME_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project docs");
    parts.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = Harness::from_parts(parts);

    let outcome = harness.manager.close_project(PROJECT).unwrap();

    assert!(outcome.tab_capture_warning.is_none());
    let snapshot = harness.tab_store().load(PROJECT).unwrap().unwrap();
    assert_eq!(snapshot.urls, vec!["https://tab.example/pr/7"]);
    // The workspace is gone; its window was evicted.
    assert_eq!(harness.gateway.window_workspace(2).as_deref(), Some("inbox"));
    assert_eq!(harness.gateway.focused_workspace_name().as_deref(), Some("inbox"));
}

#[test]
fn test_close_with_no_live_tabs_deletes_snapshot() {
    let harness = Harness::new();
    harness
        .tab_store()
        .save(PROJECT, &ChromeTabSnapshot::new(vec!["https://stale.example".to_string()]))
        .unwrap();
    let mut harness = harness;

    let outcome = harness.manager.close_project(PROJECT).unwrap();

    assert!(outcome.tab_capture_warning.is_none());
    assert!(harness.tab_store().load(PROJECT).unwrap().is_none());
}

#[test]
fn test_close_capture_failure_preserves_snapshot() {
    let mut parts = Parts::default();
    parts.tabs = FakeTabCapture::failing("osascript died");
    let harness = Harness::from_parts(parts);
    harness
        .tab_store()
        .save(PROJECT, &ChromeTabSnapshot::new(vec!["https://kept.example".to_string()]))
        .unwrap();
    let mut harness = harness;

    let outcome = harness.manager.close_project(PROJECT).unwrap();

    assert!(outcome.tab_capture_warning.unwrap().contains("tab capture failed"));
    let snapshot = harness.tab_store().load(PROJECT).unwrap().unwrap();
    assert_eq!(snapshot.urls, vec!["https://kept.example"]);
}

#[test]
fn test_close_persists_window_frames() {
    let mut parts = Parts::default();
    parts.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    let frame = Frame { x: 5.0, y: 6.0, w: 700.0, h: 800.0 };
    parts.positioner.frames.borrow_mut().insert(1, frame);
    let mut harness = Harness::from_parts(parts);

    harness.manager.close_project(PROJECT).unwrap();

    let saved = harness.position_store().load(PROJECT, ScreenMode::Wide).unwrap().unwrap();
    assert_eq!(saved.ide, Some(frame));
    assert_eq!(saved.chrome, None);
}

#[test]
fn test_close_unknown_project() {
    let mut harness = Harness::new();
    let err = harness.manager.close_project("nope").unwrap_err();
    assert!(matches!(err, ApertureError::ProjectNotFound(_)));
}

// ============================================================================
// Workspace state
// ============================================================================

#[test]
fn test_workspace_state_derivation() {
    let harness = Harness::new();
    harness.gateway.add_workspace("ap-beta");
    harness.gateway.add_workspace("mail");
    harness.gateway.set_focused_workspace(PROJECT_WS);

    let state = harness.manager.workspace_state().unwrap();

    assert_eq!(state.active_project_id.as_deref(), Some(PROJECT));
    assert_eq!(state.open_project_ids, vec!["beta", PROJECT]);
}

#[test]
fn test_workspace_state_with_non_project_focus() {
    let harness = Harness::new();
    harness.gateway.add_workspace(PROJECT_WS);
    harness.gateway.set_focused_workspace("mail");

    let state = harness.manager.workspace_state().unwrap();

    assert_eq!(state.active_project_id, None);
    assert_eq!(state.open_project_ids, vec![PROJECT]);
}

#[test]
fn test_capture_current_focus() {
    let harness = Harness::new();
    harness.gateway.add_window(5, "com.apple.mail", "mail", "Inbox");
    harness.gateway.set_focused_window(5);

    let capture = harness.manager.capture_current_focus().unwrap();
    assert_eq!(capture.window_id, 5);
    assert_eq!(capture.workspace, "mail");
}

#[test]
fn test_capture_skips_project_workspace_windows() {
    let harness = Harness::new();
    harness.gateway.add_window(1, IDE_BUNDLE_ID, PROJECT_WS, "AP:my-cool-project main.rs");
    harness.gateway.set_focused_window(1);

    assert!(harness.manager.capture_current_focus().is_none());
}

// ============================================================================
// Exit
// ============================================================================

#[test]
fn test_exit_requires_a_project_workspace() {
    let mut harness = Harness::new();
    harness.gateway.set_focused_workspace("mail");

    let err = harness.manager.exit_to_non_project_window().unwrap_err();
    assert!(matches!(err, ApertureError::NoActiveProject));
}

#[test]
fn test_exit_pops_past_stale_entries() {
    let harness = Harness::new();
    harness.gateway.add_window(2, "com.apple.mail", "mail", "Inbox");
    harness.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = harness;
    harness.manager.focus_stack.push(CapturedFocus::new(2, "com.apple.mail", "mail"));
    // Window 9 no longer exists; it must be skipped and discarded.
    harness.manager.focus_stack.push(CapturedFocus::new(9, "com.apple.mail", "mail"));

    let target = harness.manager.exit_to_non_project_window().unwrap();

    assert_eq!(target, ExitTarget::Window(2));
    assert!(harness.manager.focus_stack.is_empty());
    assert_eq!(harness.gateway.focused_workspace_name().as_deref(), Some("mail"));
    // The drained stack is persisted so stale entries stay gone.
    assert!(harness.focus_store().load().unwrap().stack.is_empty());
}

#[test]
fn test_exit_preserves_stack_when_window_listing_fails() {
    let harness = Harness::new();
    harness.gateway.add_window(7, "com.apple.mail", "mail", "Inbox");
    harness.gateway.set_focused_workspace(PROJECT_WS);
    harness.gateway.fail_list_all(true);
    let mut harness = harness;
    harness.manager.focus_stack.push(CapturedFocus::new(7, "com.apple.mail", "mail"));
    harness.manager.persist_focus_history();

    let err = harness.manager.exit_to_non_project_window().unwrap_err();

    // Liveness could not be judged; the entry must survive in memory and
    // on disk rather than being drained as stale.
    assert!(matches!(err, ApertureError::AeroSpace(_)));
    assert_eq!(harness.manager.focus_stack.len(), 1);
    assert_eq!(harness.focus_store().load().unwrap().stack.len(), 1);
}

#[test]
fn test_exit_prefers_populated_fallback_workspace() {
    let harness = Harness::new();
    harness.gateway.add_workspace("empty");
    harness.gateway.add_window(5, "com.apple.mail", "mail", "Inbox");
    harness.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = harness;

    let target = harness.manager.exit_to_non_project_window().unwrap();

    // "empty" sorts first but has no windows; "mail" wins.
    assert_eq!(target, ExitTarget::Workspace("mail".to_string()));
}

#[test]
fn test_exit_falls_back_to_empty_workspace() {
    let harness = Harness::new();
    harness.gateway.add_workspace("scratch");
    harness.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = harness;

    let target = harness.manager.exit_to_non_project_window().unwrap();
    assert_eq!(target, ExitTarget::Workspace("scratch".to_string()));
}

#[test]
fn test_exit_with_nothing_to_return_to() {
    let harness = Harness::new();
    harness.gateway.set_focused_workspace(PROJECT_WS);
    let mut harness = harness;

    let err = harness.manager.exit_to_non_project_window().unwrap_err();
    assert!(matches!(err, ApertureError::NoPreviousWindow));
}
