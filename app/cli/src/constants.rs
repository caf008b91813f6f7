//! Shared constants.

/// Directory name used for configuration and persisted state.
pub const APP_DIR_NAME: &str = "aperture";

/// Prefix for workspaces owned by a project. A project `foo` lives in the
/// AeroSpace workspace `ap-foo`.
pub const WORKSPACE_PREFIX: &str = "ap-";

/// Title prefix applied to windows belonging to a project. Used to recognize
/// project windows even when the window manager's workspace index is stale.
pub const TITLE_TAG_PREFIX: &str = "AP:";

/// Project id that can never be configured. The inbox workspace is reserved
/// for untagged windows.
pub const RESERVED_PROJECT_ID: &str = "inbox";

/// Bundle identifier of the managed IDE.
pub const IDE_BUNDLE_ID: &str = "com.microsoft.VSCode";

/// Bundle identifier of the managed browser.
pub const CHROME_BUNDLE_ID: &str = "com.google.Chrome";

/// Returns the workspace name for a project id.
#[must_use]
pub fn workspace_for_project(project_id: &str) -> String {
    format!("{WORKSPACE_PREFIX}{project_id}")
}

/// Returns the project id encoded in a workspace name, if it is a project
/// workspace.
#[must_use]
pub fn project_for_workspace(workspace: &str) -> Option<&str> {
    workspace.strip_prefix(WORKSPACE_PREFIX).filter(|id| !id.is_empty())
}

/// Returns the window title tag for a project id.
#[must_use]
pub fn title_tag(project_id: &str) -> String {
    format!("{TITLE_TAG_PREFIX}{project_id}")
}
