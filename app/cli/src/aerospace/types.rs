//! Gateway data types.

use serde::Deserialize;

/// A window as reported by the window manager.
///
/// Windows are transient facts: they are queried fresh on every operation
/// and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowInfo {
    /// Opaque window id.
    #[serde(rename = "window-id")]
    pub id: u32,
    /// Bundle identifier of the owning application.
    #[serde(rename = "app-bundle-id")]
    pub app_bundle_id: String,
    /// Workspace the window currently belongs to.
    #[serde(rename = "workspace", default)]
    pub workspace: String,
    /// Current window title.
    #[serde(rename = "window-title", default)]
    pub title: String,
}

impl WindowInfo {
    /// Whether this window carries the title tag of the given project.
    #[must_use]
    pub fn is_tagged_for(&self, project_id: &str) -> bool {
        self.title.contains(&crate::constants::title_tag(project_id))
    }
}

/// A workspace name plus whether it is currently focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// Workspace name.
    pub name: String,
    /// Whether this workspace currently has focus.
    pub focused: bool,
}
