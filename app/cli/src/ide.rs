//! IDE launcher.
//!
//! Opens a project in VS Code (or the configured flavor). Local projects
//! open through a generated `.code-workspace` file whose `window.title`
//! embeds the project tag, so the window stays recognizable even when the
//! window manager's workspace index is stale. Remote projects open through
//! the `--remote` SSH authority. User-controlled paths and authorities are
//! always preceded by `--`.

use std::path::PathBuf;

use serde_json::json;

use crate::config::{Project, ProjectTarget};
use crate::constants::title_tag;
use crate::utils::command::run_captured;

/// Launches an IDE window for a project.
pub trait IdeLauncher {
    /// Opens a new, tagged IDE window for the project.
    ///
    /// # Errors
    ///
    /// Returns the launcher's failure text when the IDE cannot be opened.
    fn launch(&self, project: &Project) -> Result<(), String>;
}

/// Production launcher driving the `code` CLI.
#[derive(Debug, Clone)]
pub struct CodeCliLauncher {
    workspace_dir: PathBuf,
}

impl Default for CodeCliLauncher {
    fn default() -> Self { Self::new() }
}

impl CodeCliLauncher {
    /// Creates a launcher writing workspace files under the data directory.
    #[must_use]
    pub fn new() -> Self { Self { workspace_dir: crate::paths::data_dir().join("workspaces") } }

    /// Creates a launcher writing workspace files under an explicit
    /// directory.
    #[must_use]
    pub const fn with_workspace_dir(workspace_dir: PathBuf) -> Self { Self { workspace_dir } }

    /// Writes the `.code-workspace` file for a local project and returns
    /// its path.
    fn write_workspace_file(
        &self,
        project: &Project,
        path: &std::path::Path,
    ) -> Result<PathBuf, String> {
        let contents = workspace_file_contents(&project.id, path);
        let file = self.workspace_dir.join(format!("{}.code-workspace", project.id));

        std::fs::create_dir_all(&self.workspace_dir)
            .map_err(|err| format!("workspace dir: {err}"))?;
        std::fs::write(&file, contents).map_err(|err| format!("workspace file: {err}"))?;
        Ok(file)
    }
}

/// Renders the workspace file embedding the project tag in the window
/// title.
fn workspace_file_contents(project_id: &str, path: &std::path::Path) -> String {
    let document = json!({
        "folders": [{ "path": path.to_string_lossy() }],
        "settings": {
            "window.title": format!("{} ${{separator}}${{activeEditorShort}}", title_tag(project_id)),
        },
    });
    serde_json::to_string_pretty(&document).unwrap_or_default()
}

impl IdeLauncher for CodeCliLauncher {
    fn launch(&self, project: &Project) -> Result<(), String> {
        let binary = project.ide.binary();

        match &project.target {
            ProjectTarget::Local(path) => {
                let workspace_file = self.write_workspace_file(project, path)?;
                let file = workspace_file.to_string_lossy().to_string();
                tracing::debug!(project = %project.id, %file, "launching IDE");
                run_captured(binary, &["--new-window", "--", &file]).map(|_| ())
            }
            ProjectTarget::Remote { authority, path } => {
                let remote = format!("ssh-remote+{authority}");
                let target = path.as_deref().unwrap_or(".");
                tracing::debug!(project = %project.id, %remote, "launching remote IDE");
                run_captured(binary, &["--new-window", "--remote", &remote, "--", target])
                    .map(|_| ())
            }
        }
    }
}
