//! Configuration types and validation.
//!
//! The configuration file is TOML. Raw deserialized values are validated
//! into [`ApertureConfig`], which is what the rest of the application
//! consumes. Project ids are never written in the file; they are derived
//! deterministically from the project name.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

use crate::constants::RESERVED_PROJECT_ID;

/// Where a project's code lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectTarget {
    /// A directory on the local machine.
    Local(PathBuf),
    /// An SSH authority (`user@host`) plus an optional remote path.
    Remote { authority: String, path: Option<String> },
}

/// Which IDE binary a project opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdeFlavor {
    /// Stable VS Code (`code`).
    #[default]
    Stable,
    /// VS Code Insiders (`code-insiders`).
    Insiders,
}

impl IdeFlavor {
    /// The CLI binary name for this flavor.
    #[must_use]
    pub const fn binary(self) -> &'static str {
        match self {
            Self::Stable => "code",
            Self::Insiders => "code-insiders",
        }
    }
}

/// A validated project definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Normalized slug, unique across the configuration.
    pub id: String,
    /// Display name as written in the configuration file.
    pub name: String,
    /// Local path or SSH remote.
    pub target: ProjectTarget,
    /// Accent color, passed through to consumers verbatim.
    pub color: Option<String>,
    /// IDE flavor to launch.
    pub ide: IdeFlavor,
    /// Tabs that should always open for this project, ahead of everything
    /// else.
    pub pinned_tabs: Vec<String>,
    /// Regular tabs for a cold start.
    pub tabs: Vec<String>,
    /// Git remote URL, used to derive a browsable repository tab.
    pub git_remote: Option<String>,
}

/// Global Chrome tab settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChromeConfig {
    /// URLs opened for every project, ahead of project tabs.
    pub always_open: Vec<String>,
    /// URLs appended to every project's cold-start tab set.
    pub default_tabs: Vec<String>,
}

/// Window layout settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Screens at or below this physical width (in points) are classified
    /// as `small`.
    pub small_screen_max_width: f64,
    /// Offset applied to each additional window of the same app so
    /// overlapping windows stay discoverable.
    pub cascade_offset: (f64, f64),
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { small_screen_max_width: 1800.0, cascade_offset: (32.0, 28.0) }
    }
}

/// Poll/timeout tuning for the select path.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// How long to wait for the target workspace to report focused.
    pub focus_timeout_ms: u64,
    /// Interval between workspace-focus polls.
    pub poll_interval_ms: u64,
    /// How long to wait for a freshly launched window to appear.
    pub launch_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { focus_timeout_ms: 5000, poll_interval_ms: 200, launch_timeout_ms: 10_000 }
    }
}

/// Focus history retention settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FocusHistoryConfig {
    /// Maximum number of retained entries.
    pub max_entries: usize,
    /// Entries older than this many seconds are pruned on load.
    pub max_age_secs: i64,
}

impl Default for FocusHistoryConfig {
    fn default() -> Self { Self { max_entries: 20, max_age_secs: 12 * 60 * 60 } }
}

/// The validated application configuration.
#[derive(Debug, Clone, Default)]
pub struct ApertureConfig {
    /// Ordered project list, as written in the file.
    pub projects: Vec<Project>,
    /// Global Chrome settings.
    pub chrome: ChromeConfig,
    /// Layout settings.
    pub layout: LayoutConfig,
    /// Timing settings.
    pub timing: TimingConfig,
    /// Focus history retention.
    pub focus_history: FocusHistoryConfig,
}

impl ApertureConfig {
    /// Look up a project by id.
    #[must_use]
    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }
}

// ============================================================================
// Raw (on-disk) representation
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawConfig {
    #[serde(default)]
    pub projects: Vec<RawProject>,
    #[serde(default)]
    pub chrome: ChromeConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub focus_history: FocusHistoryConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawProject {
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub remote: Option<String>,
    #[serde(default)]
    pub remote_path: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub insiders: bool,
    #[serde(default)]
    pub pinned_tabs: Vec<String>,
    #[serde(default)]
    pub tabs: Vec<String>,
    #[serde(default)]
    pub git_remote: Option<String>,
}

/// Derive a project id from its name: lowercase, non-alphanumeric runs
/// become a single hyphen, leading/trailing hyphens are trimmed.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(ch.to_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

impl RawConfig {
    /// Validate the raw configuration into an [`ApertureConfig`].
    pub(crate) fn validate(self) -> Result<ApertureConfig, String> {
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut projects = Vec::with_capacity(self.projects.len());

        for raw in self.projects {
            let id = slugify(&raw.name);
            if id.is_empty() {
                return Err(format!("project '{}' yields an empty id", raw.name));
            }
            if id == RESERVED_PROJECT_ID {
                return Err(format!(
                    "project '{}' uses the reserved id '{RESERVED_PROJECT_ID}'",
                    raw.name
                ));
            }
            if !seen_ids.insert(id.clone()) {
                return Err(format!("duplicate project id '{id}'"));
            }

            let target = match (raw.path, raw.remote) {
                (Some(path), None) => ProjectTarget::Local(expand_tilde(&path)),
                (None, Some(authority)) => {
                    ProjectTarget::Remote { authority, path: raw.remote_path }
                }
                (Some(_), Some(_)) => {
                    return Err(format!(
                        "project '{}' sets both path and remote; pick one",
                        raw.name
                    ));
                }
                (None, None) => {
                    return Err(format!(
                        "project '{}' needs either path or remote",
                        raw.name
                    ));
                }
            };

            projects.push(Project {
                id,
                name: raw.name,
                target,
                color: raw.color,
                ide: if raw.insiders { IdeFlavor::Insiders } else { IdeFlavor::Stable },
                pinned_tabs: raw.pinned_tabs,
                tabs: raw.tabs,
                git_remote: raw.git_remote,
            });
        }

        Ok(ApertureConfig {
            projects,
            chrome: self.chrome,
            layout: self.layout,
            timing: self.timing,
            focus_history: self.focus_history,
        })
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
