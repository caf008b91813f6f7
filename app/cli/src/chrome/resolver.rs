//! Cold-start tab resolution.
//!
//! Computes the URL set a project should open with when no live snapshot
//! exists: globally pinned URLs first, then the project's own tabs, a
//! browsable URL derived from the git remote, and the global defaults.

use crate::config::{ChromeConfig, Project};

/// The resolved cold-start tab sets for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromeTabResolution {
    /// URLs that always open, ahead of everything else.
    pub always_open_urls: Vec<String>,
    /// Remaining URLs, excluding anything already in `always_open_urls`.
    pub regular_urls: Vec<String>,
    /// `always_open_urls` followed by `regular_urls`.
    pub ordered_urls: Vec<String>,
}

/// Resolves the tab sets for a project.
///
/// Both sets are internally deduplicated preserving first occurrence, and
/// the regular set excludes anything already pinned. Resolution is
/// idempotent for identical inputs.
#[must_use]
pub fn resolve(
    config: &ChromeConfig,
    project: &Project,
    git_remote_url: Option<&str>,
) -> ChromeTabResolution {
    let always_open_urls = dedup(
        config.always_open.iter().chain(project.pinned_tabs.iter()).cloned(),
    );

    let repo_url = git_remote_url.and_then(git_remote_to_web_url);
    let regular_urls: Vec<String> = dedup(
        project
            .tabs
            .iter()
            .cloned()
            .chain(repo_url)
            .chain(config.default_tabs.iter().cloned()),
    )
    .into_iter()
    .filter(|url| !always_open_urls.contains(url))
    .collect();

    let ordered_urls =
        always_open_urls.iter().chain(regular_urls.iter()).cloned().collect();

    ChromeTabResolution { always_open_urls, regular_urls, ordered_urls }
}

/// Converts a git remote URL into a browsable https URL.
///
/// Understands `git@host:owner/repo.git`, `ssh://git@host/owner/repo.git`
/// and `https://host/owner/repo.git` forms. Returns `None` for anything it
/// cannot interpret.
#[must_use]
pub fn git_remote_to_web_url(remote: &str) -> Option<String> {
    let remote = remote.trim();

    let stripped = if let Some(rest) = remote.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        format!("{host}/{path}")
    } else if let Some(rest) = remote.strip_prefix("ssh://") {
        rest.trim_start_matches("git@").to_string()
    } else if let Some(rest) = remote
        .strip_prefix("https://")
        .or_else(|| remote.strip_prefix("http://"))
    {
        rest.to_string()
    } else {
        return None;
    };

    let stripped = stripped.trim_end_matches('/').trim_end_matches(".git");
    if stripped.is_empty() {
        return None;
    }

    Some(format!("https://{stripped}"))
}

fn dedup(urls: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.filter(|url| seen.insert(url.clone())).collect()
}
