//! External command helpers.
//!
//! Aperture drives everything through external tools (`aerospace`, `code`,
//! `open`, `osascript`). This module locates those binaries and runs them
//! with captured output, so failures can be reported with the tool's exit
//! code and stderr attached.

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Resolve the absolute path to an executable binary.
///
/// Absolute paths are validated directly. Otherwise the binary is searched
/// in: directories from the `APERTURE_EXTRA_PATHS` env var (colon-separated),
/// the process `PATH`, and a curated list of directories commonly used on
/// macOS for user-installed tools.
///
/// # Errors
///
/// Returns `Err` with a descriptive reason when the binary cannot be found
/// or is not executable.
pub fn resolve_binary(binary: &str) -> Result<PathBuf, String> {
    if binary.is_empty() {
        return Err("Binary name cannot be empty".to_string());
    }

    let candidate = Path::new(binary);
    if candidate.is_absolute() {
        return if is_executable(candidate) {
            Ok(candidate.to_path_buf())
        } else {
            Err(format!("Binary at {} is not executable", candidate.display()))
        };
    }

    let mut search_paths = Vec::new();

    if let Ok(extra) = env::var("APERTURE_EXTRA_PATHS") {
        search_paths.extend(extra.split(':').map(PathBuf::from));
    }

    if let Some(path_var) = env::var_os("PATH") {
        search_paths.extend(env::split_paths(&path_var));
    }

    // Common locations where macOS users install CLI tools (Homebrew, Cargo).
    search_paths.extend([
        PathBuf::from("/usr/local/bin"),
        PathBuf::from("/opt/homebrew/bin"),
        PathBuf::from("/opt/homebrew/sbin"),
    ]);

    if let Some(home) = env::var_os("HOME").map(PathBuf::from) {
        search_paths.push(home.join(".cargo/bin"));
        search_paths.push(home.join(".local/bin"));
    }

    for directory in search_paths {
        if directory.as_os_str().is_empty() {
            continue;
        }

        let candidate_path = directory.join(binary);
        if is_executable(&candidate_path) {
            return Ok(candidate_path);
        }
    }

    Err(format!(
        "Unable to locate executable '{binary}' in known search paths"
    ))
}

/// Runs a command with captured output and returns trimmed stdout.
///
/// # Errors
///
/// Returns `Err` when the binary cannot be resolved, the process cannot be
/// spawned, or it exits non-zero. The error message includes the exit code
/// and stderr of the failing invocation.
pub fn run_captured(binary: &str, args: &[&str]) -> Result<String, String> {
    let path = resolve_binary(binary)?;

    tracing::trace!(binary, ?args, "running external command");

    let output = Command::new(&path)
        .args(args)
        .output()
        .map_err(|err| format!("failed to spawn {binary}: {err}"))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    } else {
        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!("{binary} exited with {code}: {}", stderr.trim()))
    }
}

fn is_executable(path: &Path) -> bool {
    use std::fs;

    if !path.exists() {
        return false;
    }

    match fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_file() {
                return false;
            }

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                metadata.permissions().mode() & 0o111 != 0
            }

            #[cfg(not(unix))]
            {
                true
            }
        }
        Err(_) => false,
    }
}
