//! CLI command definitions using Clap.

use std::io;
use std::path::Path;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Generator, Shell, generate};
use serde_json::json;

use super::output;
use crate::config::{self, ApertureConfig, ProjectTarget};
use crate::cycler::CycleDirection;
use crate::error::ApertureError;
use crate::manager::{ExitTarget, ProjectManager, SelectOutcome};
use crate::utils::command::resolve_binary;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Aperture CLI - project-centric workspace switching for AeroSpace.
#[derive(Parser, Debug)]
#[command(name = "aperture")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default `~/.config/aperture/config.toml`.
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Switch to a project.
    ///
    /// Ensures the project's IDE and Chrome windows exist (launching them if
    /// needed), gathers them into the project workspace, focuses it, and
    /// restores saved window positions.
    Select {
        /// Project id, as derived from the configured project name.
        project: String,
    },

    /// Close a project.
    ///
    /// Snapshots the project's Chrome tabs and window positions, then closes
    /// its workspace. Without an argument, closes the active project.
    Close {
        /// Project id. Defaults to the active project.
        project: Option<String>,
    },

    /// Return to whatever was focused before switching into project land.
    ///
    /// Walks the focus back-stack, skipping windows that no longer exist,
    /// and falls back to a non-project workspace.
    Exit,

    /// Cycle window focus within the focused workspace.
    Cycle {
        /// Cycle direction.
        #[arg(value_enum, default_value_t = CycleArg::Next)]
        direction: CycleArg,
    },

    /// Show the active project and all open projects.
    State {
        /// Output in JSON format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// List configured projects.
    List {
        /// Output in JSON format.
        #[arg(long, short = 'j')]
        json: bool,
    },

    /// Check that external tools and the configuration are usable.
    Doctor,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(aperture completions --shell zsh)"
    ///   aperture completions --shell fish > ~/.config/fish/completions/aperture.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// Cycle direction argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CycleArg {
    /// Cycle forward.
    Next,
    /// Cycle backward.
    #[value(alias = "prev")]
    Previous,
}

impl From<CycleArg> for CycleDirection {
    fn from(arg: CycleArg) -> Self {
        match arg {
            CycleArg::Next => Self::Next,
            CycleArg::Previous => Self::Previous,
        }
    }
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), ApertureError> {
        match &self.command {
            Commands::Select { project } => self.run_select(project),
            Commands::Close { project } => self.run_close(project.as_deref()),
            Commands::Exit => self.run_exit(),
            Commands::Cycle { direction } => self.run_cycle(*direction),
            Commands::State { json } => self.run_state(*json),
            Commands::List { json } => self.run_list(*json),
            Commands::Doctor => self.run_doctor(),
            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    fn load_config(&self) -> Result<ApertureConfig, ApertureError> {
        self.config
            .as_ref()
            .map_or_else(config::load, |path| config::load_from_path(Path::new(path)))
    }

    fn manager(&self) -> Result<ProjectManager, ApertureError> {
        Ok(ProjectManager::production(self.load_config()?))
    }

    fn run_select(&self, project: &str) -> Result<(), ApertureError> {
        let mut manager = self.manager()?;

        // Capture focus before the switch disturbs it.
        let capture = manager.capture_current_focus();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|err| ApertureError::Io(err.to_string()))?;
        let outcome = runtime.block_on(manager.select_project(project, capture))?;

        report_select(&outcome);
        Ok(())
    }

    fn run_close(&self, project: Option<&str>) -> Result<(), ApertureError> {
        let mut manager = self.manager()?;

        let id = match project {
            Some(id) => id.to_string(),
            None => manager
                .workspace_state()?
                .active_project_id
                .ok_or(ApertureError::NoActiveProject)?,
        };

        let outcome = manager.close_project(&id)?;
        if let Some(warning) = &outcome.tab_capture_warning {
            output::warning(warning);
        }
        output::success(&format!("Closed {id}"));
        Ok(())
    }

    fn run_exit(&self) -> Result<(), ApertureError> {
        let mut manager = self.manager()?;

        match manager.exit_to_non_project_window()? {
            ExitTarget::Window(id) => output::success(&format!("Returned to window {id}")),
            ExitTarget::Workspace(name) => {
                output::success(&format!("Returned to workspace {name}"));
            }
        }
        Ok(())
    }

    fn run_cycle(&self, direction: CycleArg) -> Result<(), ApertureError> {
        let manager = self.manager()?;

        match manager.cycle_focus(direction.into())? {
            Some(window) => output::success(&format!("Focused {}", window.title)),
            None => output::warning("Nothing to cycle in the focused workspace"),
        }
        Ok(())
    }

    fn run_state(&self, json: bool) -> Result<(), ApertureError> {
        let manager = self.manager()?;
        let state = manager.workspace_state()?;

        if json {
            output::print_json(&json!({
                "activeProject": state.active_project_id,
                "openProjects": state.open_project_ids,
            }));
            return Ok(());
        }

        match &state.active_project_id {
            Some(id) => println!("Active: {id}"),
            None => println!("Active: (none)"),
        }
        if state.open_project_ids.is_empty() {
            println!("Open:   (none)");
        } else {
            println!("Open:   {}", state.open_project_ids.join(", "));
        }
        Ok(())
    }

    fn run_list(&self, json: bool) -> Result<(), ApertureError> {
        let config = self.load_config()?;

        if json {
            let projects: Vec<serde_json::Value> = config
                .projects
                .iter()
                .map(|p| {
                    json!({
                        "id": p.id,
                        "name": p.name,
                        "target": format_target(&p.target),
                        "color": p.color,
                    })
                })
                .collect();
            output::print_json(&json!({ "projects": projects }));
            return Ok(());
        }

        for project in &config.projects {
            println!(
                "{} {:<24} {:<28} {}",
                output::project_marker(project.color.as_deref()),
                project.id,
                project.name,
                format_target(&project.target),
            );
        }
        Ok(())
    }

    fn run_doctor(&self) -> Result<(), ApertureError> {
        let mut failures = 0_usize;

        let config = match self.load_config() {
            Ok(config) => {
                output::check("config", true, &format!("{} project(s)", config.projects.len()));
                Some(config)
            }
            Err(err) => {
                failures += 1;
                output::check("config", false, &err.to_string());
                None
            }
        };

        for binary in required_binaries(config.as_ref()) {
            match resolve_binary(&binary) {
                Ok(path) => output::check(&binary, true, &path.display().to_string()),
                Err(err) => {
                    failures += 1;
                    output::check(&binary, false, &err);
                }
            }
        }

        let data_dir = crate::paths::data_dir();
        match std::fs::create_dir_all(&data_dir) {
            Ok(()) => output::check("data dir", true, &data_dir.display().to_string()),
            Err(err) => {
                failures += 1;
                output::check("data dir", false, &format!("{}: {err}", data_dir.display()));
            }
        }

        if failures == 0 {
            Ok(())
        } else {
            Err(ApertureError::Io(format!("{failures} check(s) failed")))
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "aperture", &mut io::stdout());
    }
}

/// Reports a select outcome: warnings to stderr, then one success line.
fn report_select(outcome: &SelectOutcome) {
    if let Some(warning) = &outcome.tab_capture_warning {
        output::warning(warning);
    }
    if let Some(warning) = &outcome.layout_warning {
        output::warning(warning);
    }

    let mut notes = Vec::new();
    if outcome.launched_ide {
        notes.push("launched IDE");
    }
    if outcome.launched_chrome {
        notes.push("launched Chrome");
    }

    if notes.is_empty() {
        output::success(&format!("Switched to {}", outcome.project_id));
    } else {
        output::success(&format!("Switched to {} ({})", outcome.project_id, notes.join(", ")));
    }
}

fn format_target(target: &ProjectTarget) -> String {
    match target {
        ProjectTarget::Local(path) => path.display().to_string(),
        ProjectTarget::Remote { authority, path } => path
            .as_ref()
            .map_or_else(|| authority.clone(), |p| format!("{authority}:{p}")),
    }
}

/// Tools the production adapters shell out to, plus every configured IDE
/// flavor.
fn required_binaries(config: Option<&ApertureConfig>) -> Vec<String> {
    let mut binaries = vec!["aerospace".to_string(), "osascript".to_string(), "open".to_string()];

    if let Some(config) = config {
        for project in &config.projects {
            let binary = project.ide.binary().to_string();
            if !binaries.contains(&binary) {
                binaries.push(binary);
            }
        }
    }

    binaries
}
