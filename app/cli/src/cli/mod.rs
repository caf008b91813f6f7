//! CLI module for Aperture.
//!
//! Parses command-line arguments, wires up logging, and dispatches to the
//! orchestration engine. All human-facing output lives here; the engine
//! below only reports outcomes and warnings.

mod commands;
mod output;

use clap::Parser;
pub use commands::Cli;

use crate::error::ApertureError;

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), ApertureError> {
    init_tracing();
    let cli = Cli::parse();
    cli.execute()
}

/// Initializes structured logging to stderr, filtered by the
/// `APERTURE_LOG` environment variable (default `warn`).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("APERTURE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
