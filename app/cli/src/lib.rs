//! Aperture - project-centric workspace switching for the AeroSpace tiling
//! window manager.
//!
//! One command takes a configured project from "somewhere on the machine" to
//! "focused, laid out, and populated": the IDE and Chrome windows are
//! discovered or launched, gathered into a dedicated `ap-*` workspace, and
//! positioned from the last saved layout. Leaving a project snapshots its
//! Chrome tabs and window frames so the next visit picks up where the last
//! one ended.

pub mod aerospace;
pub mod chrome;
pub mod cli;
pub mod config;
pub mod constants;
pub mod cycler;
pub mod error;
pub mod focus;
pub mod ide;
pub mod layout;
pub mod manager;
pub mod paths;

mod utils;

pub use error::ApertureError;
pub use manager::ProjectManager;
