//! Chrome tab subsystem: cold-start resolution, live capture, snapshot
//! persistence, and window launching.

pub mod capture;
pub mod launch;
pub mod resolver;
pub mod store;

pub use capture::{OsaScriptTabCapture, TabCapture};
pub use launch::{BrowserLauncher, OpenChromeLauncher};
pub use resolver::{git_remote_to_web_url, resolve, ChromeTabResolution};
pub use store::{ChromeTabSnapshot, ChromeTabStore};
