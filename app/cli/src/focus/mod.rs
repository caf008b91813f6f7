//! Focus history: the back-stack used to return to whatever the user was
//! doing before switching projects.

pub mod stack;
pub mod store;

pub use stack::{CapturedFocus, FocusStack};
pub use store::{FocusHistoryState, FocusHistoryStore, LoadedHistory, FOCUS_HISTORY_VERSION};
