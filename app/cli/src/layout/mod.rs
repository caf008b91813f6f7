//! Window position subsystem: screen mode detection, frame persistence,
//! and frame capture/restore.

pub mod positioner;
pub mod screen_mode;
pub mod store;

pub use positioner::{
    apply_with_cascade, capture_frames, OsaScriptPositioner, WindowPositioner,
};
pub use screen_mode::{detect_mode, OsaScriptScreenQuery, ScreenMode, ScreenQuery};
pub use store::{Frame, SavedWindowFrames, WindowPositionStore, WINDOW_POSITIONS_VERSION};
