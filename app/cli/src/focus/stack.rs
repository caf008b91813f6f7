//! In-memory focus back-stack.
//!
//! A bounded LIFO of previously focused windows. Pushes deduplicate only
//! against the immediately preceding entry; overflow evicts the oldest entry
//! (FIFO eviction under LIFO access). Entries are immutable once pushed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A focus observation captured before a project switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedFocus {
    /// Window id at capture time.
    pub window_id: u32,
    /// Bundle id of the owning app.
    pub app_bundle_id: String,
    /// Workspace the window was in.
    pub workspace: String,
    /// When the capture happened.
    pub captured_at: DateTime<Utc>,
}

impl CapturedFocus {
    /// Builds a capture from a live window observation, stamped now.
    #[must_use]
    pub fn new(window_id: u32, app_bundle_id: impl Into<String>, workspace: impl Into<String>) -> Self {
        Self {
            window_id,
            app_bundle_id: app_bundle_id.into(),
            workspace: workspace.into(),
            captured_at: Utc::now(),
        }
    }
}

/// Bounded back-stack of captured focuses, most recent last.
#[derive(Debug, Clone)]
pub struct FocusStack {
    entries: Vec<CapturedFocus>,
    max_size: usize,
}

impl FocusStack {
    /// Creates an empty stack bounded to `max_size` entries.
    #[must_use]
    pub const fn new(max_size: usize) -> Self { Self { entries: Vec::new(), max_size } }

    /// Creates a stack from already ordered entries, truncating from the
    /// front if they exceed the bound.
    #[must_use]
    pub fn from_entries(mut entries: Vec<CapturedFocus>, max_size: usize) -> Self {
        if entries.len() > max_size {
            entries.drain(..entries.len() - max_size);
        }
        Self { entries, max_size }
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Pushes a capture. A capture with the same window id as the current
    /// top is dropped; overflow evicts the oldest entry.
    pub fn push(&mut self, capture: CapturedFocus) {
        if self.entries.last().is_some_and(|top| top.window_id == capture.window_id) {
            tracing::trace!(window_id = capture.window_id, "duplicate top of stack, skipping");
            return;
        }

        if self.entries.len() == self.max_size && self.max_size > 0 {
            self.entries.remove(0);
        }

        if self.max_size > 0 {
            self.entries.push(capture);
        }
    }

    /// Pops entries until one satisfies `is_valid`, returning it. Skipped
    /// entries are discarded; a popped entry is never resurrected.
    pub fn pop_first_valid<F>(&mut self, mut is_valid: F) -> Option<CapturedFocus>
    where
        F: FnMut(&CapturedFocus) -> bool,
    {
        while let Some(capture) = self.entries.pop() {
            if is_valid(&capture) {
                return Some(capture);
            }
            tracing::debug!(window_id = capture.window_id, "skipping stale focus entry");
        }
        None
    }

    /// Returns the entries in push order (most recent last).
    #[must_use]
    pub fn entries(&self) -> &[CapturedFocus] { &self.entries }

    /// Consumes the stack, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<CapturedFocus> { self.entries }
}
