//! The view state owned by the UI loop.

use super::collection::MessageCollection;
use crate::mail::Message;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Status text shown before anything else is known.
pub const INITIAL_STATUS: &str = "Initializing, connecting to Gmail...";

/// Which screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Waiting for the terminal size and the first message.
    #[default]
    Loading,
    /// List and preview side by side.
    Dashboard,
    /// One message over the whole screen.
    Focused,
}

/// How the status text was set, which decides when it may be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    /// Recomputed every second.
    #[default]
    Normal,
    /// Shown until its expiry event arrives.
    Temporary,
    /// Never replaced.
    Error,
}

/// The status bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    /// Text to show.
    pub text: String,
    /// How it was set.
    pub kind: StatusKind,
    /// Bumped for every temporary status; expiries for older generations
    /// are stale.
    pub generation: u64,
}

/// Everything the renderer needs, mutated only by [`super::update`].
#[derive(Debug, Clone)]
pub struct ViewState {
    /// Messages, newest first.
    pub messages: MessageCollection,
    /// Selected index; `None` only while the collection is empty.
    pub selected: Option<usize>,
    /// First list entry shown.
    pub viewport_top: usize,
    /// Line offset into the wrapped preview body.
    pub preview_scroll: usize,
    /// Line offset into the wrapped focused body.
    pub focused_scroll: usize,
    /// Current screen.
    pub mode: Mode,
    /// Status bar.
    pub status: Status,
    /// Terminal columns (0 until known).
    pub width: u16,
    /// Terminal rows (0 until known).
    pub height: u16,
    /// The synchronizer has stopped.
    pub monitor_stopped: bool,
    /// UI-fatal error, once one occurred.
    pub last_error: Option<String>,
    /// Last clock reading.
    pub now: DateTime<Local>,
    /// Synchronizer poll interval, for the status bar.
    pub poll_interval: Duration,
}

impl ViewState {
    /// Fresh state: empty, loading, size unknown.
    pub fn new(poll_interval: Duration, now: DateTime<Local>) -> Self {
        Self {
            messages: MessageCollection::new(),
            selected: None,
            viewport_top: 0,
            preview_scroll: 0,
            focused_scroll: 0,
            mode: Mode::Loading,
            status: Status {
                text: INITIAL_STATUS.to_string(),
                ..Status::default()
            },
            width: 0,
            height: 0,
            monitor_stopped: false,
            last_error: None,
            now,
            poll_interval,
        }
    }

    /// The selected message.
    pub fn selected_message(&self) -> Option<&Message> {
        self.selected.and_then(|i| self.messages.get(i))
    }

    /// Whether the terminal size is known and drawable.
    pub const fn has_size(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
