//! Inputs and outputs of the UI state machine.

use crate::actor::{KeyInput, MouseInput};
use crate::mail::Message;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Everything that can change the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Terminal size changed (also sent once at startup).
    Resize {
        /// Columns.
        width: u16,
        /// Rows.
        height: u16,
    },
    /// A key was pressed.
    Key(KeyInput),
    /// Mouse wheel or click.
    Mouse(MouseInput),
    /// The synchronizer delivered a message.
    NewMessage(Message),
    /// The synchronizer's channel closed.
    MonitorStopped,
    /// A UI-fatal error; replaces the view.
    Error(String),
    /// Once-per-second clock.
    Tick(DateTime<Local>),
    /// A temporary status scheduled with this generation has run its course.
    TempStatusExpired {
        /// Generation passed in [`Command::ExpireStatusAfter`].
        generation: u64,
    },
}

/// What the runtime must do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Nothing.
    None,
    /// Stop the UI and cancel the synchronizer.
    Quit,
    /// Deliver [`AppEvent::TempStatusExpired`] with `generation` after `after`.
    ExpireStatusAfter {
        /// Delay.
        after: Duration,
        /// Generation to echo back.
        generation: u64,
    },
}
