//! # tmail
//!
//! A terminal mail watcher: a background synchronizer mirrors the newest
//! messages of a mailbox into a bounded channel, and a flicker-free
//! dashboard shows them as they arrive.
//!
//! ## Core Concepts
//!
//! - **Incremental sync**: a baseline id turns "list the newest N" into a
//!   stream of only-new messages, oldest first
//! - **Bounded, cancellable hand-off**: back-pressure from the UI, prompt
//!   shutdown on quit
//! - **Elm-style UI**: `update(&mut ViewState, AppEvent) -> Command` and a
//!   pure `render(&ViewState, &Theme) -> Buffer`
//! - **Actor model**: isolated threads for input and rendering; the render
//!   actor diffs frames and writes minimal ANSI
//!
//! ## Example
//!
//! ```rust
//! use tmail::{Buffer, Modifiers, Style};
//!
//! // Draw into an off-screen 80x24 frame.
//! let mut buffer = Buffer::new(80, 24);
//! buffer.put_str(0, 0, "Inbox", 80, Style::PLAIN.bold());
//! assert_eq!(buffer.row_text(0).trim_end(), "Inbox");
//! assert!(buffer.get(0, 0).unwrap().style().modifiers.contains(Modifiers::BOLD));
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod app;
pub mod buffer;
pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod mail;
#[cfg(unix)]
pub mod signals;
pub mod sync;
pub mod ui;

// Re-exports for convenience
pub use buffer::{Buffer, Cell, Modifiers, Rgb, Style};
pub use error::{Error, Result};
pub use layout::Rect;
pub use mail::{MailSource, Message, MessageRef};
pub use sync::{mail_channel, CancelToken, MailSink, MailStream, SyncOptions, Synchronizer};
pub use ui::{AppEvent, Command, Theme, ViewState};
