//! Background synchronization: the producer half of the pipeline.
//!
//! ```text
//! ┌────────────┐  list/fetch  ┌──────────────┐  MailSink (bounded)  ┌─────────┐
//! │ MailSource │ ◀──────────  │ Synchronizer │ ───────────────────▶ │ UI loop │
//! └────────────┘              └──────────────┘                      └─────────┘
//!                                     ▲                                  │
//!                                     └──────────── CancelToken ─────────┘
//! ```

mod cancel;
mod channel;
mod synchronizer;

pub use cancel::CancelToken;
pub use channel::{mail_channel, MailSink, MailStream, SendError, DEFAULT_CAPACITY};
pub use synchronizer::{entries_since, SyncOptions, Synchronizer};
