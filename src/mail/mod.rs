//! Mail model and the remote store abstraction.
//!
//! - [`Message`]: a fully fetched message with a plain-text body
//! - [`MessageRef`]: a listing entry (id and, when known, its cursor)
//! - [`MailSource`]: the "list recent" / "fetch full" contract the
//!   synchronizer drives
//! - [`filter`]: sender/subject suppression rules
//! - [`gmail`]: the Gmail REST implementation
//! - [`oauth`]: bearer credentials and token refresh

pub mod date;
pub mod filter;
pub mod gmail;
pub mod oauth;

use crate::error::Result;
use chrono::{DateTime, FixedOffset};

/// A fully fetched message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Stable unique identifier assigned by the store.
    pub id: String,
    /// Ordering key; newer messages have larger values.
    pub cursor: i64,
    /// `From` header.
    pub from: String,
    /// `To` header.
    pub to: String,
    /// `Cc` header (empty when absent).
    pub cc: String,
    /// `Subject` header.
    pub subject: String,
    /// Parsed `Date` header, `None` when it could not be parsed.
    pub date: Option<DateTime<FixedOffset>>,
    /// Short server-side excerpt.
    pub snippet: String,
    /// Plain-text body.
    pub body: String,
}

/// An entry of a "list recent" page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Message identifier.
    pub id: String,
    /// Ordering key, if the listing exposes it.
    pub cursor: Option<i64>,
}

impl MessageRef {
    /// Create a listing entry without a known cursor.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cursor: None,
        }
    }
}

/// A remote, append-mostly message store.
///
/// Implementations are called from the synchronizer thread only.
pub trait MailSource: Send {
    /// List up to `max_results` most recent messages, newest first.
    fn list_recent(&mut self, max_results: usize) -> Result<Vec<MessageRef>>;

    /// Fetch headers and plain-text body for one message.
    fn fetch_full(&mut self, id: &str) -> Result<Message>;
}
