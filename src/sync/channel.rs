//! Bounded, cancellable message channel between the synchronizer and the UI.
//!
//! The producer side blocks when the queue is full; a blocked send gives up
//! as soon as the [`CancelToken`] fires. Dropping the [`MailSink`] closes the
//! channel, which the consumer observes as a disconnect.

use super::cancel::CancelToken;
use crate::mail::Message;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use thiserror::Error;

/// Default queue capacity.
pub const DEFAULT_CAPACITY: usize = 25;

/// Why a send did not complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The cancellation token fired while waiting for room.
    #[error("send cancelled")]
    Cancelled,
    /// The consumer has gone away.
    #[error("receiver disconnected")]
    Disconnected,
}

/// Producer side of the mail channel.
#[derive(Debug)]
pub struct MailSink {
    tx: Sender<Message>,
}

/// Consumer side of the mail channel.
#[derive(Debug, Clone)]
pub struct MailStream {
    rx: Receiver<Message>,
}

/// Create a mail channel holding at most `capacity` undelivered messages.
pub fn mail_channel(capacity: usize) -> (MailSink, MailStream) {
    let (tx, rx) = bounded(capacity);
    (MailSink { tx }, MailStream { rx })
}

impl MailSink {
    /// Send a message, blocking while the queue is full.
    pub fn send(&self, message: Message, cancel: &CancelToken) -> Result<(), SendError> {
        if cancel.is_cancelled() {
            return Err(SendError::Cancelled);
        }
        select! {
            send(self.tx, message) -> res => res.map_err(|_| SendError::Disconnected),
            recv(cancel.receiver()) -> _ => Err(SendError::Cancelled),
        }
    }
}

impl MailStream {
    /// The underlying receiver, for use in `select!`.
    pub const fn receiver(&self) -> &Receiver<Message> {
        &self.rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn message(id: &str) -> Message {
        Message {
            id: id.to_string(),
            ..Message::default()
        }
    }

    #[test]
    fn test_send_and_receive_in_order() {
        let (sink, stream) = mail_channel(4);
        let cancel = CancelToken::new();
        sink.send(message("a"), &cancel).unwrap();
        sink.send(message("b"), &cancel).unwrap();
        assert_eq!(stream.receiver().recv().unwrap().id, "a");
        assert_eq!(stream.receiver().recv().unwrap().id, "b");
    }

    #[test]
    fn test_blocked_send_cancels() {
        let (sink, _stream) = mail_channel(1);
        let cancel = CancelToken::new();
        sink.send(message("a"), &cancel).unwrap();

        let remote = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });
        assert_eq!(sink.send(message("b"), &cancel), Err(SendError::Cancelled));
        handle.join().unwrap();
    }

    #[test]
    fn test_send_after_cancel_fails_fast() {
        let (sink, stream) = mail_channel(4);
        let cancel = CancelToken::new();
        cancel.cancel();
        assert_eq!(sink.send(message("a"), &cancel), Err(SendError::Cancelled));
        assert!(stream.receiver().is_empty());
    }

    #[test]
    fn test_drop_sink_closes_stream() {
        let (sink, stream) = mail_channel(4);
        drop(sink);
        assert!(stream.receiver().recv().is_err());
    }

    #[test]
    fn test_send_to_dropped_stream() {
        let (sink, stream) = mail_channel(4);
        drop(stream);
        let cancel = CancelToken::new();
        assert_eq!(sink.send(message("a"), &cancel), Err(SendError::Disconnected));
    }
}
