//! Cooperative, single-shot cancellation.
//!
//! A [`CancelToken`] can be observed two ways: polled with
//! [`CancelToken::is_cancelled`], or waited on inside a `crossbeam_channel::select!`
//! through [`CancelToken::receiver`]. The receiver disconnects when the token
//! fires, so a `recv` arm on it becomes ready immediately and stays ready.

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

struct Inner {
    cancelled: AtomicBool,
    /// Dropped on cancel to disconnect `signal`.
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

/// Shared cancellation signal. Clones observe the same state.
#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Create a token that has not fired.
    pub fn new() -> Self {
        let (trigger, signal) = bounded(0);
        Self {
            inner: Arc::new(Inner {
                cancelled: AtomicBool::new(false),
                trigger: Mutex::new(Some(trigger)),
                signal,
            }),
        }
    }

    /// Fire the token. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
        if let Ok(mut trigger) = self.inner.trigger.lock() {
            trigger.take();
        }
    }

    /// Whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the token fires.
    pub fn receiver(&self) -> &Receiver<()> {
        &self.inner.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{select, TryRecvError};
    use std::time::Duration;

    #[test]
    fn test_cancel_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_receiver_disconnects_on_cancel() {
        let token = CancelToken::new();
        assert_eq!(token.receiver().try_recv(), Err(TryRecvError::Empty));
        token.cancel();
        assert_eq!(token.receiver().try_recv(), Err(TryRecvError::Disconnected));
    }

    #[test]
    fn test_select_wakes_on_cancel() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        let woke = select! {
            recv(token.receiver()) -> _ => true,
            default(Duration::from_secs(5)) => false,
        };
        assert!(woke);
        handle.join().unwrap();
    }
}
