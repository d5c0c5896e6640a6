//! OS termination signals mapped onto a [`CancelToken`].
//!
//! SIGINT, SIGTERM and SIGHUP cancel the token, so the UI loop returns
//! through its normal path and the terminal is restored. Ctrl+C typed in
//! raw mode arrives as a key event, not as SIGINT.

use crate::error::Result;
use crate::sync::CancelToken;
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use std::thread::{self, JoinHandle};

/// Signals that shut tmail down.
pub const TERMINATION_SIGNALS: [i32; 3] = [SIGINT, SIGTERM, SIGHUP];

/// A thread waiting for termination signals.
pub struct SignalWatcher {
    handle: Handle,
    thread: JoinHandle<()>,
}

impl SignalWatcher {
    /// Register the handlers and cancel `cancel` on the first signal.
    pub fn spawn(cancel: CancelToken) -> Result<Self> {
        let mut signals = Signals::new(TERMINATION_SIGNALS)?;
        let handle = signals.handle();
        let thread = thread::Builder::new()
            .name("tmail-signals".to_string())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    tracing::info!(signal, "received termination signal, shutting down");
                    cancel.cancel();
                }
            })?;
        Ok(Self { handle, thread })
    }

    /// Stop waiting and join the thread.
    pub fn stop(self) {
        self.handle.close();
        if self.thread.join().is_err() {
            tracing::warn!("signal thread panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_signal_cancels() {
        let cancel = CancelToken::new();
        let watcher = SignalWatcher::spawn(cancel.clone()).unwrap();

        signal_hook::low_level::raise(SIGHUP).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while !cancel.is_cancelled() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert!(cancel.is_cancelled());
        watcher.stop();
    }

    #[test]
    fn test_stop_without_signal() {
        let cancel = CancelToken::new();
        let watcher = SignalWatcher::spawn(cancel).unwrap();
        // Returns once the thread has seen the close.
        watcher.stop();
    }
}
