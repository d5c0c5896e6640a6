//! Incremental synchronizer: turns "list most recent N" into an ordered,
//! filtered stream of full messages.
//!
//! # Algorithm
//!
//! ```text
//!   initial delay ──▶ initial batch ──▶ every poll interval: poll page
//!                      │                   │
//!                      │ baseline = newest │ new = entries above baseline
//!                      ▼                   ▼
//!               fetch oldest→newest, filter, send (blocking, cancellable)
//! ```
//!
//! The baseline is set from the listing *before* any body is fetched, so
//! messages arriving during a slow fetch loop are picked up by the next poll.
//! When a poll page does not contain the baseline, every entry on the page is
//! treated as new; anything older than the page is missed. The page size
//! bounds how stale the view can get under bursty arrival.

use super::cancel::CancelToken;
use super::channel::{MailSink, SendError};
use crate::mail::filter::FilterPolicy;
use crate::mail::{MailSource, MessageRef};
use crossbeam_channel::{after, select, tick};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Timing and batch sizes for the synchronizer.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Messages listed on startup.
    pub initial_batch: usize,
    /// Messages listed on each poll.
    pub poll_batch: usize,
    /// Pause before the initial batch, so the UI can draw first.
    pub initial_delay: Duration,
    /// Time between polls.
    pub poll_interval: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            initial_batch: 20,
            poll_batch: 10,
            initial_delay: Duration::from_secs(1),
            poll_interval: Duration::from_secs(30),
        }
    }
}

/// Mirrors the newest messages of a [`MailSource`] into a [`MailSink`].
pub struct Synchronizer<S, F> {
    source: S,
    filter: F,
    options: SyncOptions,
    /// Newest id already considered.
    baseline: Option<String>,
}

/// Entries of a newest-first `page` that are newer than `baseline`.
///
/// Returns the whole page when the baseline is absent from it.
pub fn entries_since<'a>(page: &'a [MessageRef], baseline: Option<&str>) -> &'a [MessageRef] {
    let end = baseline
        .and_then(|id| page.iter().position(|r| r.id == id))
        .unwrap_or(page.len());
    &page[..end]
}

impl<S, F> Synchronizer<S, F>
where
    S: MailSource,
    F: FilterPolicy,
{
    /// Create a synchronizer with an empty baseline.
    pub const fn new(source: S, filter: F, options: SyncOptions) -> Self {
        Self {
            source,
            filter,
            options,
            baseline: None,
        }
    }

    /// The current baseline id, if any.
    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    /// Run on a dedicated thread.
    pub fn spawn(self, sink: MailSink, cancel: CancelToken) -> std::io::Result<JoinHandle<()>>
    where
        S: 'static,
        F: 'static,
    {
        thread::Builder::new()
            .name("tmail-sync".to_string())
            .spawn(move || self.run(sink, &cancel))
    }

    /// Run until cancelled. The sink is dropped (closing the channel) on return.
    #[allow(clippy::needless_pass_by_value)]
    pub fn run(mut self, sink: MailSink, cancel: &CancelToken) {
        info!(
            initial_batch = self.options.initial_batch,
            poll_batch = self.options.poll_batch,
            poll_interval = ?self.options.poll_interval,
            "synchronizer starting"
        );

        select! {
            recv(after(self.options.initial_delay)) -> _ => {}
            recv(cancel.receiver()) -> _ => {
                info!("synchronizer cancelled during initial delay");
                return;
            }
        }

        if let Err(e) = self.initial_sync(&sink, cancel) {
            info!(reason = %e, "synchronizer stopped during initial batch");
            return;
        }
        info!("initial batch complete, polling");

        let ticker = tick(self.options.poll_interval);
        loop {
            select! {
                recv(ticker) -> _ => {
                    if let Err(e) = self.poll_once(&sink, cancel) {
                        info!(reason = %e, "synchronizer stopped during poll");
                        return;
                    }
                }
                recv(cancel.receiver()) -> _ => {
                    info!("synchronizer stopping");
                    return;
                }
            }
        }
    }

    /// List the initial batch, set the baseline, deliver oldest to newest.
    ///
    /// Returns the number of messages sent. A failed listing is logged and
    /// leaves the baseline empty.
    pub fn initial_sync(&mut self, sink: &MailSink, cancel: &CancelToken) -> Result<usize, SendError> {
        let page = match self.source.list_recent(self.options.initial_batch) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "initial listing failed");
                return Ok(0);
            }
        };
        let Some(newest) = page.first() else {
            info!("no messages in initial listing");
            return Ok(0);
        };

        self.baseline = Some(newest.id.clone());
        info!(count = page.len(), baseline = %newest.id, "initial listing");

        self.deliver(page.iter().rev(), sink, cancel)
    }

    /// Run one poll cycle. Returns the number of messages sent.
    pub fn poll_once(&mut self, sink: &MailSink, cancel: &CancelToken) -> Result<usize, SendError> {
        let page = match self.source.list_recent(self.options.poll_batch) {
            Ok(page) => page,
            Err(e) => {
                warn!(error = %e, "poll listing failed, retrying next tick");
                return Ok(0);
            }
        };
        let Some(newest) = page.first() else {
            return Ok(0);
        };
        let newest = newest.id.clone();

        let fresh = entries_since(&page, self.baseline.as_deref());
        if fresh.len() == page.len() && self.baseline.is_some() {
            warn!(
                page = page.len(),
                "baseline not in poll page; older new messages may have been missed"
            );
        }
        if !fresh.is_empty() {
            debug!(count = fresh.len(), "new messages");
        }

        let sent = self.deliver(fresh.iter().rev(), sink, cancel)?;

        if self.baseline.as_deref() != Some(newest.as_str()) {
            debug!(baseline = %newest, "baseline advanced");
        }
        self.baseline = Some(newest);
        Ok(sent)
    }

    /// Fetch, filter and send each entry in iteration order.
    fn deliver<'a, I>(&mut self, entries: I, sink: &MailSink, cancel: &CancelToken) -> Result<usize, SendError>
    where
        I: Iterator<Item = &'a MessageRef>,
    {
        let mut sent = 0;
        for entry in entries {
            let message = match self.source.fetch_full(&entry.id) {
                Ok(message) => message,
                Err(e) => {
                    warn!(id = %entry.id, error = %e, "fetch failed, skipping");
                    continue;
                }
            };
            if self.filter.exclude(&message) {
                continue;
            }
            let id = message.id.clone();
            sink.send(message, cancel)?;
            debug!(%id, "delivered");
            sent += 1;
        }
        Ok(sent)
    }
}
