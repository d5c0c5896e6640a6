//! tmail: watch a Gmail inbox from the terminal.
//!
//! ```bash
//! TMAIL_ACCESS_TOKEN=ya29... tmail --filters config/filters.json
//! ```

use clap::Parser;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tmail::app::{self, AppOptions};
use tmail::config::Settings;
use tmail::mail::gmail::GmailSource;
use tmail::sync::{mail_channel, CancelToken, Synchronizer, DEFAULT_CAPACITY};

/// How long to wait for the synchronizer after the UI is gone. A fetch in
/// flight is not interrupted; the process exits without it.
const SYNC_JOIN_TIMEOUT: Duration = Duration::from_millis(500);

fn main() -> tmail::Result<()> {
    let settings = Settings::parse();
    let _log_guard = tmail::logging::init(&settings.log_file)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "tmail starting");

    let credentials = settings.credentials()?;
    let filters = settings.open_filters()?;
    let source = GmailSource::new(credentials, &settings.api_base);
    let synchronizer = Synchronizer::new(source, filters.rules(), settings.sync_options());

    let (sink, stream) = mail_channel(DEFAULT_CAPACITY);
    let cancel = CancelToken::new();
    #[cfg(unix)]
    let signals = tmail::signals::SignalWatcher::spawn(cancel.clone())?;
    let sync = synchronizer.spawn(sink, cancel.clone())?;

    let options = AppOptions {
        poll_interval: Duration::from_secs(settings.poll_interval),
        ..AppOptions::default()
    };
    let result = app::run(&stream, &cancel, &options);

    cancel.cancel();
    drop(stream);
    wait_for(sync, SYNC_JOIN_TIMEOUT);
    #[cfg(unix)]
    signals.stop();
    if let Err(e) = &result {
        tracing::error!(error = %e, "tmail failed");
    }
    tracing::info!("tmail stopped");
    result
}

fn wait_for(handle: JoinHandle<()>, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            tracing::warn!("synchronizer still busy, exiting without it");
            return;
        }
        thread::sleep(Duration::from_millis(10));
    }
    let _ = handle.join();
}
