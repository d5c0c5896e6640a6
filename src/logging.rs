//! File logging.
//!
//! The terminal belongs to the UI, so every `tracing` event goes to a log
//! file through a non-blocking writer. `RUST_LOG` overrides the default
//! filter, e.g. `RUST_LOG=tmail=debug`.

use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "tmail=info";

/// Install the global subscriber, appending to `path`.
///
/// Keep the returned guard alive for as long as events should be flushed;
/// dropping it drains the queue.
pub fn init(path: &Path) -> Result<WorkerGuard> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true),
        )
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    tracing::info!(log_file = %path.display(), "logging initialized");
    Ok(guard)
}
