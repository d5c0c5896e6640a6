//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by tmail.
///
/// Transient failures from the mail source (`Http`, `Api`) are logged and
/// retried by the synchronizer; the remaining variants are startup-fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// Filesystem or terminal I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed or written.
    #[error("config error in {path}: {message}")]
    Config {
        /// File that failed.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// No usable access token was found.
    #[error("missing credentials: {0}")]
    Credentials(String),

    /// The HTTP request itself failed (transport error or non-2xx status).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The remote store answered with a payload we could not interpret.
    #[error("unexpected API response: {0}")]
    Api(String),

    /// Logging could not be initialized.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(code, response) => {
                Self::Http(format!("status {code} from {}", response.get_url()))
            }
            ureq::Error::Transport(transport) => Self::Http(transport.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config {
            path: PathBuf::from("config/filters.json"),
            message: "expected value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "config error in config/filters.json: expected value"
        );
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
