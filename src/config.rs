//! Command line settings, the filter file and credentials.

use crate::error::{Error, Result};
use crate::mail::filter::FilterRules;
use crate::mail::gmail::DEFAULT_API_BASE;
use crate::mail::oauth::{ClientSecrets, Credentials, RefreshGrant};
use crate::sync::SyncOptions;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding an access token; wins over the token file.
pub const TOKEN_ENV: &str = "TMAIL_ACCESS_TOKEN";

/// Watch a Gmail inbox from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "tmail")]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// Filter rules file (created empty when missing)
    #[arg(long, default_value = "config/filters.json")]
    pub filters: PathBuf,

    /// OAuth token file (`access_token`, optionally `refresh_token`)
    #[arg(long, default_value = "token.json")]
    pub token: PathBuf,

    /// OAuth client secrets, needed to refresh an expired token
    #[arg(long, default_value = "credentials.json")]
    pub credentials: PathBuf,

    /// Access token; overrides the token file
    #[arg(long, env = TOKEN_ENV, hide_env_values = true)]
    pub access_token: Option<String>,

    /// Log file (appended to)
    #[arg(long, default_value = "tmail.log")]
    pub log_file: PathBuf,

    /// Seconds between inbox polls
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_interval: u64,

    /// Seconds to wait before the first fetch
    #[arg(long, default_value = "1")]
    pub initial_delay: u64,

    /// Messages fetched on startup
    #[arg(long, default_value = "20")]
    pub initial_batch: usize,

    /// Messages listed on each poll
    #[arg(long, default_value = "10")]
    pub poll_batch: usize,

    /// Add a sender to the filter file's ignore list (repeatable)
    #[arg(long, value_name = "SENDER")]
    pub ignore_sender: Vec<String>,

    /// Add a subject keyword to the filter file's ignore list (repeatable)
    #[arg(long, value_name = "KEYWORD")]
    pub ignore_subject: Vec<String>,

    /// Gmail REST API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl Settings {
    /// Synchronizer timing and batch sizes.
    pub const fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            initial_batch: self.initial_batch,
            poll_batch: self.poll_batch,
            initial_delay: Duration::from_secs(self.initial_delay),
            poll_interval: Duration::from_secs(self.poll_interval),
        }
    }

    /// Load the filter file and persist any `--ignore-*` additions.
    pub fn open_filters(&self) -> Result<FilterStore> {
        let mut store = FilterStore::load_or_create(&self.filters)?;
        for sender in &self.ignore_sender {
            store.add_ignore_sender(sender)?;
        }
        for keyword in &self.ignore_subject {
            store.add_ignore_subject_keyword(keyword)?;
        }
        Ok(store)
    }

    /// Bearer credentials for the mail source.
    ///
    /// The access token comes from the flag or environment first, then the
    /// token file. A `refresh_token` in the token file plus readable client
    /// secrets make the credentials refreshable; without them the token is
    /// used until it expires.
    pub fn credentials(&self) -> Result<Credentials> {
        let file = read_token_file(&self.token)?;
        let flag = non_empty(self.access_token.as_deref());
        let stored = file.as_ref().and_then(|f| non_empty(f.access_token.as_deref()));
        let access_token = match (flag, stored) {
            (Some(token), _) | (None, Some(token)) => token,
            (None, None) if file.is_some() => {
                return Err(Error::Credentials(format!(
                    "{} has no access_token",
                    self.token.display()
                )));
            }
            (None, None) => {
                return Err(Error::Credentials(format!(
                    "no token file at {} and {TOKEN_ENV} is not set",
                    self.token.display()
                )));
            }
        };

        let Some(refresh_token) = file.and_then(|f| non_empty(f.refresh_token.as_deref())) else {
            tracing::info!("no refresh token, access token is used until it expires");
            return Ok(Credentials::fixed(access_token));
        };
        match load_client_secrets(&self.credentials) {
            Ok(client) => Ok(Credentials::refreshable(
                access_token,
                RefreshGrant {
                    client,
                    refresh_token,
                },
            )),
            Err(e) => {
                tracing::warn!(error = %e, "token refresh disabled");
                Ok(Credentials::fixed(access_token))
            }
        }
    }
}

/// On-disk filter rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    /// Sender substrings to drop.
    #[serde(default)]
    pub ignore_senders: Vec<String>,
    /// Subject substrings to drop.
    #[serde(default)]
    pub ignore_keywords_in_subject: Vec<String>,
    /// Body substrings; stored but not applied.
    #[serde(default)]
    pub ignore_keywords_in_body: Vec<String>,
}

/// The filter file plus the rules loaded from it.
#[derive(Debug)]
pub struct FilterStore {
    path: PathBuf,
    config: FilterConfig,
}

impl FilterStore {
    /// Load `path`, creating it with empty lists when it does not exist.
    pub fn load_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(text) => {
                let config = serde_json::from_str(&text).map_err(|e| config_error(&path, &e))?;
                tracing::info!(path = %path.display(), "filters loaded");
                Ok(Self { path, config })
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let store = Self {
                    path,
                    config: FilterConfig::default(),
                };
                store.save()?;
                tracing::info!(path = %store.path.display(), "created empty filter file");
                Ok(store)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The loaded rules.
    pub const fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Rules for the synchronizer.
    pub fn rules(&self) -> FilterRules {
        FilterRules::new(
            &self.config.ignore_senders,
            &self.config.ignore_keywords_in_subject,
        )
    }

    /// Add an ignored sender and save. Already present entries are a no-op.
    pub fn add_ignore_sender(&mut self, sender: &str) -> Result<()> {
        if push_unique(&mut self.config.ignore_senders, sender) {
            self.save()?;
        }
        Ok(())
    }

    /// Add an ignored subject keyword and save.
    pub fn add_ignore_subject_keyword(&mut self, keyword: &str) -> Result<()> {
        if push_unique(&mut self.config.ignore_keywords_in_subject, keyword) {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.config)
            .map_err(|e| config_error(&self.path, &e))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    if list.iter().any(|v| v == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

fn config_error(path: &Path, err: &serde_json::Error) -> Error {
    Error::Config {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

#[derive(Deserialize)]
struct TokenFile {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// The token file, or `None` when it does not exist.
fn read_token_file(path: &Path) -> Result<Option<TokenFile>> {
    match fs::read_to_string(path) {
        Ok(text) => serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| config_error(path, &e)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read the client registration from a Google `credentials.json`.
pub fn load_client_secrets(path: &Path) -> Result<ClientSecrets> {
    let text = fs::read_to_string(path)?;
    ClientSecrets::from_json(&text).map_err(|message| Error::Config {
        path: path.to_path_buf(),
        message,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::filter::FilterPolicy;
    use crate::mail::Message;
    use std::ffi::OsStr;

    #[test]
    fn test_missing_filter_file_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("filters.json");
        let store = FilterStore::load_or_create(&path).unwrap();
        assert_eq!(store.config(), &FilterConfig::default());

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["ignoreSenders"], serde_json::json!([]));
        assert_eq!(value["ignoreKeywordsInSubject"], serde_json::json!([]));
        assert_eq!(value["ignoreKeywordsInBody"], serde_json::json!([]));
    }

    #[test]
    fn test_load_existing_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        fs::write(
            &path,
            r#"{"ignoreSenders": ["noreply@"], "ignoreKeywordsInSubject": ["Sale"]}"#,
        )
        .unwrap();
        let store = FilterStore::load_or_create(&path).unwrap();
        assert_eq!(store.config().ignore_senders, vec!["noreply@"]);
        assert!(store.config().ignore_keywords_in_body.is_empty());

        let rules = store.rules();
        let newsletter = Message {
            from: "NoReply@example.com".to_string(),
            ..Message::default()
        };
        assert!(rules.exclude(&newsletter));
        let sale = Message {
            subject: "Big sale today".to_string(),
            ..Message::default()
        };
        assert!(rules.exclude(&sale));
    }

    #[test]
    fn test_malformed_filters() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        fs::write(&path, "{ not json").unwrap();
        let err = FilterStore::load_or_create(&path).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_add_rules_dedupes_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        let mut store = FilterStore::load_or_create(&path).unwrap();
        store.add_ignore_sender("spam@example.com").unwrap();
        store.add_ignore_sender("spam@example.com").unwrap();
        store.add_ignore_subject_keyword("webinar").unwrap();

        let reloaded = FilterStore::load_or_create(&path).unwrap();
        assert_eq!(reloaded.config().ignore_senders, vec!["spam@example.com"]);
        assert_eq!(reloaded.config().ignore_keywords_in_subject, vec!["webinar"]);
        // Pretty-printed.
        assert!(fs::read_to_string(&path).unwrap().contains("\n  \""));
    }

    fn settings_in(dir: &Path) -> Settings {
        let token = dir.join("token.json");
        let credentials = dir.join("credentials.json");
        Settings::try_parse_from([
            OsStr::new("tmail"),
            OsStr::new("--token"),
            token.as_os_str(),
            OsStr::new("--credentials"),
            credentials.as_os_str(),
        ])
        .unwrap()
    }

    #[test]
    fn test_ignore_flags_persist() {
        let dir = tempfile::tempdir().unwrap();
        let filters = dir.path().join("filters.json");
        let args = [
            OsStr::new("tmail"),
            OsStr::new("--filters"),
            filters.as_os_str(),
            OsStr::new("--ignore-sender"),
            OsStr::new("deals@shop.example"),
            OsStr::new("--ignore-sender"),
            OsStr::new("noreply@"),
            OsStr::new("--ignore-subject"),
            OsStr::new("webinar"),
        ];
        let settings = Settings::try_parse_from(args).unwrap();
        let store = settings.open_filters().unwrap();
        assert_eq!(store.config().ignore_senders, vec!["deals@shop.example", "noreply@"]);

        // Running again with the same flags changes nothing.
        let store = Settings::try_parse_from(args).unwrap().open_filters().unwrap();
        assert_eq!(store.config().ignore_senders.len(), 2);
        assert_eq!(store.config().ignore_keywords_in_subject, vec!["webinar"]);
        let spam = Message {
            subject: "Join our Webinar".to_string(),
            ..Message::default()
        };
        assert!(store.rules().exclude(&spam));
    }

    #[test]
    fn test_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        assert!(matches!(settings.credentials(), Err(Error::Credentials(_))));

        fs::write(&settings.token, r#"{"access_token": " ya29.abc ", "token_type": "Bearer"}"#)
            .unwrap();
        let credentials = settings.credentials().unwrap();
        assert_eq!(credentials.access_token(), "ya29.abc");
        assert!(!credentials.can_refresh());

        fs::write(&settings.token, r#"{"refresh_token": "x"}"#).unwrap();
        assert!(matches!(settings.credentials(), Err(Error::Credentials(_))));

        fs::write(&settings.token, "{ broken").unwrap();
        assert!(matches!(settings.credentials(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_refresh_token_with_client_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        fs::write(
            &settings.token,
            r#"{"access_token": "ya29.abc", "refresh_token": "1//r", "expiry": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        // No client secrets: usable, but not refreshable.
        assert!(!settings.credentials().unwrap().can_refresh());

        fs::write(
            &settings.credentials,
            r#"{"installed": {"client_id": "id", "client_secret": "secret"}}"#,
        )
        .unwrap();
        let credentials = settings.credentials().unwrap();
        assert_eq!(credentials.access_token(), "ya29.abc");
        assert!(credentials.can_refresh());

        let secrets = load_client_secrets(&settings.credentials).unwrap();
        assert_eq!(secrets.client_id, "id");
    }

    #[test]
    fn test_malformed_client_secrets() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, r#"{"service_account": {}}"#).unwrap();
        assert!(matches!(load_client_secrets(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::try_parse_from(["tmail"]).unwrap();
        assert_eq!(settings.filters, PathBuf::from("config/filters.json"));
        assert_eq!(settings.token, PathBuf::from("token.json"));
        assert_eq!(settings.credentials, PathBuf::from("credentials.json"));
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        let options = settings.sync_options();
        assert_eq!(options.initial_batch, 20);
        assert_eq!(options.poll_batch, 10);
        assert_eq!(options.poll_interval, Duration::from_secs(30));
        assert_eq!(options.initial_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_flag_token_wins() {
        let settings =
            Settings::try_parse_from(["tmail", "--access-token", "abc", "--token", "/nonexistent"])
                .unwrap();
        assert_eq!(settings.credentials().unwrap().access_token(), "abc");
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        assert!(Settings::try_parse_from(["tmail", "--poll-interval", "0"]).is_err());
    }
}
