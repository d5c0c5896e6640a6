//! OAuth credentials for the Gmail source.
//!
//! Access tokens from `token.json` expire after about an hour. When the
//! file also carries a `refresh_token` and the installed-app client
//! secrets are available, a rejected token is exchanged for a fresh one
//! with the `refresh_token` grant.

use crate::error::{Error, Result};
use serde::Deserialize;

/// Google's token endpoint, used when the client secrets omit `token_uri`.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client registration, as found in a Google `credentials.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    /// OAuth client id.
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a `credentials.json` document (`installed` or `web` client).
    pub fn from_json(text: &str) -> std::result::Result<Self, String> {
        let file: SecretsFile = serde_json::from_str(text).map_err(|e| e.to_string())?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "neither an \"installed\" nor a \"web\" client".to_string())
    }
}

/// Everything needed to exchange a refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshGrant {
    /// Client registration.
    pub client: ClientSecrets,
    /// Long-lived refresh token.
    pub refresh_token: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// A bearer token, refreshable when a grant is present.
#[derive(Debug, Clone)]
pub struct Credentials {
    access_token: String,
    refresh: Option<RefreshGrant>,
}

impl Credentials {
    /// Credentials that are used as-is until they expire.
    pub fn fixed(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh: None,
        }
    }

    /// Credentials that can renew themselves.
    pub fn refreshable(access_token: impl Into<String>, grant: RefreshGrant) -> Self {
        Self {
            access_token: access_token.into(),
            refresh: Some(grant),
        }
    }

    /// The current access token.
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Whether [`refresh`](Self::refresh) can succeed at all.
    pub const fn can_refresh(&self) -> bool {
        self.refresh.is_some()
    }

    /// Exchange the refresh token for a new access token.
    pub fn refresh(&mut self, agent: &ureq::Agent) -> Result<()> {
        let Some(grant) = self.refresh.as_mut() else {
            return Err(Error::Credentials("no refresh token available".to_string()));
        };

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", grant.refresh_token.as_str()),
            ("client_id", grant.client.client_id.as_str()),
        ];
        if let Some(secret) = grant.client.client_secret.as_deref() {
            form.push(("client_secret", secret));
        }

        tracing::debug!(endpoint = %grant.client.token_uri, "refreshing access token");
        let response: TokenResponse = agent
            .post(&grant.client.token_uri)
            .send_form(&form)?
            .into_json()
            .map_err(|e| Error::Api(format!("token response parse failed: {e}")))?;

        let access_token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Api("token response without access_token".to_string()))?;
        // Google usually omits the refresh token on refresh; keep the old one.
        if let Some(rotated) = response.refresh_token.filter(|t| !t.is_empty()) {
            grant.refresh_token = rotated;
        }
        self.access_token = access_token;
        tracing::info!("access token refreshed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_client_secrets() {
        let text = r#"{"installed": {
            "client_id": "123.apps.googleusercontent.com",
            "client_secret": "shh",
            "token_uri": "https://oauth2.googleapis.com/token",
            "redirect_uris": ["http://localhost"]
        }}"#;
        let secrets = ClientSecrets::from_json(text).unwrap();
        assert_eq!(secrets.client_id, "123.apps.googleusercontent.com");
        assert_eq!(secrets.client_secret.as_deref(), Some("shh"));
    }

    #[test]
    fn test_web_client_default_token_uri() {
        let secrets = ClientSecrets::from_json(r#"{"web": {"client_id": "abc"}}"#).unwrap();
        assert_eq!(secrets.token_uri, DEFAULT_TOKEN_URI);
        assert!(secrets.client_secret.is_none());
    }

    #[test]
    fn test_unknown_client_kind() {
        assert!(ClientSecrets::from_json(r#"{"other": {}}"#).is_err());
        assert!(ClientSecrets::from_json("not json").is_err());
    }

    #[test]
    fn test_fixed_credentials_cannot_refresh() {
        let mut credentials = Credentials::fixed("ya29.abc");
        assert!(!credentials.can_refresh());
        let agent = ureq::AgentBuilder::new().build();
        assert!(matches!(credentials.refresh(&agent), Err(Error::Credentials(_))));
        assert_eq!(credentials.access_token(), "ya29.abc");
    }
}
