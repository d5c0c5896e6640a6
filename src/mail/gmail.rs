//! Gmail REST implementation of [`MailSource`].
//!
//! Uses blocking HTTP (`ureq`) because the synchronizer owns a dedicated
//! thread. Only read-only endpoints are touched:
//!
//! - `GET {base}/users/me/messages?maxResults=N`
//! - `GET {base}/users/me/messages/{id}?format=full`
//!
//! A `401` triggers one token refresh and one retry when the
//! [`Credentials`] allow it.

use super::date::parse_header_date;
use super::oauth::Credentials;
use super::{MailSource, Message, MessageRef};
use crate::error::{Error, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;
use std::time::Duration;

/// Default API root.
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

/// Gmail encodes part bodies as base64url, with or without padding.
const BODY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<ListEntry>,
}

#[derive(Debug, Deserialize)]
struct ListEntry {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    id: String,
    #[serde(default)]
    snippet: String,
    /// Epoch millis, serialized as a string.
    #[serde(default)]
    internal_date: Option<String>,
    payload: Option<MessagePart>,
}

/// One node of a message's MIME tree as returned by the API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    /// MIME type, e.g. `text/plain` or `multipart/alternative`.
    #[serde(default)]
    pub mime_type: String,
    /// Headers of this part.
    #[serde(default)]
    pub headers: Vec<Header>,
    /// Inline body data.
    #[serde(default)]
    pub body: Option<PartBody>,
    /// Child parts.
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

/// A single header.
#[derive(Debug, Deserialize)]
pub struct Header {
    /// Header name as sent.
    pub name: String,
    /// Raw header value.
    pub value: String,
}

/// Body data of a part.
#[derive(Debug, Default, Deserialize)]
pub struct PartBody {
    /// base64url-encoded content.
    #[serde(default)]
    pub data: Option<String>,
}

/// Mail source backed by the Gmail API.
pub struct GmailSource {
    agent: ureq::Agent,
    base: String,
    credentials: Credentials,
}

impl GmailSource {
    /// Create a source authenticating with `credentials`.
    pub fn new(credentials: Credentials, api_base: &str) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            agent,
            base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = match self.call(url, query) {
            Err(ureq::Error::Status(401, _)) if self.credentials.can_refresh() => {
                tracing::info!("access token rejected, refreshing");
                self.credentials.refresh(&self.agent)?;
                self.call(url, query)?
            }
            other => other?,
        };
        response
            .into_json()
            .map_err(|e| Error::Api(format!("response parse failed: {e}")))
    }

    #[allow(clippy::result_large_err)]
    fn call(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> std::result::Result<ureq::Response, ureq::Error> {
        let authorization = format!("Bearer {}", self.credentials.access_token());
        query
            .iter()
            .fold(self.agent.get(url), |request, (key, value)| request.query(key, value))
            .set("Authorization", &authorization)
            .call()
    }
}

impl MailSource for GmailSource {
    fn list_recent(&mut self, max_results: usize) -> Result<Vec<MessageRef>> {
        let url = format!("{}/users/me/messages", self.base);
        let max_results = max_results.to_string();
        let list: ListResponse = self.get_json(&url, &[("maxResults", &max_results)])?;
        Ok(list.messages.into_iter().map(|m| MessageRef::new(m.id)).collect())
    }

    fn fetch_full(&mut self, id: &str) -> Result<Message> {
        let url = format!("{}/users/me/messages/{id}", self.base);
        let raw: RawMessage = self.get_json(&url, &[("format", "full")])?;
        Ok(into_message(raw))
    }
}

fn into_message(raw: RawMessage) -> Message {
    let cursor = raw
        .internal_date
        .as_deref()
        .and_then(|d| d.parse::<i64>().ok())
        .unwrap_or_default();

    let mut message = Message {
        id: raw.id,
        cursor,
        snippet: raw.snippet,
        ..Message::default()
    };

    if let Some(payload) = raw.payload {
        for header in &payload.headers {
            match header.name.as_str() {
                "Subject" => message.subject.clone_from(&header.value),
                "From" => message.from.clone_from(&header.value),
                "To" => message.to.clone_from(&header.value),
                "Cc" => message.cc.clone_from(&header.value),
                "Date" => message.date = parse_header_date(&header.value),
                _ => {}
            }
        }
        message.body = plain_text_body(&payload).unwrap_or_default();
    }

    message
}

/// Find the first `text/plain` leaf with data, descending only through
/// `text/*` and `multipart/*` parts.
pub fn plain_text_body(part: &MessagePart) -> Option<String> {
    if part.mime_type == "text/plain" {
        if let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref()) {
            if !data.is_empty() {
                match BODY_ENGINE.decode(data) {
                    Ok(bytes) => return Some(String::from_utf8_lossy(&bytes).into_owned()),
                    Err(e) => tracing::warn!(error = %e, "could not decode text/plain body"),
                }
            }
        }
    }

    let descend = part.mime_type.starts_with("multipart/") || part.mime_type.starts_with("text/");
    if !descend {
        return None;
    }
    part.parts.iter().find_map(plain_text_body)
}
