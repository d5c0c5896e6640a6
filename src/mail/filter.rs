//! Suppression rules applied to fetched messages before they reach the UI.

use super::Message;

/// Decides whether a fetched message should be dropped.
pub trait FilterPolicy: Send {
    /// Returns `true` when the message must not be delivered.
    fn exclude(&self, message: &Message) -> bool;
}

/// Case-insensitive substring rules over the sender and the subject.
///
/// Rules are lowercased once at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRules {
    senders: Vec<String>,
    subject_keywords: Vec<String>,
}

impl FilterRules {
    /// Build rules from ignored senders and ignored subject keywords.
    ///
    /// Empty patterns are discarded; they would match everything.
    pub fn new<S, K>(senders: S, subject_keywords: K) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            senders: normalize(senders),
            subject_keywords: normalize(subject_keywords),
        }
    }

    /// Rules that exclude nothing.
    pub fn none() -> Self {
        Self::default()
    }

    fn matching_sender(&self, from: &str) -> Option<&str> {
        let from = from.to_lowercase();
        self.senders
            .iter()
            .find(|rule| from.contains(rule.as_str()))
            .map(String::as_str)
    }

    fn matching_keyword(&self, subject: &str) -> Option<&str> {
        let subject = subject.to_lowercase();
        self.subject_keywords
            .iter()
            .find(|rule| subject.contains(rule.as_str()))
            .map(String::as_str)
    }
}

impl FilterPolicy for FilterRules {
    fn exclude(&self, message: &Message) -> bool {
        if let Some(rule) = self.matching_sender(&message.from) {
            tracing::debug!(id = %message.id, from = %message.from, rule, "filtered by sender rule");
            return true;
        }
        if let Some(rule) = self.matching_keyword(&message.subject) {
            tracing::debug!(id = %message.id, subject = %message.subject, rule, "filtered by subject rule");
            return true;
        }
        false
    }
}

fn normalize<I>(patterns: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    patterns
        .into_iter()
        .map(|p| p.as_ref().trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
