//! The ordered message list shown on the dashboard.

use crate::mail::Message;
use std::collections::HashSet;

/// Messages sorted newest first by cursor; equal cursors keep arrival order.
///
/// Keyed by id: a message whose id is already present is ignored.
#[derive(Debug, Clone, Default)]
pub struct MessageCollection {
    messages: Vec<Message>,
    ids: HashSet<String>,
}

impl MessageCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `message` in order. Returns its index, or `None` when the id
    /// was already present.
    pub fn insert(&mut self, message: Message) -> Option<usize> {
        if self.ids.contains(&message.id) {
            return None;
        }
        // After every entry with a cursor >= the new one: stable for ties.
        let at = self.messages.partition_point(|m| m.cursor >= message.cursor);
        self.ids.insert(message.id.clone());
        self.messages.insert(at, message);
        Some(at)
    }

    /// Index of the message with `id`.
    pub fn position(&self, id: &str) -> Option<usize> {
        if !self.ids.contains(id) {
            return None;
        }
        self.messages.iter().position(|m| m.id == id)
    }

    /// The message at `index`.
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a MessageCollection {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, cursor: i64) -> Message {
        Message {
            id: id.to_string(),
            cursor,
            ..Message::default()
        }
    }

    fn ids(collection: &MessageCollection) -> Vec<&str> {
        collection.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn test_insert_keeps_descending_order() {
        let mut collection = MessageCollection::new();
        for (id, cursor) in [("b", 20), ("d", 40), ("a", 10), ("c", 30), ("e", 50)] {
            collection.insert(message(id, cursor));
        }
        assert_eq!(ids(&collection), vec!["e", "d", "c", "b", "a"]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let mut collection = MessageCollection::new();
        collection.insert(message("first", 10));
        collection.insert(message("newer", 20));
        collection.insert(message("second", 10));
        collection.insert(message("third", 10));
        assert_eq!(ids(&collection), vec!["newer", "first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_id_ignored() {
        let mut collection = MessageCollection::new();
        assert_eq!(collection.insert(message("a", 10)), Some(0));
        assert_eq!(collection.insert(message("a", 99)), None);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().cursor, 10);
    }

    #[test]
    fn test_insert_returns_index() {
        let mut collection = MessageCollection::new();
        collection.insert(message("old", 1));
        collection.insert(message("new", 3));
        assert_eq!(collection.insert(message("mid", 2)), Some(1));
        assert_eq!(collection.position("old"), Some(2));
        assert_eq!(collection.position("missing"), None);
    }

    #[test]
    fn test_sorted_for_many_sequences() {
        // Deterministic pseudo-random cursors with plenty of ties.
        let mut collection = MessageCollection::new();
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
        for n in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            let cursor = i64::try_from(seed % 50).unwrap();
            collection.insert(message(&format!("m{n}"), cursor));
        }
        let all: Vec<&Message> = collection.iter().collect();
        for pair in all.windows(2) {
            assert!(pair[0].cursor >= pair[1].cursor);
            if pair[0].cursor == pair[1].cursor {
                let a: usize = pair[0].id[1..].parse().unwrap();
                let b: usize = pair[1].id[1..].parse().unwrap();
                assert!(a < b, "ties must keep arrival order");
            }
        }
        assert_eq!(collection.len(), 500);
    }
}
