//! Locally generated identifiers for unsaved list items.

use chrono::Utc;
use uuid::Uuid;

/// Issues `"{prefix}_{millis}"` tokens. Tokens from one generator strictly
/// increase, so two items added within the same millisecond still differ.
#[derive(Debug, Clone)]
pub struct TempIdGenerator {
    prefix: String,
    last: u64,
}

impl TempIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last: 0,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Makes sure future tokens sort after an id that already exists.
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = id_suffix(id) {
            self.last = self.last.max(n);
        }
    }

    /// Next token. Once the counter is exhausted by a stored id ending in
    /// `u64::MAX`, tokens fall back to a UUID suffix, which never parses as
    /// a counter value and so cannot collide with one.
    pub fn next_id(&mut self) -> String {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        match self.last.checked_add(1) {
            Some(next) => {
                self.last = now.max(next);
                format!("{}_{}", self.prefix, self.last)
            }
            None => format!("{}_{}", self.prefix, Uuid::new_v4().simple()),
        }
    }
}

/// Numeric suffix after the final `_`, e.g. `b_17` -> `17`.
pub fn id_suffix(id: &str) -> Option<u64> {
    id.rsplit_once('_')?.1.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_prefixed_and_unique() {
        let mut ids = TempIdGenerator::new("b");
        let first = ids.next_id();
        let second = ids.next_id();
        assert!(first.starts_with("b_"));
        assert_ne!(first, second);
        assert!(id_suffix(&second).unwrap() > id_suffix(&first).unwrap());
    }

    #[test]
    fn test_observe_moves_past_existing_ids() {
        let mut ids = TempIdGenerator::new("faq");
        ids.observe("faq_99999999999999");
        assert_eq!(ids.next_id(), "faq_100000000000000");
    }

    #[test]
    fn test_exhausted_counter_falls_back_to_unique_tokens() {
        let mut ids = TempIdGenerator::new("b");
        ids.observe(&format!("b_{}", u64::MAX));

        let first = ids.next_id();
        let second = ids.next_id();

        assert!(first.starts_with("b_"));
        assert_ne!(first, second);
        assert_ne!(first, format!("b_{}", u64::MAX));
        assert_eq!(id_suffix(&first), None);
    }

    #[test]
    fn test_id_suffix() {
        assert_eq!(id_suffix("b_1"), Some(1));
        assert_eq!(id_suffix("social_post_42"), Some(42));
        assert_eq!(id_suffix("8f14e45f-ceea"), None);
        assert_eq!(id_suffix("b_x"), None);
    }
}
