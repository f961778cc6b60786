//! Append-only interaction log scoped to one run.

use sk_protocol::log_models::InteractionLogEntry;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionLog {
    entries: Vec<InteractionLogEntry>,
}

impl InteractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: InteractionLogEntry) {
        self.entries.push(entry);
    }

    /// The last `n` entries in insertion order. Does not consume anything.
    pub fn tail(&self, n: usize) -> &[InteractionLogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[InteractionLogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of all entries, used to archive the log into a result.
    pub fn snapshot(&self) -> Vec<InteractionLogEntry> {
        self.entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sk_protocol::stage_models::Stage;

    fn log_with(messages: &[&str]) -> InteractionLog {
        let mut log = InteractionLog::new();
        for message in messages {
            log.append(InteractionLogEntry::new(Stage::Analysis, *message, "task"));
        }
        log
    }

    #[test]
    fn test_append_preserves_order() {
        let log = log_with(&["one", "two", "three"]);

        let messages: Vec<&str> = log.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn test_tail_is_non_destructive() {
        let log = log_with(&["one", "two", "three", "four", "five", "six"]);

        let tail: Vec<&str> = log.tail(5).iter().map(|e| e.message.as_str()).collect();
        assert_eq!(tail, vec!["two", "three", "four", "five", "six"]);
        assert_eq!(log.len(), 6);

        assert_eq!(log.tail(100).len(), 6);
        assert!(log.tail(0).is_empty());
        assert!(InteractionLog::new().tail(5).is_empty());
    }
}
