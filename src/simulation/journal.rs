use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Oldest entries beyond this bound are silently discarded.
pub const JOURNAL_LIMIT: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalKind {
    Info,
    Positive,
    Danger,
}

impl JournalKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JournalKind::Info => "info",
            JournalKind::Positive => "positive",
            JournalKind::Danger => "danger",
        }
    }

    /// Unknown or missing labels fall back to `info`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "positive" => JournalKind::Positive,
            "danger" => JournalKind::Danger,
            _ => JournalKind::Info,
        }
    }
}

/// Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: JournalKind,
    #[serde(rename = "timestamp")]
    pub timestamp_ms: f64,
}

/// Bounded append-only record of notable occurrences, most recent first.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub entries: Vec<JournalEntry>,
}

impl Journal {
    /// Prepends an entry stamped with the given instant and truncates to the
    /// bound.
    pub fn append(&mut self, now_ms: f64, message: impl Into<String>, kind: JournalKind) {
        self.entries.insert(
            0,
            JournalEntry {
                message: message.into(),
                kind,
                timestamp_ms: now_ms,
            },
        );
        self.entries.truncate(JOURNAL_LIMIT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_most_recent_first() {
        let mut journal = Journal::default();
        journal.append(10.0, "first", JournalKind::Info);
        journal.append(20.0, "second", JournalKind::Positive);
        assert_eq!(journal.entries[0].message, "second");
        assert_eq!(journal.entries[1].message, "first");
    }

    #[test]
    fn journal_drops_oldest_beyond_bound() {
        let mut journal = Journal::default();
        for i in 0..(JOURNAL_LIMIT + 5) {
            journal.append(i as f64, format!("entry {}", i), JournalKind::Info);
        }
        assert_eq!(journal.entries.len(), JOURNAL_LIMIT);
        assert_eq!(journal.entries[0].message, format!("entry {}", JOURNAL_LIMIT + 4));
        assert_eq!(journal.entries.last().unwrap().message, "entry 5");
    }

    #[test]
    fn unknown_kind_labels_default_to_info() {
        assert_eq!(JournalKind::from_label("positive"), JournalKind::Positive);
        assert_eq!(JournalKind::from_label("danger"), JournalKind::Danger);
        assert_eq!(JournalKind::from_label("loud"), JournalKind::Info);
    }
}
