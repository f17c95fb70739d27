//! Memory Record
//!
//! The durable per-character unit: weighted traits, goals, a bounded
//! long-term log of what happened, and a bounded window of recent events.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Separator between an action and its outcome, and between the two levels
/// of a two-level outcome
pub const OUTCOME_SEPARATOR: &str = " → ";

/// Action label used for reflection entries
pub const REFLECTION_ACTION: &str = "Reflection";

/// Text shown when the long-term log is empty
pub const NO_MEMORIES: &str = "No memories yet.";

/// One long-term memory: what was done and what came of it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub action: String,
    pub outcome: String,
}

impl MemoryEntry {
    pub fn new(action: impl Into<String>, outcome: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            outcome: outcome.into(),
        }
    }

    /// Splits an older single-string entry into its structured form.
    ///
    /// `"action → outcome"` splits at the first separator, so two-level
    /// outcomes stay intact. `"Reflection: text"` becomes a reflection entry.
    pub fn from_joined(joined: &str) -> Self {
        if let Some((action, outcome)) = joined.split_once(OUTCOME_SEPARATOR) {
            return Self::new(action, outcome);
        }
        if let Some(text) = joined.strip_prefix("Reflection:") {
            return Self::new(REFLECTION_ACTION, text.trim_start());
        }
        Self::new(joined, "")
    }

    pub fn is_reflection(&self) -> bool {
        self.action == REFLECTION_ACTION
    }
}

impl std::fmt::Display for MemoryEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.outcome.is_empty() {
            write!(f, "{}", self.action)
        } else {
            write!(f, "{}{}{}", self.action, OUTCOME_SEPARATOR, self.outcome)
        }
    }
}

/// Capacity bounds for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryLimits {
    pub long_term: usize,
    pub short_term: usize,
}

impl Default for MemoryLimits {
    fn default() -> Self {
        Self {
            long_term: 5,
            short_term: 5,
        }
    }
}

/// Rolling window of raw recent event strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortTermWindow {
    #[serde(default)]
    pub recent_events: Vec<String>,
}

/// The persisted record for one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct MemoryRecord {
    /// Character the record belongs to; absent in older files
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub traits: BTreeMap<String, f64>,
    pub goals: Vec<String>,
    #[serde(rename = "memory")]
    pub long_term: Vec<MemoryEntry>,
    pub short_term: ShortTermWindow,
}

impl Default for MemoryRecord {
    fn default() -> Self {
        Self {
            owner: None,
            traits: BTreeMap::from([
                ("curiosity".to_string(), 0.6),
                ("greed".to_string(), 0.4),
            ]),
            goals: vec!["seek adventure".to_string(), "earn wealth".to_string()],
            long_term: Vec::new(),
            short_term: ShortTermWindow::default(),
        }
    }
}

fn push_bounded<T>(items: &mut Vec<T>, item: T, capacity: usize) {
    items.push(item);
    if items.len() > capacity {
        let excess = items.len() - capacity;
        items.drain(..excess);
    }
}

fn truncate_oldest<T>(items: &mut Vec<T>, capacity: usize) {
    if items.len() > capacity {
        let excess = items.len() - capacity;
        items.drain(..excess);
    }
}

impl MemoryRecord {
    /// Appends a long-term entry, evicting the oldest beyond `capacity`
    pub fn push_memory(&mut self, entry: MemoryEntry, capacity: usize) {
        push_bounded(&mut self.long_term, entry, capacity);
    }

    /// Appends a short-term event, evicting the oldest beyond `capacity`
    pub fn push_event(&mut self, event: String, capacity: usize) {
        push_bounded(&mut self.short_term.recent_events, event, capacity);
    }

    /// Drops the oldest entries of any log that exceeds its bound
    pub fn enforce_limits(&mut self, limits: MemoryLimits) -> bool {
        let before = (self.long_term.len(), self.short_term.recent_events.len());
        truncate_oldest(&mut self.long_term, limits.long_term);
        truncate_oldest(&mut self.short_term.recent_events, limits.short_term);
        before != (self.long_term.len(), self.short_term.recent_events.len())
    }

    /// Renders the newest `count` long-term entries, one bullet per line
    pub fn summarize(&self, count: usize) -> String {
        if self.long_term.is_empty() {
            return NO_MEMORIES.to_string();
        }
        let start = self.long_term.len().saturating_sub(count);
        self.long_term[start..]
            .iter()
            .map(|entry| format!("- {}", entry))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Long-term entries as they may appear on disk
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Structured(MemoryEntry),
    Joined(String),
}

/// On-disk shape, including older variants
#[derive(Debug, Deserialize)]
struct StoredRecord {
    #[serde(default)]
    name: Option<String>,
    traits: BTreeMap<String, f64>,
    goals: Vec<String>,
    memory: Vec<StoredEntry>,
    #[serde(default)]
    short_term: ShortTermWindow,
}

impl From<StoredRecord> for MemoryRecord {
    fn from(stored: StoredRecord) -> Self {
        let long_term = stored
            .memory
            .into_iter()
            .map(|entry| match entry {
                StoredEntry::Structured(entry) => entry,
                StoredEntry::Joined(joined) => MemoryEntry::from_joined(&joined),
            })
            .collect();

        Self {
            owner: stored.name,
            traits: stored.traits,
            goals: stored.goals,
            long_term,
            short_term: stored.short_term,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let record = MemoryRecord::default();
        assert_eq!(record.traits.get("curiosity"), Some(&0.6));
        assert_eq!(record.goals, vec!["seek adventure", "earn wealth"]);
        assert!(record.long_term.is_empty());
        assert_eq!(record.summarize(5), NO_MEMORIES);
    }

    #[test]
    fn test_push_memory_evicts_oldest() {
        let mut record = MemoryRecord::default();
        for day in 1..=7 {
            record.push_memory(MemoryEntry::new(format!("Action {}", day), "ok"), 5);
        }

        assert_eq!(record.long_term.len(), 5);
        assert_eq!(record.long_term[0].action, "Action 3");
        assert_eq!(record.long_term[4].action, "Action 7");
    }

    #[test]
    fn test_summarize_bullets() {
        let mut record = MemoryRecord::default();
        record.push_memory(MemoryEntry::new("Get Drunk", "Gain +20 mood"), 5);
        record.push_memory(
            MemoryEntry::new("Chat with Keeper", "Receive a gift from Keeper → +20 money"),
            5,
        );

        assert_eq!(
            record.summarize(5),
            "- Get Drunk → Gain +20 mood\n- Chat with Keeper → Receive a gift from Keeper → +20 money"
        );
        assert_eq!(
            record.summarize(1),
            "- Chat with Keeper → Receive a gift from Keeper → +20 money"
        );
    }

    #[test]
    fn test_from_joined() {
        assert_eq!(
            MemoryEntry::from_joined("Chat with Keeper → Fight the Keeper → Nothing happens"),
            MemoryEntry::new("Chat with Keeper", "Fight the Keeper → Nothing happens")
        );
        assert_eq!(
            MemoryEntry::from_joined("Reflection: I should rest more"),
            MemoryEntry::new(REFLECTION_ACTION, "I should rest more")
        );
        assert_eq!(
            MemoryEntry::from_joined("Cyrus performs talk on merchant"),
            MemoryEntry::new("Cyrus performs talk on merchant", "")
        );
    }

    #[test]
    fn test_legacy_shapes_normalize() {
        let json = r#"{
            "traits": {"curiosity": 0.5, "greed": 0.3},
            "goals": ["explore the world"],
            "memory": [
                "Get Drunk → Lose 0.5 money",
                {"action": "Chat with Keeper", "outcome": "Keeper discourages you (-10 mood)"}
            ]
        }"#;

        let record: MemoryRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.long_term.len(), 2);
        assert_eq!(record.long_term[0], MemoryEntry::new("Get Drunk", "Lose 0.5 money"));
        assert!(record.short_term.recent_events.is_empty());

        assert_eq!(record.owner, None);

        let saved = serde_json::to_value(&record).unwrap();
        assert!(saved.get("name").is_none());
        assert_eq!(saved["memory"][0]["action"], "Get Drunk");
        assert_eq!(saved["short_term"]["recent_events"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_goals_is_an_error() {
        let json = r#"{"traits": {}, "memory": []}"#;
        assert!(serde_json::from_str::<MemoryRecord>(json).is_err());
    }

    #[test]
    fn test_enforce_limits() {
        let mut record = MemoryRecord::default();
        for i in 0..8 {
            record.long_term.push(MemoryEntry::new(format!("a{}", i), ""));
            record.short_term.recent_events.push(format!("e{}", i));
        }

        assert!(record.enforce_limits(MemoryLimits::default()));
        assert_eq!(record.long_term.first().unwrap().action, "a3");
        assert_eq!(record.short_term.recent_events.first().unwrap(), "e3");
        assert!(!record.enforce_limits(MemoryLimits::default()));
    }
}
