//! Publish history: a bounded, ordered list of item fingerprints.

use serde::{Deserialize, Serialize};

/// Ordered list of fingerprints for already-published items, oldest first.
///
/// Serialized as a plain JSON array of hex strings. The length bound is
/// enforced at persist time by [`evict_to`](History::evict_to), not on
/// insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct History {
    entries: Vec<String>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from existing entries, oldest first.
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Whether a fingerprint is already recorded.
    pub fn contains(&self, fingerprint: &str) -> bool {
        self.entries.iter().any(|e| e == fingerprint)
    }

    /// Append a fingerprint as the newest entry.
    pub fn push(&mut self, fingerprint: String) {
        self.entries.push(fingerprint);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Drop oldest entries until at most `limit` remain.
    ///
    /// Returns the number of evicted entries.
    pub fn evict_to(&mut self, limit: usize) -> usize {
        if self.entries.len() <= limit {
            return 0;
        }
        let excess = self.entries.len() - limit;
        self.entries.drain(..excess);
        excess
    }
}
