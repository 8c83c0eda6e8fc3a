//! Storage abstractions for publish-history persistence.
//!
//! The history is a bounded JSON array of fingerprints. Loading and
//! persisting both fail soft: a missing or unreadable file is an empty
//! history, and a failed write never affects the run's outcome.

pub mod local;

use async_trait::async_trait;

use crate::models::History;

// Re-export for convenience
pub use local::JsonHistoryStore;

/// Trait for publish-history storage backends.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Whether a persisted history already exists.
    ///
    /// Existence, not content, is what distinguishes a first run from a
    /// steady-state run.
    async fn exists(&self) -> bool;

    /// Load the persisted history.
    ///
    /// Missing or invalid data yields an empty history, never an error.
    async fn load(&self) -> History;

    /// Persist the history, evicting oldest entries down to `limit`.
    ///
    /// Skips the write entirely when `history` is empty, so a run that
    /// published nothing cannot wipe an existing nonempty file. I/O
    /// failures are logged and swallowed.
    async fn persist(&self, limit: usize, history: &History);
}
