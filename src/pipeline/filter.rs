// src/pipeline/filter.rs

//! Duplicate filtering against the publish history.

use crate::models::{FeedItem, History};
use crate::utils::fingerprint;

/// Retain the items whose fingerprints are not yet in the history.
///
/// Input order (the feed's native order, newest first) is preserved. An
/// empty history short-circuits: every item is new, so the fingerprint
/// pass is skipped entirely.
pub fn filter_new(items: &[FeedItem], history: &History) -> Vec<FeedItem> {
    if history.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| !history.contains(&fingerprint(&item.link)))
        .cloned()
        .collect()
}
