// src/pipeline/publish.rs

//! The publish loop: post new items in order under a per-run quota.

use crate::models::{FeedItem, History};
use crate::services::Publisher;
use crate::utils::fingerprint;

/// Summary of a publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Items handed to the loop
    pub attempted: usize,
    /// Successful publishes
    pub published: usize,
    /// Items skipped because the quota was reached
    pub skipped: usize,
    /// Items whose publish call failed
    pub failed: usize,
}

/// Publish items sequentially, oldest first, stopping new attempts once
/// `quota` items went out.
///
/// Successful items are appended to `history` in publish order. Items
/// over quota are skipped and NOT recorded, so they stay candidates for
/// the next run. A failing publish call is logged and never aborts the
/// loop; the failed item is likewise retried next run.
pub async fn publish_new_items(
    publisher: &dyn Publisher,
    items: &[FeedItem],
    quota: usize,
    history: &mut History,
) -> PublishOutcome {
    let mut outcome = PublishOutcome {
        attempted: items.len(),
        ..PublishOutcome::default()
    };

    for item in items {
        let hash = fingerprint(&item.link);
        log::debug!("Posting: '{}' with hash {}", item.title, hash);

        if outcome.published >= quota {
            log::debug!(
                "Skipping: '{}' with hash {} due to post limit {}",
                item.title,
                hash,
                quota
            );
            outcome.skipped += 1;
            continue;
        }

        match publisher.publish(item).await {
            Ok(receipt) => {
                log::debug!("Posted '{}' as {}", item.title, receipt.uri);
                outcome.published += 1;
                history.push(hash);
            }
            Err(e) => {
                log::error!("Failed to post item '{}' ({}): {}", item.title, hash, e);
                outcome.failed += 1;
            }
        }
    }

    outcome
}
