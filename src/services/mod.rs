//! Service layer for the bot application.
//!
//! This module contains the external collaborators:
//! - RSS feed fetching (`FeedClient`)
//! - Bluesky XRPC client (`BskyAgent`) and publishing (`BskyPublisher`)
//! - Open-Graph metadata scraping (`fetch_metadata`)
//! - Link-preview embed building (`build_external_embed`)

pub mod bsky;
pub mod embed;
pub mod feed;
pub mod metadata;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{FeedItem, PostReceipt};

pub use bsky::{BskyAgent, BskyPublisher};
pub use embed::build_external_embed;
pub use feed::FeedClient;
pub use metadata::{fetch_metadata, PageMetadata};

/// Trait for publishing collaborators.
///
/// The publish loop only depends on this interface, so tests can swap in
/// a scripted publisher.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a single feed item, returning a receipt on success.
    async fn publish(&self, item: &FeedItem) -> Result<PostReceipt>;
}
