// src/services/feed.rs

//! RSS feed fetching.

use rss::Channel;

use crate::error::Result;
use crate::models::FeedItem;

/// Client for fetching and parsing RSS feeds.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    /// Create a new feed client sharing the application HTTP client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the feed and return its items in native order (newest first).
    ///
    /// Fetch or parse failures degrade to an empty list so the rest of the
    /// run can proceed as "no new items".
    pub async fn fetch_items(&self, url: &str) -> Vec<FeedItem> {
        match self.try_fetch(url).await {
            Ok(items) => {
                log::debug!("Fetched {} feed items from {}", items.len(), url);
                items
            }
            Err(e) => {
                log::error!("Failed to fetch RSS feed {}: {}", url, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, url: &str) -> Result<Vec<FeedItem>> {
        let body = self.client.get(url).send().await?.bytes().await?;
        parse_items(&body)
    }
}

/// Parse feed XML into items, dropping entries without a link.
fn parse_items(bytes: &[u8]) -> Result<Vec<FeedItem>> {
    let channel = Channel::read_from(bytes)?;
    Ok(channel.items().iter().filter_map(FeedItem::from_rss).collect())
}
