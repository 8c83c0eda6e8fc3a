//! Feed item data structure.

use serde::{Deserialize, Serialize};

/// A single entry fetched from an RSS feed.
///
/// The `link` is the item's stable unique URL and is the sole identity
/// used for duplicate detection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    /// Entry title
    pub title: String,

    /// Stable unique URL of the entry
    pub link: String,

    /// Discussion/comments URL, when the feed provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,

    /// Publication date string as given by the feed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

impl FeedItem {
    /// Convert an RSS item, dropping entries without a link.
    pub fn from_rss(item: &rss::Item) -> Option<Self> {
        let link = item.link()?.to_string();
        Some(Self {
            title: item.title().unwrap_or_default().to_string(),
            link,
            comments: item.comments().map(str::to_string),
            published: item.pub_date().map(str::to_string),
        })
    }
}
