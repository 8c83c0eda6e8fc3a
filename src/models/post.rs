//! Bluesky wire types for sessions, post records and embeds.
//!
//! Field names follow the atproto lexicons (camelCase, `$type` tags), so
//! these structs serialize directly into XRPC request bodies.

use serde::{Deserialize, Serialize};

/// Record type for a feed post.
pub const POST_RECORD_TYPE: &str = "app.bsky.feed.post";

/// Embed type for an external link-preview card.
pub const EMBED_EXTERNAL_TYPE: &str = "app.bsky.embed.external";

/// An authenticated session returned by `com.atproto.server.createSession`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_jwt: String,
    pub did: String,
    pub handle: String,
}

/// An `app.bsky.feed.post` record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "$type")]
    pub record_type: String,

    pub text: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed: Option<ExternalEmbed>,

    /// RFC 3339 creation timestamp
    pub created_at: String,

    pub langs: Vec<String>,
}

/// A rich-text annotation over a UTF-8 byte range of the post text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Facet {
    pub index: ByteSlice,
    pub features: Vec<FacetFeature>,
}

/// Byte range of a facet within the post text.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ByteSlice {
    pub byte_start: usize,
    pub byte_end: usize,
}

/// What a facet points at.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "$type")]
pub enum FacetFeature {
    #[serde(rename = "app.bsky.richtext.facet#link")]
    Link { uri: String },

    #[serde(rename = "app.bsky.richtext.facet#mention")]
    Mention { did: String },
}

/// An external link-preview embed.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalEmbed {
    #[serde(rename = "$type")]
    pub embed_type: String,

    pub external: ExternalCard,
}

/// The card contents of an external embed.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalCard {
    pub uri: String,
    pub title: String,
    pub description: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumb: Option<BlobRef>,
}

/// A blob reference returned by `com.atproto.repo.uploadBlob`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobRef {
    #[serde(rename = "$type")]
    pub blob_type: String,

    #[serde(rename = "ref")]
    pub cid: CidLink,

    #[serde(rename = "mimeType")]
    pub mime_type: String,

    pub size: u64,
}

/// CID link wrapper (`{"$link": "..."}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// Receipt for a created record.
#[derive(Debug, Clone, Deserialize)]
pub struct PostReceipt {
    pub uri: String,
    pub cid: String,
}
