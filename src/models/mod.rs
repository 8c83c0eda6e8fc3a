// src/models/mod.rs

//! Domain models for the bot application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod feed;
mod history;
mod post;

// Re-export all public types
pub use config::{
    BotOptions, Config, Credentials, EmbedConfig, HttpConfig, PostConfig, DEFAULT_CACHE_FILE,
};
pub use feed::FeedItem;
pub use history::History;
pub use post::{
    BlobRef, ByteSlice, CidLink, ExternalCard, ExternalEmbed, Facet, FacetFeature, PostReceipt,
    PostRecord, Session, EMBED_EXTERNAL_TYPE, POST_RECORD_TYPE,
};
