// src/services/embed.rs

//! Link-preview embed building.
//!
//! Best-effort chain: scrape metadata, download the cover image, re-encode
//! it as a bounded JPEG, upload it as a blob, assemble the card. Any
//! failure along the way drops the card; the post itself still goes out.

use std::io::Cursor;

use image::imageops::FilterType;
use image::ImageFormat;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{EmbedConfig, ExternalCard, ExternalEmbed, EMBED_EXTERNAL_TYPE};
use crate::services::{metadata, BskyAgent};
use crate::utils::http;

/// Build an external embed card for a URL, or `None` when disabled or on
/// any failure.
pub async fn build_external_embed(
    agent: &BskyAgent,
    config: &EmbedConfig,
    url: &str,
) -> Option<ExternalEmbed> {
    if !config.enabled {
        return None;
    }
    match try_build(agent, config, url).await {
        Ok(card) => Some(card),
        Err(e) => {
            log::error!("Error building embed card for {}: {}", url, e);
            None
        }
    }
}

async fn try_build(agent: &BskyAgent, config: &EmbedConfig, url: &str) -> Result<ExternalEmbed> {
    let metadata = metadata::fetch_metadata(agent.http(), url).await?;

    let image_url = metadata
        .image
        .as_deref()
        .ok_or_else(|| AppError::embed("page has no og:image"))?;
    // og:image may be relative to the page URL.
    let image_url = Url::parse(url)?.join(image_url)?;

    let bytes = http::fetch_bytes(agent.http(), image_url.as_str()).await?;
    let thumbnail = encode_thumbnail(&bytes, config)?;
    let blob = agent.upload_blob(thumbnail, "image/jpeg").await?;

    Ok(ExternalEmbed {
        embed_type: EMBED_EXTERNAL_TYPE.to_string(),
        external: ExternalCard {
            uri: url.to_string(),
            title: metadata.title.unwrap_or_default(),
            description: metadata.description.unwrap_or_default(),
            thumb: Some(blob),
        },
    })
}

/// Re-encode an image as JPEG, bounded to the configured dimensions.
///
/// Oversized originals would fail the blob upload; re-encoding keeps the
/// thumbnail under the platform size cap.
fn encode_thumbnail(bytes: &[u8], config: &EmbedConfig) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;
    let img = if config.resize {
        img.resize(config.image_width, config.image_height, FilterType::Triangle)
    } else {
        img
    };

    let mut out = Cursor::new(Vec::new());
    img.to_rgb8().write_to(&mut out, ImageFormat::Jpeg)?;
    Ok(out.into_inner())
}
