// src/services/metadata.rs

//! Open-Graph metadata scraping for link previews.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::utils::http;

/// Metadata scraped from a page's head.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    /// `og:image` URL, possibly relative to the page
    pub image: Option<String>,
}

/// Fetch a page and scrape its Open-Graph metadata.
pub async fn fetch_metadata(client: &reqwest::Client, url: &str) -> Result<PageMetadata> {
    let body = http::fetch_text(client, url).await?;
    Ok(extract_metadata(&body))
}

/// Extract Open-Graph metadata from an HTML document.
///
/// Falls back to the `<title>` element when `og:title` is absent.
pub fn extract_metadata(html: &str) -> PageMetadata {
    let doc = Html::parse_document(html);

    let title = og_content(&doc, "og:title").or_else(|| page_title(&doc));
    let description = og_content(&doc, "og:description");
    let image = og_content(&doc, "og:image");

    PageMetadata {
        title,
        description,
        image,
    }
}

fn og_content(doc: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    doc.select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn page_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
