// src/utils/richtext.rs

//! Post text composition and facet span detection.
//!
//! Bluesky posts carry rich-text annotations ("facets") as UTF-8 byte
//! ranges over the post text. Spans are detected after truncation so a
//! range can never point past the end of the final text.

use std::sync::OnceLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::FeedItem;

/// A detected rich-text span, byte-indexed into the post text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
}

/// What a detected span refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    /// An inline URL
    Link(String),
    /// An @-mention; the handle is stored without the leading `@`
    Mention(String),
}

fn link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s]+").unwrap())
}

fn mention_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Handles are domain-like: letters, digits, dots and dashes.
    RE.get_or_init(|| Regex::new(r"(?:^|\s)(@[A-Za-z0-9][A-Za-z0-9.-]*)").unwrap())
}

/// Compose the post text for a feed item.
///
/// Sections are separated by blank lines; the comments section is omitted
/// when the feed did not provide one.
pub fn compose(item: &FeedItem) -> String {
    match &item.comments {
        Some(comments) => format!("{}\n\n{}\n\n{}", item.title, comments, item.link),
        None => format!("{}\n\n{}", item.title, item.link),
    }
}

/// Truncate text to a prefix of at most `limit` grapheme clusters.
///
/// Returns the input unchanged when it is already within the limit.
pub fn truncate_graphemes(text: &str, limit: usize) -> String {
    if text.graphemes(true).count() <= limit {
        return text.to_string();
    }
    text.graphemes(true).take(limit).collect()
}

/// Detect link and mention spans in the post text.
///
/// Spans are returned in text order. Trailing punctuation is not treated
/// as part of a link.
pub fn find_spans(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();

    for m in link_regex().find_iter(text) {
        let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '"', '\'']);
        if trimmed.is_empty() {
            continue;
        }
        spans.push(TextSpan {
            start: m.start(),
            end: m.start() + trimmed.len(),
            kind: SpanKind::Link(trimmed.to_string()),
        });
    }

    for caps in mention_regex().captures_iter(text) {
        if let Some(m) = caps.get(1) {
            let handle = m.as_str().trim_start_matches('@');
            spans.push(TextSpan {
                start: m.start(),
                end: m.end(),
                kind: SpanKind::Mention(handle.to_string()),
            });
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_item() -> FeedItem {
        FeedItem {
            title: "Interesting article".to_string(),
            link: "https://example.com/article".to_string(),
            comments: Some("https://news.example.com/item?id=1".to_string()),
            published: None,
        }
    }

    #[test]
    fn test_compose_with_comments() {
        let text = compose(&sample_item());
        assert_eq!(
            text,
            "Interesting article\n\nhttps://news.example.com/item?id=1\n\nhttps://example.com/article"
        );
    }

    #[test]
    fn test_compose_without_comments() {
        let mut item = sample_item();
        item.comments = None;
        assert_eq!(
            compose(&item),
            "Interesting article\n\nhttps://example.com/article"
        );
    }

    #[test]
    fn test_truncate_noop_within_limit() {
        assert_eq!(truncate_graphemes("short", 300), "short");
    }

    #[test]
    fn test_truncate_takes_grapheme_prefix() {
        let text = "a".repeat(400);
        let truncated = truncate_graphemes(&text, 300);
        assert_eq!(truncated.len(), 300);
    }

    #[test]
    fn test_truncate_counts_graphemes_not_bytes() {
        // Each family emoji is one grapheme but many bytes.
        let text = "👨‍👩‍👧‍👦".repeat(10);
        let truncated = truncate_graphemes(&text, 3);
        assert_eq!(truncated.graphemes(true).count(), 3);
        assert_eq!(truncated, "👨‍👩‍👧‍👦".repeat(3));
    }

    #[test]
    fn test_find_link_span() {
        let text = "read this: https://example.com/a";
        let spans = find_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].start, 11);
        assert_eq!(spans[0].end, text.len());
        assert_eq!(
            spans[0].kind,
            SpanKind::Link("https://example.com/a".to_string())
        );
    }

    #[test]
    fn test_link_trailing_punctuation_excluded() {
        let spans = find_spans("see https://example.com/a.");
        assert_eq!(
            spans[0].kind,
            SpanKind::Link("https://example.com/a".to_string())
        );
        assert_eq!(&"see https://example.com/a."[spans[0].start..spans[0].end],
            "https://example.com/a");
    }

    #[test]
    fn test_mention_span() {
        let text = "thanks @alice.bsky.social for the tip";
        let spans = find_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].kind, SpanKind::Mention("alice.bsky.social".to_string()));
        assert_eq!(&text[spans[0].start..spans[0].end], "@alice.bsky.social");
    }

    #[test]
    fn test_spans_with_multibyte_prefix() {
        // Byte offsets must account for multibyte characters before the span.
        let text = "café → https://example.com/x";
        let spans = find_spans(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            &text[spans[0].start..spans[0].end],
            "https://example.com/x"
        );
    }

    #[test]
    fn test_spans_sorted_in_text_order() {
        let text = "@bob.test wrote https://example.com/b";
        let spans = find_spans(text);
        assert_eq!(spans.len(), 2);
        assert!(matches!(spans[0].kind, SpanKind::Mention(_)));
        assert!(matches!(spans[1].kind, SpanKind::Link(_)));
    }

    #[test]
    fn test_email_is_not_a_mention() {
        let spans = find_spans("contact bob@example.com please");
        assert!(spans.is_empty());
    }
}
