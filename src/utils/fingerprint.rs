// src/utils/fingerprint.rs

//! Item fingerprinting for duplicate detection.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of an item's identifying URL.
///
/// SHA-256 over the UTF-8 bytes, lowercase hex encoded. The same input
/// always yields the same fingerprint.
///
/// # Examples
/// ```
/// use feedsky::utils::fingerprint;
///
/// assert_eq!(fingerprint("a"), fingerprint("a"));
/// assert_ne!(fingerprint("a"), fingerprint("b"));
/// ```
pub fn fingerprint(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let url = "https://example.com/post/1";
        assert_eq!(fingerprint(url), fingerprint(url));
    }

    #[test]
    fn test_distinct_inputs() {
        assert_ne!(
            fingerprint("https://example.com/post/1"),
            fingerprint("https://example.com/post/2")
        );
    }

    #[test]
    fn test_hex_digest_shape() {
        let fp = fingerprint("https://example.com");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_known_vector() {
        // SHA-256 of the empty string
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
