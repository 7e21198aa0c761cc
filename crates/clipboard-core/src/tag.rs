//! Tag normalization and identity.
//!
//! Every path that turns raw tag text into a storage key (message creation,
//! tag replacement, tag search) goes through [`hash_tag`]. Changing
//! [`normalize`] changes every stored key.

use std::collections::HashSet;

use md5::{Digest, Md5};

/// Length of a hashed tag: hex-encoded 128-bit digest.
pub const HASHED_TAG_LEN: usize = 32;

/// A tag ready to be upserted: identity plus display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub hashed_tag: String,
    pub raw_tag: String,
}

/// Trim surrounding whitespace, then lowercase.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Hex MD5 of the normalized tag text.
pub fn hash_tag(raw: &str) -> String {
    let digest = Md5::digest(normalize(raw).as_bytes());
    hex::encode(digest.as_slice())
}

/// Turn a request's raw tags into upsertable tags.
///
/// Tags that normalize to nothing are dropped, and tags sharing an identity
/// collapse to their first occurrence so a relation insert never repeats a
/// `(message, tag)` pair. Display text keeps its case but loses surrounding
/// whitespace.
pub fn prepare_tags<S: AsRef<str>>(raw_tags: &[S]) -> Vec<NewTag> {
    let mut seen = HashSet::with_capacity(raw_tags.len());
    let mut tags = Vec::with_capacity(raw_tags.len());

    for raw in raw_tags {
        let raw = raw.as_ref().trim();
        if raw.is_empty() {
            continue;
        }
        let hashed_tag = hash_tag(raw);
        if seen.insert(hashed_tag.clone()) {
            tags.push(NewTag {
                hashed_tag,
                raw_tag: raw.to_string(),
            });
        }
    }

    tags
}

pub fn hashes(tags: &[NewTag]) -> Vec<String> {
    tags.iter().map(|t| t.hashed_tag.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic_and_fixed_width() {
        let a = hash_tag("rust");
        let b = hash_tag("rust");
        assert_eq!(a, b);
        assert_eq!(a.len(), HASHED_TAG_LEN);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn hash_matches_known_digest() {
        // md5("rust")
        assert_eq!(hash_tag("rust"), "72812e30873455dcee2ce2d1ee26e4ab");
    }

    #[test]
    fn normalization_applies_before_hashing() {
        assert_eq!(hash_tag("  Rust\t"), hash_tag("rust"));
        assert_eq!(hash_tag("RUST"), hash_tag("rust"));
        assert_ne!(hash_tag("rust"), hash_tag("rusty"));
    }

    #[test]
    fn prepare_drops_blank_and_duplicate_tags() {
        let tags = prepare_tags(&["Rust", " ", "", "rust ", "Go"]);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].raw_tag, "Rust");
        assert_eq!(tags[0].hashed_tag, hash_tag("rust"));
        assert_eq!(tags[1].raw_tag, "Go");
        assert_eq!(hashes(&tags), vec![hash_tag("rust"), hash_tag("go")]);
    }

    #[test]
    fn prepare_empty_input() {
        let none: [&str; 0] = [];
        assert!(prepare_tags(&none).is_empty());
    }
}
