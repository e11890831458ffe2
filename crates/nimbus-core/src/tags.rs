//! # Canonical Tag Sets
//!
//! Tags are opaque string labels the backend uses to target subsets of
//! registered devices. Two registrations are comparable only after both tag
//! sets are in canonical form, so [`TagSet`] enforces the canonical form at
//! construction: sorted, deduplicated, no empty entries.
//!
//! ## Canonical Form & Codec
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       TagSet Lifecycle                                  │
//! │                                                                         │
//! │  caller input          canonical set           persisted form          │
//! │  ["sports","news",     ──────────────►         ──────────────►         │
//! │   "news"]              {news, sports}          "news,sports"           │
//! │                                                                         │
//! │                        decode("news,sports")   == original set         │
//! │                        decode(",news,,sports") == {news, sports}       │
//! │                                (empty entries dropped)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tags containing the delimiter are rejected at construction, which makes
//! `encode`/`decode` a total round trip rather than one with documented
//! corruption cases.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::LIST_DELIMITER;

// =============================================================================
// TagSet
// =============================================================================

/// A canonical (sorted, deduplicated) set of subscription tags.
///
/// Equality is exact-string and order-independent: any two `TagSet`s built
/// from the same tags compare equal regardless of input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    // Sorted ascending, unique, no empty strings, no delimiter characters.
    tags: Vec<String>,
}

impl TagSet {
    /// Creates an empty tag set.
    pub fn new() -> Self {
        TagSet::default()
    }

    /// Builds a canonical tag set from arbitrary caller input.
    ///
    /// Input is sorted and deduplicated; empty entries are dropped. A tag
    /// containing the list delimiter is rejected with
    /// [`CoreError::InvalidTag`].
    pub fn from_tags<I, S>(tags: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut collected: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.into();
            if tag.is_empty() {
                continue;
            }
            if tag.contains(LIST_DELIMITER) {
                return Err(CoreError::InvalidTag {
                    tag,
                    delimiter: LIST_DELIMITER,
                });
            }
            collected.push(tag);
        }
        collected.sort();
        collected.dedup();
        Ok(TagSet { tags: collected })
    }

    /// Decodes the persisted delimited form.
    ///
    /// Empty entries (from leading, trailing or doubled delimiters) are
    /// dropped; the result is re-canonicalized so a hand-edited file still
    /// decodes to a valid set.
    pub fn decode(encoded: &str) -> Self {
        let mut tags: Vec<String> = encoded
            .split(LIST_DELIMITER)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        tags.sort();
        tags.dedup();
        TagSet { tags }
    }

    /// Encodes the set into its persisted delimited form.
    pub fn encode(&self) -> String {
        self.tags.join(&LIST_DELIMITER.to_string())
    }

    /// Returns true if the set contains `tag`.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    /// Returns a new set with every tag in `other` removed.
    ///
    /// Tags in `other` that are not present are silently ignored; partial
    /// unregistration is a set difference, not a strict removal.
    pub fn difference(&self, other: &TagSet) -> TagSet {
        TagSet {
            tags: self
                .tags
                .iter()
                .filter(|tag| !other.contains(tag))
                .cloned()
                .collect(),
        }
    }

    /// Number of tags in the set.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates tags in canonical (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
