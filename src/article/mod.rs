/// Article page analysis
///
/// This module turns an episode's article HTML into labeled links and matches
/// lightning-round recommendations against them. Everything here is pure: no I/O,
/// and malformed markup simply yields fewer results.

pub mod normalize;
pub mod similarity;
pub mod bullets;
pub mod where_to_find;
pub mod matcher;

// Re-export main types
pub use bullets::extract_bullet_links;
pub use matcher::{best_match_url, ItemMatcher, MatchOutcome};
pub use normalize::normalize;
pub use similarity::similarity;
pub use where_to_find::{extract_where_to_find, WhereToFindExtractor};

use serde::{Deserialize, Serialize};

/// One bullet item found in an article: the displayed label and its link target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulletLink {
    /// Label text shown before the link, trimmed
    pub name: String,
    /// Absolute HTTP(S) URL
    pub url: String,
}

impl BulletLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// One link listed under a "Where to find {Guest}:" header
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WhereToFindEntry {
    /// Platform label, e.g. "X" or "LinkedIn"
    pub label: String,
    /// Absolute HTTP(S) URL
    pub url: String,
}

impl WhereToFindEntry {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}
