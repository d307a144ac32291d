/// Lightning Recs - podcast recommendation dataset tooling
///
/// Builds and maintains a JSON dataset of podcast guest recommendations: links
/// each episode to its article, scrapes the article's bullet links to attach URLs
/// to recommended books, shows and products, and collects the guest's
/// "Where to find" links.

pub mod article;
pub mod config;
pub mod dataset;
pub mod enrichment;
pub mod error;
pub mod feed;
pub mod fetch;
pub mod report;

// Re-export main types for easy access
pub use crate::article::{
    best_match_url, extract_bullet_links, extract_where_to_find, normalize, similarity, BulletLink,
    ItemMatcher, MatchOutcome, WhereToFindEntry, WhereToFindExtractor,
};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::dataset::{Dataset, Episode, Recommendation};
pub use crate::enrichment::{Enricher, EnrichmentSummary};
pub use crate::error::RecsError;
pub use crate::fetch::{HttpPageSource, PageSource};
pub use crate::report::CoverageReport;
