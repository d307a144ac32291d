use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by dataset and feed handling.
///
/// Article extraction and matching never fail; they only produce fewer results.
#[derive(Debug, Error)]
pub enum RecsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON in {path}: {source}")]
    DatasetFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize dataset: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to parse podcast feed: {0}")]
    Feed(#[from] feed_rs::parser::ParseFeedError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, RecsError>;
