use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use super::Episode;
use crate::error::{RecsError, Result};

/// The whole recommendations file, held in memory and rewritten in full on save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(transparent)]
pub struct Dataset {
    pub episodes: Vec<Episode>,
}

impl Dataset {
    pub fn new(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }

    /// Load the dataset from a JSON file
    pub async fn load(path: &Path) -> Result<Self> {
        info!("📂 Loading {}...", path.display());
        let content = fs::read_to_string(path).await.map_err(|source| RecsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let dataset = Self::from_json(&content).map_err(|source| RecsError::DatasetFormat {
            path: path.to_path_buf(),
            source,
        })?;
        info!("✅ Loaded {} episodes", dataset.len());
        Ok(dataset)
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Pretty JSON with two-space indentation; non-ASCII text is written as-is.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Overwrite the file with the current in-memory state
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json).await.map_err(|source| RecsError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        info!("💾 Saved {} episodes to {}", self.len(), path.display());
        Ok(())
    }

    /// Copy a saved dataset file to the web front-end's data location
    pub async fn publish(source: &Path, destination: &Path) -> Result<()> {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|source| RecsError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(source, destination).await.map_err(|source_err| RecsError::Write {
            path: destination.to_path_buf(),
            source: source_err,
        })?;
        info!("📤 Published dataset to {}", destination.display());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Episodes that have an article URL
    pub fn with_article_count(&self) -> usize {
        self.episodes.iter().filter(|ep| ep.article_url().is_some()).count()
    }
}
