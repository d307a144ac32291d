use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for the recommendations tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Dataset file locations
    pub dataset: DatasetConfig,

    /// Article fetching settings
    pub scrape: ScrapeConfig,

    /// Item-to-link matching settings
    pub matching: MatchingConfig,

    /// "Where to find" section settings
    pub where_to_find: WhereToFindConfig,

    /// Podcast feed settings
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// The recommendations JSON file
    pub path: PathBuf,

    /// Copy of the dataset served by the web front-end, refreshed after each save
    pub publish_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// User agent sent with article requests
    pub user_agent: String,

    /// HTTP request timeout in seconds
    pub request_timeout_seconds: u64,

    /// Delay between article fetches in milliseconds
    pub rate_limit_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum fuzzy similarity for a link to be accepted
    pub fuzzy_threshold: f64,

    /// Minimum normalized length for the containment shortcut
    pub min_substring_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhereToFindConfig {
    /// Sections whose name contains one of these (case-insensitive) are skipped.
    /// Defaults to the podcast host's own name variants.
    pub excluded_names: Vec<String>,

    /// Skip sections that do not name one of the episode's guests
    pub restrict_to_guests: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Podcast RSS feed listing episode article URLs
    pub rss_url: String,

    /// Episodes whose filename contains this marker never get an article URL
    pub compilation_marker: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("recommendations.json"),
            publish_path: Some(PathBuf::from("web/public/recommendations.json")),
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36".to_string(),
            request_timeout_seconds: 10,
            rate_limit_ms: 500,
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.65,
            min_substring_chars: 3,
        }
    }
}

impl Default for WhereToFindConfig {
    fn default() -> Self {
        Self {
            excluded_names: vec![
                "lenny".to_string(),
                "lennyrachitsky".to_string(),
                "lennysnewsletter".to_string(),
                "rachitsky".to_string(),
            ],
            restrict_to_guests: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rss_url: "https://api.substack.com/feed/podcast/10845.rss".to_string(),
            compilation_marker: "Compilation".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let config_paths = ["lightning-recs.toml", "config/lightning-recs.toml"];

        for path in &config_paths {
            if Path::new(path).exists() {
                return Self::load_from(Path::new(path));
            }
        }

        Self::from_env(Self::default())
    }

    /// Load configuration from a specific file, then apply environment overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config {}: {}", path.display(), e))?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Self::from_env(config)
    }

    /// Override settings from environment variables
    pub fn from_env(mut config: Self) -> Result<Self> {
        if let Ok(path) = std::env::var("LIGHTNING_RECS_DATASET") {
            config.dataset.path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("LIGHTNING_RECS_FEED_URL") {
            config.feed.rss_url = url;
        }

        if let Ok(delay) = std::env::var("LIGHTNING_RECS_RATE_LIMIT_MS") {
            config.scrape.rate_limit_ms = delay
                .parse()
                .map_err(|_| anyhow!("LIGHTNING_RECS_RATE_LIMIT_MS must be an integer, got {}", delay))?;
        }

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.matching.fuzzy_threshold) {
            return Err(anyhow!(
                "fuzzy_threshold must be between 0.0 and 1.0, got {}",
                self.matching.fuzzy_threshold
            ));
        }

        if self.scrape.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }

        if self.dataset.path.as_os_str().is_empty() {
            return Err(anyhow!("dataset path must not be empty"));
        }

        if self.where_to_find.excluded_names.iter().any(|n| n.trim().is_empty()) {
            return Err(anyhow!("excluded_names must not contain empty entries"));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "Recommendations Configuration:\n\
            - Dataset: {}\n\
            - Publish copy: {}\n\
            - Request timeout: {}s\n\
            - Rate limit: {}ms\n\
            - Fuzzy threshold: {:.2}\n\
            - Excluded sections: {}\n\
            - Feed: {}",
            self.dataset.path.display(),
            self.dataset
                .publish_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.scrape.request_timeout_seconds,
            self.scrape.rate_limit_ms,
            self.matching.fuzzy_threshold,
            self.where_to_find.excluded_names.join(", "),
            self.feed.rss_url
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_dataset(mut self, path: PathBuf) -> Self {
        self.config.dataset.path = path;
        self
    }

    pub fn with_publish_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.dataset.publish_path = path;
        self
    }

    pub fn with_rate_limit_ms(mut self, delay: u64) -> Self {
        self.config.scrape.rate_limit_ms = delay;
        self
    }

    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.matching.fuzzy_threshold = threshold;
        self
    }

    pub fn with_excluded_names(mut self, names: Vec<String>) -> Self {
        self.config.where_to_find.excluded_names = names;
        self
    }

    pub fn restrict_to_guests(mut self, enable: bool) -> Self {
        self.config.where_to_find.restrict_to_guests = enable;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
