/// Article page fetching
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ScrapeConfig;
use crate::error::Result;

/// Source of article HTML.
///
/// A failed fetch is not an error for callers: it means "no HTML for this page".
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

/// HTTP page source
#[derive(Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Client shared with other HTTP consumers such as the feed fetch
    pub fn client(&self) -> &Client {
        &self.client
    }

    async fn try_fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        match self.try_fetch(url).await {
            Ok(html) if !html.is_empty() => {
                debug!("📄 Downloaded {} characters from {}", html.len(), url);
                Some(html)
            }
            Ok(_) => {
                warn!("⚠️ Empty page: {}", url);
                None
            }
            Err(e) => {
                warn!("⚠️ Fetch error for {}: {}", url, e);
                None
            }
        }
    }
}
