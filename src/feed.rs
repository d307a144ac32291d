/// Podcast feed lookup of episode article URLs
///
/// Episode titles in the feed look like `"Topic | Guest Name (Company)"`; guests in
/// the dataset are matched against them by name parts.
use std::sync::OnceLock;

use feed_rs::parser;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::FeedConfig;
use crate::dataset::Dataset;
use crate::error::Result;

/// Name parts this short are too ambiguous to match on their own
const MIN_NAME_PART_CHARS: usize = 3;

/// One feed item: episode title and its article link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEpisode {
    pub title: String,
    pub url: String,
}

/// Outcome of assigning article URLs to the dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSummary {
    pub matched: usize,
    pub unmatched: usize,
    /// First guest name of each episode that found no article
    pub unmatched_guests: Vec<String>,
}

/// Download the podcast feed
pub async fn fetch_feed(client: &Client, url: &str) -> Result<Vec<FeedEpisode>> {
    info!("📡 Fetching podcast feed: {}", url);
    let body = client.get(url).send().await?.error_for_status()?.bytes().await?;
    let episodes = parse_feed(&body)?;
    info!("✅ Found {} podcast episodes", episodes.len());
    Ok(episodes)
}

/// Parse RSS/Atom bytes into episodes; items without a title or link are dropped.
pub fn parse_feed(content: &[u8]) -> Result<Vec<FeedEpisode>> {
    let feed = parser::parse(content)?;

    let episodes = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.map(|t| t.content)?;
            let url = entry.links.into_iter().next().map(|l| l.href)?;
            let (title, url) = (title.trim().to_string(), url.trim().to_string());
            (!title.is_empty() && !url.is_empty()).then_some(FeedEpisode { title, url })
        })
        .collect();

    Ok(episodes)
}

/// Lowercase and keep only ASCII letters, digits and whitespace.
fn normalize_name(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Guest part of a `"Topic | Guest Name (Company)"` title, without the company.
pub fn guest_from_title(title: &str) -> Option<String> {
    let (_, after_pipe) = title.split_once('|')?;
    Some(company_suffix().replace(after_pipe.trim(), "").trim().to_string())
}

/// Trailing `(Company)` of a title's guest part, compiled once
fn company_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap())
}

/// Article URL of the first feed episode that names one of the guests.
pub fn find_matching_url(guest_names: &[String], episodes: &[FeedEpisode]) -> Option<String> {
    for guest_name in guest_names {
        let normalized_guest = normalize_name(guest_name);
        let parts: Vec<&str> = normalized_guest.split_whitespace().collect();
        let last_name = parts.last().copied().unwrap_or("");

        for episode in episodes {
            // Guest named after the pipe
            if let Some(title_guest) = guest_from_title(&episode.title) {
                let title_guest = normalize_name(&title_guest);
                if last_name.len() >= MIN_NAME_PART_CHARS && title_guest.contains(last_name) {
                    if parts.len() < 2 || title_guest.contains(parts[0]) {
                        debug!("Matched {} via title guest: {}", guest_name, episode.title);
                        return Some(episode.url.clone());
                    }
                }
            }

            // Every significant name part anywhere in the title
            let title = normalize_name(&episode.title);
            if parts.len() >= 2
                && parts
                    .iter()
                    .filter(|part| part.len() >= MIN_NAME_PART_CHARS)
                    .all(|part| title.contains(part))
            {
                debug!("Matched {} via full title: {}", guest_name, episode.title);
                return Some(episode.url.clone());
            }
        }
    }

    None
}

/// Assign `substack_url` on every episode: the matching article, or `null`.
pub fn link_articles(dataset: &mut Dataset, episodes: &[FeedEpisode], config: &FeedConfig) -> LinkSummary {
    let mut summary = LinkSummary::default();

    for episode in &mut dataset.episodes {
        if !config.compilation_marker.is_empty() && episode.filename.contains(&config.compilation_marker) {
            info!("  ⊘ Skipping compilation: {}", episode.filename);
            episode.substack_url = Some(None);
            summary.unmatched += 1;
            continue;
        }

        let guest_names = episode.guest_names();
        if guest_names.is_empty() {
            episode.substack_url = Some(None);
            summary.unmatched += 1;
            continue;
        }

        match find_matching_url(&guest_names, episodes) {
            Some(url) => {
                info!("  ✓ {}", guest_names[0]);
                episode.substack_url = Some(Some(url));
                summary.matched += 1;
            }
            None => {
                episode.substack_url = Some(None);
                summary.unmatched += 1;
                summary.unmatched_guests.push(guest_names[0].clone());
            }
        }
    }

    summary
}
