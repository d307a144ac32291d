/// Recommendation item to bullet-link matching
use tracing::debug;

use super::normalize::normalize;
use super::similarity::similarity;
use super::BulletLink;
use crate::config::MatchingConfig;

/// Result of matching one item name against a page's bullet links
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// One normalized name contains the other; the first such link wins
    Substring { url: String },
    /// Best fuzzy score over the whole list, at or above the threshold
    Fuzzy { url: String, score: f64 },
    /// Nothing close enough
    NoMatch,
}

impl MatchOutcome {
    pub fn url(&self) -> Option<&str> {
        match self {
            MatchOutcome::Substring { url } | MatchOutcome::Fuzzy { url, .. } => Some(url.as_str()),
            MatchOutcome::NoMatch => None,
        }
    }

    pub fn into_url(self) -> Option<String> {
        match self {
            MatchOutcome::Substring { url } | MatchOutcome::Fuzzy { url, .. } => Some(url),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// Matches item display names to bullet links
#[derive(Debug, Clone)]
pub struct ItemMatcher {
    /// Minimum fuzzy score accepted
    threshold: f64,
    /// Both normalized names must be at least this many chars for containment to count
    min_substring_chars: usize,
}

impl ItemMatcher {
    pub fn new(threshold: f64, min_substring_chars: usize) -> Self {
        Self {
            threshold,
            min_substring_chars,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.fuzzy_threshold, config.min_substring_chars)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Evaluate every link in order: return on the first containment match,
    /// otherwise keep the highest fuzzy score.
    pub fn evaluate(&self, item_name: &str, links: &[BulletLink]) -> MatchOutcome {
        let norm_item = normalize(item_name);
        let item_chars = norm_item.chars().count();
        let mut best: Option<(&BulletLink, f64)> = None;

        for link in links {
            let norm_link = normalize(&link.name);
            let contained = norm_link.contains(&norm_item) || norm_item.contains(&norm_link);
            if contained
                && item_chars >= self.min_substring_chars
                && norm_link.chars().count() >= self.min_substring_chars
            {
                debug!("Substring match: '{}' ~ '{}'", item_name, link.name);
                return MatchOutcome::Substring {
                    url: link.url.clone(),
                };
            }

            let score = similarity(item_name, &link.name);
            if score > best.map(|(_, s)| s).unwrap_or(0.0) {
                best = Some((link, score));
            }
        }

        match best {
            Some((link, score)) if score >= self.threshold => {
                debug!("Fuzzy match: '{}' ~ '{}' ({:.2})", item_name, link.name, score);
                MatchOutcome::Fuzzy {
                    url: link.url.clone(),
                    score,
                }
            }
            _ => MatchOutcome::NoMatch,
        }
    }

    /// URL of the best match, if any.
    pub fn best_match_url(&self, item_name: &str, links: &[BulletLink]) -> Option<String> {
        self.evaluate(item_name, links).into_url()
    }
}

impl Default for ItemMatcher {
    fn default() -> Self {
        Self::from_config(&MatchingConfig::default())
    }
}

/// Best-matching URL with the default threshold (0.65).
pub fn best_match_url(item_name: &str, links: &[BulletLink]) -> Option<String> {
    ItemMatcher::default().best_match_url(item_name, links)
}
