/// Episode enrichment from article pages
///
/// For every episode with an article URL, fetches the page once and fills in
/// item links and guest "where to find" links. Runs are resumable: episodes
/// whose items all have a URL and whose where-to-find list exists are skipped
/// unless forced.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::article::{extract_bullet_links, BulletLink, ItemMatcher, WhereToFindExtractor};
use crate::config::Config;
use crate::dataset::{Dataset, Episode, LightningRound};
use crate::fetch::PageSource;

/// Totals for one enrichment run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSummary {
    /// Episodes whose article was fetched and analyzed
    pub processed: usize,
    /// Item URLs newly found
    pub item_urls_added: usize,
    /// Where-to-find links written
    pub where_links: usize,
    /// Episodes whose article could not be fetched
    pub errors: usize,
}

/// What an episode still needs from its article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentPlan {
    pub items: bool,
    pub where_to_find: bool,
}

impl EnrichmentPlan {
    pub fn for_episode(episode: &Episode, force: bool) -> Self {
        Self {
            items: force || episode.needs_item_urls(),
            where_to_find: force || episode.needs_where_to_find(),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.items && !self.where_to_find
    }

    fn describe(&self) -> &'static str {
        match (self.items, self.where_to_find) {
            (true, true) => "items+where",
            (true, false) => "items",
            _ => "where_to_find",
        }
    }
}

/// Drives article enrichment over a dataset
pub struct Enricher<S: PageSource> {
    source: S,
    matcher: ItemMatcher,
    where_to_find: WhereToFindExtractor,
    rate_limit: Duration,
    force: bool,
}

impl<S: PageSource> Enricher<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            source,
            matcher: ItemMatcher::from_config(&config.matching),
            where_to_find: WhereToFindExtractor::from_config(&config.where_to_find),
            rate_limit: Duration::from_millis(config.scrape.rate_limit_ms),
            force: false,
        }
    }

    /// Re-scrape every episode, ignoring what is already filled in
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Enrich every episode in order. The caller saves the dataset afterwards.
    pub async fn run(&self, dataset: &mut Dataset) -> EnrichmentSummary {
        let total = dataset.len();
        let mut summary = EnrichmentSummary::default();

        info!(
            "📚 {} episodes, {} have an article URL",
            total,
            dataset.with_article_count()
        );
        if self.force {
            info!("🔄 Force mode: re-scraping all episodes");
        }

        for (i, episode) in dataset.episodes.iter_mut().enumerate() {
            let Some(url) = episode.article_url().map(str::to_string) else {
                episode.mark_unchecked_as_missing();
                continue;
            };

            let plan = EnrichmentPlan::for_episode(episode, self.force);
            if plan.is_empty() {
                continue;
            }

            info!("[{}/{}] {} ({})", i + 1, total, episode.guest_label(), plan.describe());

            let Some(html) = self.source.fetch_page(&url).await else {
                summary.errors += 1;
                continue;
            };

            let (added, where_links) = self.enrich_episode(episode, &html, plan);
            summary.item_urls_added += added;
            summary.where_links += where_links;
            summary.processed += 1;

            if !self.rate_limit.is_zero() {
                tokio::time::sleep(self.rate_limit).await;
            }
        }

        summary
    }

    /// Apply one fetched article to an episode. Returns (item URLs found,
    /// where-to-find links written).
    pub fn enrich_episode(&self, episode: &mut Episode, html: &str, plan: EnrichmentPlan) -> (usize, usize) {
        let links = extract_bullet_links(html);
        info!("  🔗 {} bullet links found", links.len());

        let mut added = 0;
        if plan.items {
            if let Some(lr) = episode.lightning_round_mut() {
                added = self.enrich_items(lr, &links);
            }
            info!("  ✅ {} item URLs matched", added);
        }

        let mut where_links = 0;
        if plan.where_to_find {
            let entries = self.where_to_find.extract(html, &episode.guest_names());
            where_links = entries.len();
            if entries.is_empty() {
                info!("  ⚪ No Where to Find links");
            } else {
                let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
                info!("  ✅ {} Where to Find links: {}", entries.len(), labels.join(", "));
            }
            episode.where_to_find = Some(entries);
        }

        (added, where_links)
    }

    /// Fill every item without a URL, recording misses as `null`.
    fn enrich_items(&self, lightning_round: &mut LightningRound, links: &[BulletLink]) -> usize {
        let mut added = 0;

        for item in lightning_round.items_mut() {
            if item.url().is_some() {
                continue;
            }

            let found = item
                .lookup_names()
                .iter()
                .find_map(|name| self.matcher.best_match_url(name, links));

            match &found {
                Some(url) => {
                    debug!("    {} -> {}", item.display_name(), url);
                    added += 1;
                }
                None => debug!("    {} -> no match", item.display_name()),
            }
            *item.url_slot_mut() = Some(found);
        }

        added
    }
}
