/// Lightning-round coverage report
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Episode, LightningRound};

/// Lightning-round element that can be missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Books,
    Movies,
    Products,
    LifeMotto,
}

impl Element {
    pub fn label(&self) -> &'static str {
        match self {
            Element::Books => "books",
            Element::Movies => "movies",
            Element::Products => "products",
            Element::LifeMotto => "life_motto",
        }
    }
}

/// Per-episode coverage line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeCoverage {
    pub filename: String,
    pub guests: String,
    pub books: usize,
    pub movies: usize,
    pub products: usize,
    pub has_motto: bool,
    pub missing: Vec<Element>,
}

impl EpisodeCoverage {
    fn from_episode(episode: &Episode, lr: &LightningRound) -> Self {
        let has_motto = lr.life_motto().map(|m| !m.trim().is_empty()).unwrap_or(false);

        let mut missing = Vec::new();
        if lr.books().is_empty() {
            missing.push(Element::Books);
        }
        if lr.tv_movies().is_empty() {
            missing.push(Element::Movies);
        }
        if lr.products().is_empty() {
            missing.push(Element::Products);
        }
        if !has_motto {
            missing.push(Element::LifeMotto);
        }

        Self {
            filename: episode.filename.clone(),
            guests: episode.guest_names().join(", "),
            books: lr.books().len(),
            movies: lr.tv_movies().len(),
            products: lr.products().len(),
            has_motto,
            missing,
        }
    }
}

/// Coverage across the whole dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageReport {
    pub total_episodes: usize,
    pub with_lightning_round: usize,
    pub complete: usize,
    pub missing_books: usize,
    pub missing_movies: usize,
    pub missing_products: usize,
    pub missing_life_motto: usize,
    /// Incomplete episodes, most missing elements first
    pub incomplete: Vec<EpisodeCoverage>,
}

impl CoverageReport {
    pub fn build(dataset: &Dataset) -> Self {
        let mut report = Self {
            total_episodes: dataset.len(),
            ..Default::default()
        };

        for episode in &dataset.episodes {
            // absent, null and `{}` rounds are not counted
            let Some(lr) = episode.lightning_round().filter(|lr| !lr.is_empty()) else {
                continue;
            };
            report.with_lightning_round += 1;

            let coverage = EpisodeCoverage::from_episode(episode, lr);
            for element in &coverage.missing {
                match element {
                    Element::Books => report.missing_books += 1,
                    Element::Movies => report.missing_movies += 1,
                    Element::Products => report.missing_products += 1,
                    Element::LifeMotto => report.missing_life_motto += 1,
                }
            }

            if coverage.missing.is_empty() {
                report.complete += 1;
            } else {
                report.incomplete.push(coverage);
            }
        }

        report.incomplete.sort_by(|a, b| b.missing.len().cmp(&a.missing.len()));
        report
    }

    /// Human-readable summary
    pub fn render(&self) -> String {
        let rule = "=".repeat(80);
        let mut out = String::new();

        out.push_str(&format!("{}\nRECOMMENDATIONS COVERAGE\n{}\n\n", rule, rule));
        out.push_str(&format!("Total episodes: {}\n", self.total_episodes));
        out.push_str(&format!("Episodes with lightning rounds: {}\n", self.with_lightning_round));
        out.push_str(&format!("Complete episodes (all 4 elements): {}\n", self.complete));
        out.push_str(&format!("Episodes with missing elements: {}\n\n", self.incomplete.len()));

        out.push_str(&format!("Missing Books: {} episodes\n", self.missing_books));
        out.push_str(&format!("Missing Movies/TV: {} episodes\n", self.missing_movies));
        out.push_str(&format!("Missing Products: {} episodes\n", self.missing_products));
        out.push_str(&format!("Missing Life Motto: {} episodes\n", self.missing_life_motto));

        if !self.incomplete.is_empty() {
            out.push_str(&format!("\n{}\nEPISODES WITH MISSING ELEMENTS\n{}\n\n", rule, rule));
            for (i, ep) in self.incomplete.iter().enumerate() {
                let missing: Vec<&str> = ep.missing.iter().map(Element::label).collect();
                out.push_str(&format!("{}. {}\n", i + 1, ep.filename));
                out.push_str(&format!("   Guest(s): {}\n", ep.guests));
                out.push_str(&format!("   Missing: {} ({} elements)\n", missing.join(", "), ep.missing.len()));
                out.push_str(&format!(
                    "   Current: {} books, {} movies, {} products, {} motto\n\n",
                    ep.books,
                    ep.movies,
                    ep.products,
                    if ep.has_motto { "Yes" } else { "No" }
                ));
            }
        }

        out
    }
}
