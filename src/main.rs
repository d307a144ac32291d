use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use lightning_recs::article::{extract_bullet_links, WhereToFindExtractor};
use lightning_recs::config::Config;
use lightning_recs::dataset::Dataset;
use lightning_recs::enrichment::Enricher;
use lightning_recs::feed;
use lightning_recs::fetch::{HttpPageSource, PageSource};
use lightning_recs::report::CoverageReport;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "lightning-recs")]
#[command(version, about = "Podcast lightning-round recommendations dataset tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Recommendations JSON file (overrides the config file)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Config file (default: lightning-recs.toml or config/lightning-recs.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Attach item URLs and "where to find" links scraped from episode articles
    Enrich {
        /// Re-scrape every episode, even ones already enriched
        #[arg(long)]
        force: bool,
    },
    /// Assign each episode its article URL from the podcast feed
    LinkArticles {
        /// Feed URL (overrides the config file)
        #[arg(long)]
        feed_url: Option<String>,
    },
    /// Report episodes whose lightning round is missing elements
    Report {
        /// Also write the report as JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the bullet links and where-to-find links of one article
    Extract {
        /// Local HTML file or http(s) URL
        source: String,

        /// Guest names, used when sections are restricted to guests
        #[arg(long = "guest")]
        guests: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "lightning_recs=debug,info" } else { "lightning_recs=info,warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(dataset) = cli.dataset {
        config.dataset.path = dataset;
    }
    config.validate()?;

    if cli.verbose {
        info!("{}", config.summary());
    }

    match cli.command {
        Commands::Enrich { force } => enrich(&config, force).await,
        Commands::LinkArticles { feed_url } => link_articles(&config, feed_url).await,
        Commands::Report { output } => report(&config, output.as_deref()).await,
        Commands::Extract { source, guests } => extract(&config, &source, &guests).await,
    }
}

async fn enrich(config: &Config, force: bool) -> Result<()> {
    let mut dataset = Dataset::load(&config.dataset.path).await?;
    let source = HttpPageSource::new(&config.scrape)?;
    let enricher = Enricher::new(source, config).with_force(force);

    let start_time = std::time::Instant::now();
    let summary = enricher.run(&mut dataset).await;

    info!("🎉 Enrichment completed in {:.1}s", start_time.elapsed().as_secs_f64());
    info!("✅ Processed: {} episodes", summary.processed);
    info!("🔗 Item URLs added: {}", summary.item_urls_added);
    info!("👤 Where to Find links: {}", summary.where_links);
    info!("❌ Errors: {}", summary.errors);

    save_and_publish(config, &dataset).await
}

async fn link_articles(config: &Config, feed_url: Option<String>) -> Result<()> {
    let source = HttpPageSource::new(&config.scrape)?;
    let url = feed_url.unwrap_or_else(|| config.feed.rss_url.clone());
    let episodes = feed::fetch_feed(source.client(), &url).await?;

    let mut dataset = Dataset::load(&config.dataset.path).await?;
    let summary = feed::link_articles(&mut dataset, &episodes, &config.feed);

    info!("✅ Matched: {}, Unmatched: {}", summary.matched, summary.unmatched);
    if !summary.unmatched_guests.is_empty() {
        info!("Unmatched guests ({}):", summary.unmatched_guests.len());
        for name in &summary.unmatched_guests {
            info!("  - {}", name);
        }
    }

    save_and_publish(config, &dataset).await
}

async fn report(config: &Config, output: Option<&Path>) -> Result<()> {
    let dataset = Dataset::load(&config.dataset.path).await?;
    let report = CoverageReport::build(&dataset);
    println!("{}", report.render());

    if let Some(path) = output {
        tokio::fs::write(path, serde_json::to_string_pretty(&report)?).await?;
        info!("💾 Detailed report saved to: {}", path.display());
    }
    Ok(())
}

async fn extract(config: &Config, source: &str, guests: &[String]) -> Result<()> {
    let html = if source.starts_with("http://") || source.starts_with("https://") {
        HttpPageSource::new(&config.scrape)?
            .fetch_page(source)
            .await
            .ok_or_else(|| anyhow!("Could not fetch {}", source))?
    } else {
        tokio::fs::read_to_string(source).await?
    };

    let links = extract_bullet_links(&html);
    let where_to_find = WhereToFindExtractor::from_config(&config.where_to_find).extract(&html, guests);

    let output = json!({
        "bullet_links": links,
        "where_to_find": where_to_find,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn save_and_publish(config: &Config, dataset: &Dataset) -> Result<()> {
    dataset.save(&config.dataset.path).await?;

    if let Some(publish_path) = &config.dataset.publish_path {
        let has_target_dir = publish_path
            .parent()
            .map(|p| p.as_os_str().is_empty() || p.exists())
            .unwrap_or(true);
        if has_target_dir {
            Dataset::publish(&config.dataset.path, publish_path).await?;
        } else {
            warn!(
                "⚠️ Publish directory missing, skipping copy to {}",
                publish_path.display()
            );
        }
    }
    Ok(())
}
