use async_trait::async_trait;
use lightning_recs::{
    best_match_url, extract_bullet_links, extract_where_to_find, normalize, similarity, BulletLink,
    ConfigBuilder, Dataset, Enricher, PageSource, Recommendation, WhereToFindEntry,
};
use tempfile::TempDir;
use tokio::fs;

const ARTICLE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="body markup">
  <p><strong>Where to find Shreyas Doshi:</strong></p>
  <p><span>• X: </span><a href="https://twitter.com/shreyas" rel="">https://twitter.com/shreyas</a></p>
  <p><span>• LinkedIn: </span><a href="https://www.linkedin.com/in/shreyasdoshi/" rel="">profile</a></p>
  <p><strong>Where to find Lenny:</strong></p>
  <p><span>• Newsletter: </span><a href="https://www.lennysnewsletter.com" rel="">newsletter</a></p>
  <p><span>• X: </span><a href="https://twitter.com/lennysan" rel="">x</a></p>
  <p><strong>Referenced:</strong></p>
  <p><span>• Linear: </span><a href="https://linear.app/" rel="">linear.app</a></p>
  <p><span>• </span><em>The Score Takes Care of Itself</em><span>: </span><a href="https://www.amazon.com/score" rel="">book</a></p>
  <p><span>• </span><em>High Output Management</em><span>: </span><a href="https://www.amazon.com/hom" rel="">book</a></p>
  <p><span>• </span><em>Ted Lasso</em><span> on </span><span>Apple TV+: </span><a href="https://tv.apple.com/ted-lasso" rel="">show</a></p>
</div>
</body></html>"#;

const DATASET: &str = r#"[
  {
    "filename": "Shreyas Doshi.txt",
    "guests": [{"name": "Shreyas Doshi", "titles": ["Former PM"]}],
    "lightning_round": {
      "books": [
        {"title": "The Score Takes Care Of Itself", "author": "Bill Walsh", "why": null},
        {"title": "High Output Managment", "author": null, "why": null}
      ],
      "tv_movies": [{"title": "Ted Lasso", "type": "tv_show", "why": null}],
      "products": [{"name": "Linear", "why": null}],
      "life_motto": null,
      "interview_question": null,
      "productivity_tip": null
    },
    "substack_url": "https://www.lennysnewsletter.com/p/shreyas"
  },
  {
    "filename": "Missing Page.txt",
    "guests": [{"name": "Someone Else"}],
    "lightning_round": {"books": [{"title": "Dune", "author": null, "why": null}]},
    "substack_url": "https://www.lennysnewsletter.com/p/gone"
  }
]"#;

struct StaticPages;

#[async_trait]
impl PageSource for StaticPages {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        (url == "https://www.lennysnewsletter.com/p/shreyas").then(|| ARTICLE.to_string())
    }
}

#[test]
fn test_bullet_links_from_article() {
    let links = extract_bullet_links(ARTICLE);
    let names: Vec<&str> = links.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "X",
            "LinkedIn",
            "Newsletter",
            "X",
            "Linear",
            "The Score Takes Care of Itself",
            "High Output Management",
            "Ted Lasso",
        ]
    );
}

#[test]
fn test_where_to_find_from_article() {
    let entries = extract_where_to_find(ARTICLE, &["Shreyas Doshi".to_string()]);
    assert_eq!(
        entries,
        vec![
            WhereToFindEntry::new("X", "https://twitter.com/shreyas"),
            WhereToFindEntry::new("LinkedIn", "https://www.linkedin.com/in/shreyasdoshi/"),
        ]
    );
}

#[test]
fn test_documented_scenarios() {
    let links = extract_bullet_links(r#"<p><span>• Notejoy: </span><a href="https://notejoy.com/">link</a></p>"#);
    assert_eq!(links, vec![BulletLink::new("Notejoy", "https://notejoy.com/")]);

    let links = extract_bullet_links(
        r#"<p><span>• </span><em>Sapiens</em><span>: </span><a href="https://amazon.com/sapiens">buy</a></p>"#,
    );
    assert_eq!(links, vec![BulletLink::new("Sapiens", "https://amazon.com/sapiens")]);
    assert_eq!(best_match_url("Sapiens", &links), Some("https://amazon.com/sapiens".to_string()));

    let shape_up = vec![BulletLink::new("Shape Up: How to build...", "https://a")];
    assert_eq!(best_match_url("Shape Up", &shape_up), Some("https://a".to_string()));

    let deep_work = vec![BulletLink::new("Deep Work", "https://b")];
    assert_eq!(best_match_url("Atomic Habits", &deep_work), None);
}

#[test]
fn test_normalize_and_similarity_properties() {
    for s in ["Shape Up: How to build...", "  MIXED   case!! ", "", "Ted Lasso (Apple TV+)"] {
        let once = normalize(s);
        assert_eq!(normalize(&once), once);
        if !once.is_empty() {
            assert_eq!(similarity(s, s), 1.0);
        }
    }
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", "xyz"), 0.0);
}

#[tokio::test]
async fn test_enrich_dataset_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("recommendations.json");
    fs::write(&path, DATASET).await.unwrap();

    let config = ConfigBuilder::new()
        .with_dataset(path.clone())
        .with_publish_path(None)
        .with_rate_limit_ms(0)
        .build();

    let mut dataset = Dataset::load(&path).await.unwrap();
    let summary = Enricher::new(StaticPages, &config).run(&mut dataset).await;
    dataset.save(&path).await.unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.item_urls_added, 4);
    assert_eq!(summary.where_links, 2);

    let reloaded = Dataset::load(&path).await.unwrap();
    let ep = &reloaded.episodes[0];
    let lr = ep.lightning_round().unwrap();
    // matched through normalization, and through the fuzzy score despite the typo
    assert_eq!(lr.books()[0].url(), Some("https://www.amazon.com/score"));
    assert_eq!(lr.books()[1].url(), Some("https://www.amazon.com/hom"));
    assert_eq!(lr.tv_movies()[0].url(), Some("https://tv.apple.com/ted-lasso"));
    assert_eq!(lr.products()[0].url(), Some("https://linear.app/"));
    assert_eq!(ep.where_to_find.as_ref().map(Vec::len), Some(2));
    assert_eq!(ep.guests()[0].extra["titles"][0], "Former PM");

    // the page that failed to load is untouched and will be retried
    let missing = &reloaded.episodes[1];
    assert!(missing.needs_where_to_find());
    assert_eq!(missing.lightning_round().unwrap().books()[0].url, None);
}
