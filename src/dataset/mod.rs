/// Episode recommendations dataset
///
/// The dataset is a JSON array of episode objects produced by transcript
/// extraction. Only the fields this crate reads or writes are typed; everything
/// else rides along in `extra` so a rewrite never drops data.

pub mod store;

pub use store::Dataset;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::article::WhereToFindEntry;

/// A field that remembers how it was written.
///
/// `None`: the key was absent. `Some(None)`: explicit `null`. `Some(Some(v))`: a value.
/// Absent keys stay absent when the dataset is rewritten.
pub type Slot<T> = Option<Option<T>>;

/// Link lookup state of an item: absent means never checked, `null` means checked
/// and nothing found.
pub type UrlSlot = Slot<String>;

/// One podcast episode
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Episode {
    /// Transcript filename the episode was extracted from
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub guests: Slot<Vec<Guest>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub lightning_round: Slot<LightningRound>,

    /// Article page for the episode
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub substack_url: UrlSlot,

    /// Guest contact links; absent until the article has been scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_to_find: Option<Vec<WhereToFindEntry>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Guest {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LightningRound {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub books: Slot<Vec<Book>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub tv_movies: Slot<Vec<TvMovie>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub products: Slot<Vec<Product>>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub life_motto: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub interview_question: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub productivity_tip: Slot<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Book {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub author: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub why: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub url: UrlSlot,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TvMovie {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// "tv_show" or "movie"
    #[serde(
        rename = "type",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub kind: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub why: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub url: UrlSlot,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Product {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub why: Slot<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub url: UrlSlot,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn slot_value<T>(slot: &Slot<T>) -> Option<&T> {
    slot.as_ref().and_then(Option::as_ref)
}

fn slot_list<T>(slot: &Slot<Vec<T>>) -> &[T] {
    slot_value(slot).map(Vec::as_slice).unwrap_or(&[])
}

/// A lightning-round item that can carry a link
pub trait Recommendation {
    /// Name shown for the item
    fn display_name(&self) -> &str;

    /// Names to try against the page's links, most specific first
    fn lookup_names(&self) -> Vec<String> {
        vec![self.display_name().to_string()]
    }

    fn url_slot(&self) -> &UrlSlot;

    fn url_slot_mut(&mut self) -> &mut UrlSlot;

    /// Found URL, if any
    fn url(&self) -> Option<&str> {
        slot_value(self.url_slot()).map(String::as_str)
    }
}

impl Book {
    pub fn author(&self) -> Option<&str> {
        slot_value(&self.author).map(String::as_str)
    }
}

impl Recommendation for Book {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn lookup_names(&self) -> Vec<String> {
        match self.author().map(str::trim).filter(|a| !a.is_empty()) {
            Some(author) => vec![format!("{} {}", self.title, author), self.title.clone()],
            None => vec![self.title.clone()],
        }
    }

    fn url_slot(&self) -> &UrlSlot {
        &self.url
    }

    fn url_slot_mut(&mut self) -> &mut UrlSlot {
        &mut self.url
    }
}

impl Recommendation for TvMovie {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn url_slot(&self) -> &UrlSlot {
        &self.url
    }

    fn url_slot_mut(&mut self) -> &mut UrlSlot {
        &mut self.url
    }
}

impl Recommendation for Product {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn url_slot(&self) -> &UrlSlot {
        &self.url
    }

    fn url_slot_mut(&mut self) -> &mut UrlSlot {
        &mut self.url
    }
}

impl LightningRound {
    pub fn books(&self) -> &[Book] {
        slot_list(&self.books)
    }

    pub fn tv_movies(&self) -> &[TvMovie] {
        slot_list(&self.tv_movies)
    }

    pub fn products(&self) -> &[Product] {
        slot_list(&self.products)
    }

    pub fn life_motto(&self) -> Option<&str> {
        slot_value(&self.life_motto).map(String::as_str)
    }

    /// True for a round written as `{}`
    pub fn is_empty(&self) -> bool {
        self.books.is_none()
            && self.tv_movies.is_none()
            && self.products.is_none()
            && self.life_motto.is_none()
            && self.interview_question.is_none()
            && self.productivity_tip.is_none()
            && self.extra.is_empty()
    }

    /// Books, then TV/movies, then products
    pub fn items(&self) -> impl Iterator<Item = &dyn Recommendation> + '_ {
        self.books()
            .iter()
            .map(|b| b as &dyn Recommendation)
            .chain(self.tv_movies().iter().map(|m| m as &dyn Recommendation))
            .chain(self.products().iter().map(|p| p as &dyn Recommendation))
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut dyn Recommendation> + '_ {
        let books = self.books.iter_mut().flatten().flatten();
        let tv_movies = self.tv_movies.iter_mut().flatten().flatten();
        let products = self.products.iter_mut().flatten().flatten();

        books
            .map(|b| b as &mut dyn Recommendation)
            .chain(tv_movies.map(|m| m as &mut dyn Recommendation))
            .chain(products.map(|p| p as &mut dyn Recommendation))
    }
}

impl Episode {
    pub fn guests(&self) -> &[Guest] {
        slot_list(&self.guests)
    }

    pub fn guest_names(&self) -> Vec<String> {
        self.guests().iter().map(|g| g.name.clone()).collect()
    }

    /// First guest's name, for progress output
    pub fn guest_label(&self) -> &str {
        self.guests()
            .first()
            .map(|g| g.name.as_str())
            .unwrap_or("(no guest)")
    }

    pub fn lightning_round(&self) -> Option<&LightningRound> {
        slot_value(&self.lightning_round)
    }

    pub fn lightning_round_mut(&mut self) -> Option<&mut LightningRound> {
        self.lightning_round.as_mut().and_then(Option::as_mut)
    }

    pub fn article_url(&self) -> Option<&str> {
        slot_value(&self.substack_url)
            .map(String::as_str)
            .filter(|u| !u.trim().is_empty())
    }

    /// True when some item has no URL yet (never checked, or checked and missing)
    pub fn needs_item_urls(&self) -> bool {
        self.lightning_round()
            .map(|lr| lr.items().any(|item| item.url().is_none()))
            .unwrap_or(false)
    }

    /// True when the article has never been scanned for where-to-find links
    pub fn needs_where_to_find(&self) -> bool {
        self.where_to_find.is_none()
    }

    /// Record unchecked items as checked-without-result so later runs skip them.
    pub fn mark_unchecked_as_missing(&mut self) {
        if let Some(lr) = self.lightning_round_mut() {
            for item in lr.items_mut() {
                let slot = item.url_slot_mut();
                if slot.is_none() {
                    *slot = Some(None);
                }
            }
        }
        if self.where_to_find.is_none() {
            self.where_to_find = Some(Vec::new());
        }
    }
}

/// Distinguishes an explicit `null` from an absent field (which `default` covers).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn episode_json() -> Value {
        json!({
            "filename": "Andrew Wilkinson.txt",
            "guests": [{"name": "Andrew Wilkinson", "titles": ["Co-founder"]}],
            "lightning_round": {
                "books": [
                    {"title": "Shape Up", "author": "Ryan Singer", "why": null},
                    {"title": "Sapiens", "author": null, "why": null, "url": null},
                    {"title": "Poor Charlie's Almanack", "author": null, "why": null, "url": "https://a.example"}
                ],
                "tv_movies": [{"title": "Succession", "type": "tv_show", "why": null}],
                "products": null,
                "life_motto": "Be kind",
                "interview_question": null,
                "productivity_tip": null
            },
            "substack_url": "https://www.lennysnewsletter.com/p/andrew",
            "episode_number": 42
        })
    }

    #[test]
    fn test_url_slot_tristate() {
        let episode: Episode = serde_json::from_value(episode_json()).unwrap();
        let books = episode.lightning_round().unwrap().books();
        assert_eq!(books[0].url, None);
        assert_eq!(books[1].url, Some(None));
        assert_eq!(books[2].url, Some(Some("https://a.example".to_string())));
    }

    #[test]
    fn test_unknown_fields_survive() {
        let original = episode_json();
        let episode: Episode = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(episode.extra.get("episode_number"), Some(&json!(42)));
        assert_eq!(episode.guests()[0].extra.get("titles"), Some(&json!(["Co-founder"])));

        let back = serde_json::to_value(&episode).unwrap();
        assert_eq!(back["episode_number"], json!(42));
        assert_eq!(back["guests"][0]["titles"], json!(["Co-founder"]));
        assert_eq!(back["lightning_round"]["tv_movies"][0]["type"], json!("tv_show"));
        // absent url stays absent, null stays null
        assert!(back["lightning_round"]["books"][0].get("url").is_none());
        assert_eq!(back["lightning_round"]["books"][1]["url"], Value::Null);
        assert_eq!(back, original);
    }

    #[test]
    fn test_rewrite_adds_no_keys() {
        let original = json!([
            {"filename": "a.txt", "guests": [], "lightning_round": {"books": [{"title": "Dune"}]}},
            {"filename": "b.txt"},
            {"filename": "c.txt", "lightning_round": {}}
        ]);
        let dataset: Dataset = serde_json::from_value(original.clone()).unwrap();
        let back = serde_json::to_value(&dataset).unwrap();
        assert_eq!(back, original);
        assert_eq!(back[0]["lightning_round"]["books"][0], json!({"title": "Dune"}));
        assert!(back[1].get("guests").is_none());
        assert!(back[1].get("lightning_round").is_none());
    }

    #[test]
    fn test_explicit_nulls_survive() {
        let original = json!({
            "filename": "n.txt",
            "guests": null,
            "lightning_round": null,
            "substack_url": null
        });
        let episode: Episode = serde_json::from_value(original.clone()).unwrap();
        assert_eq!(episode.lightning_round, Some(None));
        assert!(episode.guests().is_empty());
        assert_eq!(serde_json::to_value(&episode).unwrap(), original);
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let episode: Episode = serde_json::from_value(episode_json()).unwrap();
        let lr = episode.lightning_round().unwrap();
        assert!(lr.products().is_empty());
        assert_eq!(lr.products, Some(None));
        assert_eq!(lr.life_motto(), Some("Be kind"));
        assert!(!lr.is_empty());
    }

    #[test]
    fn test_mark_missing_on_minimal_item() {
        let mut episode: Episode =
            serde_json::from_value(json!({"lightning_round": {"books": [{"title": "Dune"}]}})).unwrap();
        episode.mark_unchecked_as_missing();

        let back = serde_json::to_value(&episode).unwrap();
        assert_eq!(back["lightning_round"]["books"][0], json!({"title": "Dune", "url": null}));
        assert_eq!(back["where_to_find"], json!([]));
        assert!(back.get("filename").is_none());
    }

    #[test]
    fn test_needs_predicates() {
        let mut episode: Episode = serde_json::from_value(episode_json()).unwrap();
        assert!(episode.needs_item_urls());
        assert!(episode.needs_where_to_find());

        episode.mark_unchecked_as_missing();
        // null still counts as "no URL yet"
        assert!(episode.needs_item_urls());
        assert!(!episode.needs_where_to_find());
        assert_eq!(episode.where_to_find, Some(Vec::new()));

        let lr = episode.lightning_round().unwrap();
        assert!(lr.items().all(|item| item.url_slot().is_some()));
        assert_eq!(lr.books()[2].url(), Some("https://a.example"));
    }

    #[test]
    fn test_episode_without_lightning_round() {
        let episode: Episode = serde_json::from_value(json!({"filename": "x.txt", "guests": []})).unwrap();
        assert!(episode.lightning_round().is_none());
        assert!(!episode.needs_item_urls());
        assert_eq!(episode.guest_label(), "(no guest)");
        assert_eq!(episode.article_url(), None);
    }

    #[test]
    fn test_book_lookup_names() {
        let book = Book {
            title: "Shape Up".to_string(),
            author: Some(Some("Ryan Singer".to_string())),
            ..Default::default()
        };
        assert_eq!(book.lookup_names(), vec!["Shape Up Ryan Singer".to_string(), "Shape Up".to_string()]);

        let book = Book {
            title: "Sapiens".to_string(),
            author: Some(None),
            ..Default::default()
        };
        assert_eq!(book.lookup_names(), vec!["Sapiens".to_string()]);
    }
}
