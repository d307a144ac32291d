/// "Where to find {Guest}:" section extraction
use std::collections::HashSet;
use std::ops::RangeInclusive;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

use super::bullets::{leaf_text, match_labeled_bullet};
use super::normalize::normalize;
use super::WhereToFindEntry;
use crate::config::WhereToFindConfig;

/// Label length accepted inside a section; platform labels like "X" are one char
const SECTION_LABEL_CHARS: RangeInclusive<usize> = 1..=80;

/// Shortest guest-name token that counts when sections are restricted to guests
const MIN_GUEST_TOKEN_CHARS: usize = 3;

/// Extracts contact links from the per-person sections of an article.
#[derive(Debug, Clone)]
pub struct WhereToFindExtractor {
    /// Lowercase substrings; a section whose name contains one is skipped
    excluded_markers: Vec<String>,
    /// Only keep sections whose name resembles one of the episode's guests
    restrict_to_guests: bool,
    header: Regex,
}

impl WhereToFindExtractor {
    pub fn new(excluded_markers: Vec<String>, restrict_to_guests: bool) -> Self {
        let excluded_markers = excluded_markers
            .into_iter()
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect();

        Self {
            excluded_markers,
            restrict_to_guests,
            header: Regex::new(r"(?is)^where to find\s+(.{1,100}?)\s*:$").unwrap(),
        }
    }

    pub fn from_config(config: &WhereToFindConfig) -> Self {
        Self::new(config.excluded_names.clone(), config.restrict_to_guests)
    }

    /// Collect `{label, url}` links from every kept section, in document order,
    /// deduplicated by URL across the whole page.
    pub fn extract(&self, html: &str, guest_names: &[String]) -> Vec<WhereToFindEntry> {
        let document = Html::parse_document(html);

        let mut results = Vec::new();
        let mut seen_urls = HashSet::new();
        // true while inside a section whose links should be collected
        let mut collecting = false;

        for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
            match element.value().name() {
                "strong" => {
                    collecting = match self.section_name(element) {
                        Some(name) => self.keep_section(&name, guest_names),
                        None => false,
                    };
                }
                "span" if collecting => {
                    if let Some((label, url)) = match_labeled_bullet(element, &SECTION_LABEL_CHARS) {
                        if seen_urls.insert(url.clone()) {
                            results.push(WhereToFindEntry { label, url });
                        }
                    }
                }
                _ => {}
            }
        }

        debug!("Extracted {} where-to-find links", results.len());
        results
    }

    /// Name captured from a `Where to find {Name}:` header, if this bold element is one.
    fn section_name(&self, strong: ElementRef<'_>) -> Option<String> {
        let text = leaf_text(strong)?;
        let captures = self.header.captures(text.trim())?;
        let name = captures.get(1)?.as_str().trim();
        if name.is_empty() {
            return None;
        }
        Some(name.to_string())
    }

    fn keep_section(&self, name: &str, guest_names: &[String]) -> bool {
        if self.is_excluded(name) {
            debug!("Skipping excluded where-to-find section: {}", name);
            return false;
        }
        if self.restrict_to_guests && !names_overlap(name, guest_names) {
            debug!("Skipping where-to-find section for non-guest: {}", name);
            return false;
        }
        true
    }

    /// True when the section name contains any exclusion marker.
    pub fn is_excluded(&self, name: &str) -> bool {
        let lowered = name.to_lowercase();
        self.excluded_markers.iter().any(|m| lowered.contains(m.as_str()))
    }
}

impl Default for WhereToFindExtractor {
    fn default() -> Self {
        Self::from_config(&WhereToFindConfig::default())
    }
}

/// Extract where-to-find links using the default exclusion markers.
pub fn extract_where_to_find(html: &str, guest_names: &[String]) -> Vec<WhereToFindEntry> {
    WhereToFindExtractor::default().extract(html, guest_names)
}

fn names_overlap(section_name: &str, guest_names: &[String]) -> bool {
    let section = normalize(section_name);
    let section_tokens: HashSet<&str> = section.split(' ').collect();

    guest_names.iter().any(|guest| {
        normalize(guest)
            .split(' ')
            .filter(|token| token.chars().count() >= MIN_GUEST_TOKEN_CHARS)
            .any(|token| section_tokens.contains(token))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <p><strong>Where to find Andrew Wilkinson:</strong></p>
        <p><span>• X: </span><a href="https://x.com/awilkinson">x</a></p>
        <p><span>• LinkedIn: </span><a href="https://www.linkedin.com/in/awilkinson/">li</a></p>
        <p><strong>Where to find Lenny:</strong></p>
        <p><span>• Newsletter: </span><a href="https://www.lennysnewsletter.com">nl</a></p>
        <p><span>• X: </span><a href="https://twitter.com/lennysan">x</a></p>
        <p><strong>In this episode, we cover:</strong></p>
        <p><span>• Podcast: </span><a href="https://example.com/podcast">p</a></p>
    "#;

    fn guests(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_guest_section_extracted_and_host_excluded() {
        let entries = extract_where_to_find(PAGE, &guests(&["Andrew Wilkinson"]));
        assert_eq!(
            entries,
            vec![
                WhereToFindEntry::new("X", "https://x.com/awilkinson"),
                WhereToFindEntry::new("LinkedIn", "https://www.linkedin.com/in/awilkinson/"),
            ]
        );
    }

    #[test]
    fn test_host_only_page_yields_nothing() {
        let html = r#"
            <p><strong>Where to find Lenny:</strong></p>
            <p><span>• Newsletter: </span><a href="https://www.lennysnewsletter.com">nl</a></p>
        "#;
        assert!(extract_where_to_find(html, &[]).is_empty());
    }

    #[test]
    fn test_two_guest_sections_dedup_across_page() {
        let html = r#"
            <p><strong>Where to find Ada:</strong></p>
            <p><span>• Website: </span><a href="https://shared.example/">w</a></p>
            <p><span>• X: </span><a href="https://x.com/ada">x</a></p>
            <p><strong>Where to find Grace:</strong></p>
            <p><span>• Website: </span><a href="https://shared.example/">w</a></p>
            <p><span>• X: </span><a href="https://x.com/grace">x</a></p>
        "#;
        let entries = extract_where_to_find(html, &guests(&["Ada", "Grace"]));
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://shared.example/", "https://x.com/ada", "https://x.com/grace"]);
    }

    #[test]
    fn test_header_is_case_insensitive() {
        let html = r#"
            <p><strong>WHERE TO FIND Jane Doe:</strong></p>
            <p><span>• X: </span><a href="https://x.com/jane">x</a></p>
        "#;
        assert_eq!(extract_where_to_find(html, &[]).len(), 1);
    }

    #[test]
    fn test_links_before_any_header_ignored() {
        let html = r#"
            <p><span>• Sponsor: </span><a href="https://sponsor.example/">s</a></p>
            <p><strong>Where to find Jane:</strong></p>
            <p><span>• X: </span><a href="https://x.com/jane">x</a></p>
        "#;
        let entries = extract_where_to_find(html, &[]);
        assert_eq!(entries, vec![WhereToFindEntry::new("X", "https://x.com/jane")]);
    }

    #[test]
    fn test_custom_exclusion_markers() {
        let extractor = WhereToFindExtractor::new(vec!["Andrew".to_string()], false);
        let entries = extractor.extract(PAGE, &[]);
        let urls: Vec<&str> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.lennysnewsletter.com", "https://twitter.com/lennysan"]);
    }

    #[test]
    fn test_restrict_to_guests() {
        let html = r#"
            <p><strong>Where to find Jane Doe:</strong></p>
            <p><span>• X: </span><a href="https://x.com/jane">x</a></p>
            <p><strong>Where to find Some Cohost:</strong></p>
            <p><span>• X: </span><a href="https://x.com/cohost">x</a></p>
        "#;
        let extractor = WhereToFindExtractor::new(Vec::new(), true);
        let entries = extractor.extract(html, &guests(&["Jane Doe"]));
        assert_eq!(entries, vec![WhereToFindEntry::new("X", "https://x.com/jane")]);
    }

    #[test]
    fn test_is_excluded() {
        let extractor = WhereToFindExtractor::default();
        assert!(extractor.is_excluded("Lenny"));
        assert!(extractor.is_excluded("LENNY RACHITSKY"));
        assert!(!extractor.is_excluded("Shreyas Doshi"));
    }
}
