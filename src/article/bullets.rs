/// Bullet-link extraction from article HTML
///
/// Article pages list referenced things as bullet paragraphs. Two shapes are
/// recognized:
///
/// A) Plain label in a span:
///    `<p><span>• Notejoy: </span><a href="https://notejoy.com/">...</a></p>`
///
/// B) Italic title, usually books:
///    `<p><span>• </span><em>Title</em><span>: </span><a href="https://...">...</a></p>`
use std::collections::HashSet;
use std::ops::RangeInclusive;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use super::BulletLink;

pub(crate) const BULLET_GLYPHS: [char; 2] = ['•', '·'];
/// Label length accepted for page-wide bullet links, in chars
pub(crate) const BULLET_LABEL_CHARS: RangeInclusive<usize> = 2..=100;

/// Extract every bullet `{name, url}` pair from a page.
///
/// Pattern A results come first, then pattern B, each in document order.
/// A URL already seen earlier in the call is dropped.
pub fn extract_bullet_links(html: &str) -> Vec<BulletLink> {
    let document = Html::parse_document(html);
    let spans = select_all(&document, "span");

    let mut links = Vec::new();
    let mut seen_urls = HashSet::new();
    let mut push = |name: String, url: String| {
        if seen_urls.insert(url.clone()) {
            links.push(BulletLink { name, url });
        }
    };

    for span in &spans {
        if let Some((label, url)) = match_labeled_bullet(*span, &BULLET_LABEL_CHARS) {
            push(label, url);
        }
    }
    for span in &spans {
        if let Some((title, url)) = match_titled_bullet(*span) {
            push(title, url);
        }
    }

    debug!("Extracted {} bullet links", links.len());
    links
}

/// Pattern A on a single span: `• Label:` followed by the link.
pub(crate) fn match_labeled_bullet(
    span: ElementRef<'_>,
    label_chars: &RangeInclusive<usize>,
) -> Option<(String, String)> {
    let text = leaf_text(span)?;
    let label = label_after_bullet(&text, label_chars)?;
    let anchor = next_element_sibling(span)?;
    let url = http_href(anchor)?;
    Some((label.trim().to_string(), url))
}

/// Pattern B on a single span: `•` alone, then `<em>Title</em>`, optional spans, link.
fn match_titled_bullet(span: ElementRef<'_>) -> Option<(String, String)> {
    let text = leaf_text(span)?;
    if !text.trim_end().ends_with(BULLET_GLYPHS) {
        return None;
    }

    let title_el = next_element_sibling(span)?;
    if title_el.value().name() != "em" {
        return None;
    }
    let title = leaf_text(title_el)?;
    if !BULLET_LABEL_CHARS.contains(&title.chars().count()) {
        return None;
    }

    let mut current = next_element_sibling(title_el)?;
    while current.value().name() == "span" {
        leaf_text(current)?;
        current = next_element_sibling(current)?;
    }

    let url = http_href(current)?;
    Some((title.trim().to_string(), url))
}

/// Label text following a bullet glyph and ending with a colon at the end of the
/// span text. The first glyph that yields a valid label wins.
///
/// Whitespace between the glyph and the label (back to any line break) may count
/// toward the minimum length, so `• X:` passes a two-char minimum.
fn label_after_bullet<'t>(text: &'t str, label_chars: &RangeInclusive<usize>) -> Option<&'t str> {
    text.char_indices()
        .filter(|(_, c)| BULLET_GLYPHS.contains(c))
        .find_map(|(idx, glyph)| {
            let after = &text[idx + glyph.len_utf8()..];
            let rest = after.trim_start();
            let label = rest.trim_end().strip_suffix(':')?;
            if label.trim().is_empty() || label.contains('\n') {
                return None;
            }

            let leading = &after[..after.len() - rest.len()];
            let spare = leading.chars().rev().take_while(|c| *c != '\n').count();
            let count = label.chars().count();
            (count <= *label_chars.end() && count + spare >= *label_chars.start()).then_some(label)
        })
}

/// Text of an element that has no child elements; `None` when it nests tags.
pub(crate) fn leaf_text(element: ElementRef<'_>) -> Option<String> {
    if element.children().any(|child| child.value().is_element()) {
        return None;
    }
    Some(element.text().collect())
}

/// Next sibling element, allowing only whitespace text and comments in between.
pub(crate) fn next_element_sibling(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = element.next_sibling();
    while let Some(current) = node {
        if let Some(next) = ElementRef::wrap(current) {
            return Some(next);
        }
        if let Some(text) = current.value().as_text() {
            if !text.trim().is_empty() {
                return None;
            }
        }
        node = current.next_sibling();
    }
    None
}

/// The `href` of an anchor when it is an absolute HTTP(S) URL.
pub(crate) fn http_href(anchor: ElementRef<'_>) -> Option<String> {
    if anchor.value().name() != "a" {
        return None;
    }
    let href = anchor.value().attr("href")?.trim();
    let parsed = Url::parse(href).ok()?;
    match parsed.scheme() {
        "http" | "https" if parsed.has_host() => Some(href.to_string()),
        _ => None,
    }
}

pub(crate) fn select_all<'a>(document: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}
