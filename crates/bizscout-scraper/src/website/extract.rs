//! Pure classification of a fetched page into [`ExtractedWebsiteData`].
//!
//! Nothing here touches the network; every function maps document text and
//! the active niche to structured fields.

use std::collections::HashSet;
use std::sync::LazyLock;

use bizscout_core::{ExtractedWebsiteData, NicheDefinition, PageImage, PageLink};
use regex::Regex;
use scraper::{Html, Selector};

use super::team::extract_team_members;
use super::text::{collapse_whitespace, element_text, visible_blocks};
use crate::social::handle_from_url;

/// Upper bound on reported call-to-action labels.
pub const MAX_CTA_BUTTONS: usize = 10;

/// `<img>` elements inspected per page.
pub const MAX_IMAGES: usize = 50;

/// Anchors inspected per page when collecting internal links.
pub const MAX_LINKS: usize = 100;

const CTA_KEYWORDS: &[&str] = &[
    "book",
    "schedule",
    "appointment",
    "contact",
    "call",
    "reserve",
    "get started",
    "sign up",
    "free consultation",
    "request",
    "order",
];

/// A currency symbol, then an amount with optional thousands separators and
/// optional decimals.
static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[$£€]\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?")
        .expect("price regex is valid")
});

static CTA_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = CTA_KEYWORDS
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})")).expect("cta regex is valid")
});

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("title selector is valid"));
static META_DESCRIPTION_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"], meta[property="og:description"]"#)
        .expect("meta description selector is valid")
});
static VIEWPORT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="viewport"]"#).expect("viewport selector is valid")
});
static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("h1 selector is valid"));
static CTA_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"button, a[class], a[role="button"], input[type="submit"]"#)
        .expect("cta selector is valid")
});
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("image selector is valid"));

/// Classify `html` fetched from `url` under `niche`.
///
/// Each field is computed independently; a page without the relevant
/// markup yields an empty value for that field only.
#[must_use]
pub fn extract_website_data(url: &str, html: &str, niche: &NicheDefinition) -> ExtractedWebsiteData {
    let document = Html::parse_document(html);
    let blocks = visible_blocks(document.root_element());
    let base = reqwest::Url::parse(url).ok();

    ExtractedWebsiteData {
        url: url.to_owned(),
        services: match_services(&blocks, niche),
        prices: blocks.iter().flat_map(|block| extract_prices(block)).collect(),
        team_members: extract_team_members(&document),
        meta_title: meta_title(&document),
        meta_description: meta_description(&document),
        h1_tags: h1_tags(&document),
        images: images(&document, base.as_ref()),
        internal_links: internal_links(&document, base.as_ref()),
        has_mobile_viewport: document.select(&VIEWPORT_SELECTOR).next().is_some(),
        cta_buttons: cta_buttons(&document),
        text_length: blocks
            .iter()
            .flat_map(|block| block.chars())
            .filter(|c| !c.is_whitespace())
            .count(),
        instagram_url: instagram_url(&document),
    }
}

/// First occurrence of one configured term.
struct ServiceHit<'a> {
    position: usize,
    is_vocabulary: bool,
    name: &'a str,
}

/// Niche services mentioned in the visible text `blocks`, deduplicated
/// case-insensitively and ordered by first appearance.
///
/// Each block is one text node, so a name never matches across element
/// boundaries. Canonical service names are reported verbatim; vocabulary
/// terms as configured. Matching is case-insensitive on word boundaries and
/// accepts a trailing plural `s`/`es`. A vocabulary term occurring inside a
/// canonical name ("laser" in "Laser Hair Removal") does not count.
#[must_use]
pub fn match_services<S: AsRef<str>>(blocks: &[S], niche: &NicheDefinition) -> Vec<String> {
    // Start offset of every block as if the blocks were joined by one space.
    let offsets: Vec<usize> = blocks
        .iter()
        .scan(0, |next, block| {
            let start = *next;
            *next += block.as_ref().len() + 1;
            Some(start)
        })
        .collect();
    let spans_of = |pattern: &Regex| -> Vec<(usize, usize)> {
        blocks
            .iter()
            .zip(&offsets)
            .flat_map(|(block, &offset)| {
                pattern
                    .find_iter(block.as_ref())
                    .map(move |m| (offset + m.start(), offset + m.end()))
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    let mut hits: Vec<ServiceHit<'_>> = Vec::new();
    let mut canonical_spans: Vec<(usize, usize)> = Vec::new();

    for term in &niche.canonical_services {
        let Some(pattern) = term_pattern(term) else {
            continue;
        };
        let spans = spans_of(&pattern);
        if let Some(&(position, _)) = spans.first() {
            hits.push(ServiceHit {
                position,
                is_vocabulary: false,
                name: term.as_str(),
            });
        }
        canonical_spans.extend(spans);
    }

    for term in &niche.vocabulary {
        let Some(pattern) = term_pattern(term) else {
            continue;
        };
        let standalone = spans_of(&pattern).into_iter().find(|&(found, _)| {
            !canonical_spans
                .iter()
                .any(|&(start, end)| found >= start && found < end)
        });
        if let Some((position, _)) = standalone {
            hits.push(ServiceHit {
                position,
                is_vocabulary: true,
                name: term.as_str(),
            });
        }
    }

    hits.sort_by_key(|hit| (hit.position, hit.is_vocabulary));

    let mut seen = HashSet::new();
    hits.into_iter()
        .filter(|hit| seen.insert(hit.name.to_lowercase()))
        .map(|hit| hit.name.to_owned())
        .collect()
}

/// Word-boundary regex for one configured term; inner whitespace matches
/// any run of whitespace.
fn term_pattern(term: &str) -> Option<Regex> {
    let words: Vec<String> = term.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return None;
    }
    let body = words.join(r"\s+");
    match Regex::new(&format!(r"(?i)\b{body}(?:e?s)?\b")) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(term, error = %e, "skipping unmatchable service term");
            None
        }
    }
}

/// Currency strings exactly as written, in document order, duplicates kept.
#[must_use]
pub fn extract_prices(text: &str) -> Vec<String> {
    PRICE_RE
        .find_iter(text)
        .map(|m| m.as_str().to_owned())
        .collect()
}

/// The first [`MAX_IMAGES`] `<img>` elements that carry a `src`, resolved
/// against the page URL.
fn images(document: &Html, base: Option<&reqwest::Url>) -> Vec<PageImage> {
    document
        .select(&IMAGE_SELECTOR)
        .take(MAX_IMAGES)
        .filter_map(|el| {
            let src = resolve(base, el.value().attr("src")?.trim())?;
            let alt = el.value().attr("alt").map(collapse_whitespace).unwrap_or_default();
            Some(PageImage {
                src: src.to_string(),
                has_alt: !alt.is_empty(),
                alt,
            })
        })
        .collect()
}

/// Links among the first [`MAX_LINKS`] anchors that stay on the page's host.
fn internal_links(document: &Html, base: Option<&reqwest::Url>) -> Vec<PageLink> {
    let Some(host) = base.and_then(reqwest::Url::host_str) else {
        return Vec::new();
    };
    document
        .select(&ANCHOR_SELECTOR)
        .take(MAX_LINKS)
        .filter_map(|el| {
            let url = resolve(base, el.value().attr("href")?.trim())?;
            (url.host_str() == Some(host)).then(|| PageLink {
                url: url.to_string(),
                text: element_text(el),
            })
        })
        .collect()
}

/// `reference` as an absolute URL; relative references need a base.
fn resolve(base: Option<&reqwest::Url>, reference: &str) -> Option<reqwest::Url> {
    if reference.is_empty() {
        return None;
    }
    match base {
        Some(base) => base.join(reference).ok(),
        None => reqwest::Url::parse(reference).ok(),
    }
}

fn meta_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn meta_description(document: &Html) -> Option<String> {
    document
        .select(&META_DESCRIPTION_SELECTOR)
        .filter_map(|el| el.value().attr("content"))
        .map(collapse_whitespace)
        .find(|d| !d.is_empty())
}

fn h1_tags(document: &Html) -> Vec<String> {
    document
        .select(&H1_SELECTOR)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Unique booking/contact labels in document order, at most
/// [`MAX_CTA_BUTTONS`].
fn cta_buttons(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    document
        .select(&CTA_SELECTOR)
        .filter_map(|el| {
            let label = match el.value().attr("value") {
                Some(value) if el.value().name() == "input" => collapse_whitespace(value),
                _ => element_text(el),
            };
            (!label.is_empty() && label.chars().count() <= 60 && CTA_RE.is_match(&label))
                .then_some(label)
        })
        .filter(|label| seen.insert(label.to_lowercase()))
        .take(MAX_CTA_BUTTONS)
        .collect()
}

/// First link that points at an Instagram profile (not a post, reel, or
/// explore page).
fn instagram_url(document: &Html) -> Option<String> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|el| el.value().attr("href"))
        .map(str::trim)
        .find(|href| handle_from_url(href).is_some())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
