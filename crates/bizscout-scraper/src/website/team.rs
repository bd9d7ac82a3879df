//! Staff-name heuristics: find headings that announce a team section and
//! pull proper-noun-like names out of the surrounding blocks.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::text::{element_text, visible_blocks};

/// Upper bound on reported team members.
pub const MAX_TEAM_MEMBERS: usize = 15;

/// Containers climbed from a cue heading before giving up.
const MAX_CONTAINER_LEVELS: usize = 3;

const STAFF_CUES: &[&str] = &[
    "team",
    "staff",
    "our doctors",
    "our dentists",
    "providers",
    "meet the",
    "meet dr",
    "practitioners",
    "physicians",
    "specialists",
    "injectors",
    "stylists",
];

/// Words that never occur in a person's name but do occur in navigation,
/// footers, job titles, and capitalized headings.
const STRUCTURAL_WORDS: &[&str] = &[
    "about", "accepting", "aesthetic", "aesthetics", "appointment", "assistant", "beauty",
    "blog", "board", "book", "call", "care", "careers", "center", "certified", "clinic",
    "consultation", "contact", "coordinator", "copyright", "dental", "dermatologist",
    "director", "esthetician", "experience", "facebook", "faq", "follow", "founder", "gallery",
    "gift", "health", "home", "hours", "hygienist", "injector", "instagram", "lead", "learn",
    "location", "locations", "manager", "medical", "meet", "menu", "more", "new", "now",
    "nurse", "online", "our", "owner", "patients", "policy", "practitioner", "pricing",
    "privacy", "read", "receptionist", "reserved", "reviews", "rights", "schedule", "senior",
    "services", "skin", "specials", "specialist", "staff", "stylist", "team", "terms",
    "therapist", "today", "trainer", "treatments", "welcome", "wellness",
];

/// Staff cues as whole words, so "Steam Room" is not a team heading.
static STAFF_CUE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = STAFF_CUES
        .iter()
        .map(|cue| cue.split_whitespace().map(regex::escape).collect::<Vec<_>>().join(r"\s+"))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})s?\b")).expect("staff cue regex is valid")
});

static HEADING_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1, h2, h3, h4, h5, h6").expect("heading selector is valid")
});

/// Two to four capitalized words, optionally after "Dr." and optionally
/// followed by clinical credentials.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:Dr\.?\s+)?\p{Lu}\p{Ll}+(?:[-'’]\p{Lu}?\p{Ll}+)?\b(?:\s+\p{Lu}\.)?(?:\s+\p{Lu}\p{Ll}*(?:[-'’]\p{Lu}?\p{Ll}+)?\b){1,3}(?:,?\s+(?:MD|DDS|DMD|DO|DC|RN|BSN|NP|FNP-C|APRN|PA-C|PA|LE)\b)*",
    )
    .expect("team name regex is valid")
});

/// Names found near staff headings, in document order, deduplicated
/// case-insensitively and capped at [`MAX_TEAM_MEMBERS`].
pub(crate) fn extract_team_members(document: &Html) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();

    for heading in document.select(&HEADING_SELECTOR) {
        if !STAFF_CUE_RE.is_match(&element_text(heading)) {
            continue;
        }

        for name in names_near(heading) {
            if members.len() >= MAX_TEAM_MEMBERS {
                return members;
            }
            if seen.insert(name.to_lowercase()) {
                members.push(name);
            }
        }
    }

    members
}

/// Names from the closest enclosing container of `heading` that yields any,
/// climbing at most [`MAX_CONTAINER_LEVELS`] sectioning ancestors. Flat
/// pages without such containers fall back to the heading's following
/// siblings, up to the next heading of the same or a higher level.
fn names_near(heading: ElementRef<'_>) -> Vec<String> {
    let heading_blocks = visible_blocks(heading);
    let containers = heading
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !matches!(el.value().name(), "body" | "html"))
        .filter(|el| {
            matches!(
                el.value().name(),
                "section" | "article" | "div" | "main" | "aside" | "ul"
            )
        })
        .take(MAX_CONTAINER_LEVELS);

    for container in containers {
        let names: Vec<String> = visible_blocks(container)
            .iter()
            .filter(|block| !heading_blocks.contains(block))
            .filter_map(|block| name_span(block))
            .collect();
        if !names.is_empty() {
            return names;
        }
    }

    let level = heading_level(heading).unwrap_or(6);
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| heading_level(*el).is_none_or(|l| l > level))
        .flat_map(visible_blocks)
        .filter_map(|block| name_span(&block))
        .collect()
}

/// `Some(n)` for an `<hn>` element.
fn heading_level(element: ElementRef<'_>) -> Option<u8> {
    match element.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// The proper-noun span a block starts with, unless it contains a
/// structural word or the block runs on into lowercase prose.
pub(crate) fn name_span(block: &str) -> Option<String> {
    let block = block.trim();
    let found = NAME_RE.find(block)?;
    if block[found.end()..]
        .trim_start()
        .chars()
        .next()
        .is_some_and(char::is_lowercase)
    {
        return None;
    }
    let span = found.as_str().trim_end_matches(',');
    let has_structural_word = span
        .split(|c: char| c.is_whitespace() || c == ',')
        .map(|w| w.trim_matches('.').to_lowercase())
        .any(|w| STRUCTURAL_WORDS.contains(&w.as_str()));
    (!has_structural_word).then(|| span.to_owned())
}
