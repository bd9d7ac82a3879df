//! Social handle derivation from website links and business names.

use std::sync::LazyLock;

use regex::Regex;

/// Longest handle the profile source accepts.
pub const MAX_HANDLE_LEN: usize = 30;

/// Length of the truncated name candidate.
const TRUNCATED_LEN: usize = 20;

const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "at", "for", "llc", "inc", "co", "corp", "ltd",
    "pllc",
];

/// First path segments that are site sections rather than profiles.
const RESERVED_PATHS: &[&str] = &[
    "p", "explore", "accounts", "reel", "reels", "stories", "tv", "direct", "about",
];

static INSTAGRAM_PROFILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?://)?(?:www\.|m\.)?instagram\.com/([a-z0-9_.]+)/?(?:[?#].*)?$")
        .expect("instagram profile regex is valid")
});

/// The profile handle an Instagram URL points at, lowercased.
///
/// Returns `None` for post, reel, story, and explore links.
#[must_use]
pub fn handle_from_url(url: &str) -> Option<String> {
    let captures = INSTAGRAM_PROFILE_RE.captures(url.trim())?;
    let handle = captures.get(1)?.as_str().trim_matches('.').to_lowercase();
    if handle.is_empty() || RESERVED_PATHS.contains(&handle.as_str()) {
        return None;
    }
    Some(handle)
}

/// Handles to try for a business, in order, without repeats.
///
/// A handle taken from the business's own website comes first. Then three
/// guesses from the name: all alphanumerics lowercased, the same with filler
/// words ("the", "llc", ...) removed, and the first 20 characters.
#[must_use]
pub fn candidate_handles(business_name: &str, website_instagram_url: Option<&str>) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |handle: String| {
        if !handle.is_empty() && handle.len() <= MAX_HANDLE_LEN && !candidates.contains(&handle) {
            candidates.push(handle);
        }
    };

    if let Some(handle) = website_instagram_url.and_then(handle_from_url) {
        push(handle);
    }

    let words: Vec<String> = business_name
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(char::is_ascii_alphanumeric)
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    let base: String = words.concat();
    let without_fillers: String = words
        .iter()
        .filter(|w| !FILLER_WORDS.contains(&w.as_str()))
        .map(String::as_str)
        .collect();
    let truncated: String = base.chars().take(TRUNCATED_LEN).collect();

    push(base);
    push(without_fillers);
    push(truncated);
    candidates
}
