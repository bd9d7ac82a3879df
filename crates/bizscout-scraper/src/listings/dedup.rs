//! Business identity keys used to collapse repeated listing tiles.

use std::collections::HashSet;

use sha2::{Digest, Sha256};

/// Lowercases, strips punctuation, and collapses whitespace so that
/// `"Glow Med-Spa, LLC"` and `"glow med spa llc"` compare equal.
#[must_use]
pub fn normalize_identity(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else if c.is_whitespace() || matches!(c, '-' | '/' | '_') {
                ' '
            } else {
                '\0'
            }
        })
        .filter(|c| *c != '\0')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Stable identity key for a business: hash of its normalized name and
/// address. A missing address normalizes to the empty string.
#[must_use]
pub fn listing_key(name: &str, address: Option<&str>) -> String {
    let input = format!(
        "{}\x00{}",
        normalize_identity(name),
        normalize_identity(address.unwrap_or(""))
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Tracks which businesses have already been accepted; the first
/// occurrence of a key wins.
#[derive(Debug, Default)]
pub(crate) struct ListingDeduper {
    seen: HashSet<String>,
}

impl ListingDeduper {
    /// Returns `true` when this name+address has not been seen before.
    pub(crate) fn insert(&mut self, name: &str, address: Option<&str>) -> bool {
        self.seen.insert(listing_key(name, address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_punctuation_and_spacing() {
        assert_eq!(normalize_identity("Glow  Med-Spa, LLC."), "glow med spa llc");
        assert_eq!(normalize_identity("  GLOW med spa llc "), "glow med spa llc");
    }

    #[test]
    fn apostrophes_are_dropped_not_split() {
        assert_eq!(normalize_identity("Dr. Kim's Dental"), "dr kims dental");
    }

    #[test]
    fn keys_match_for_equivalent_listings() {
        assert_eq!(
            listing_key("Glow Med Spa", Some("100 Ocean Dr., Miami, FL")),
            listing_key("glow med spa", Some("100 ocean dr miami fl"))
        );
    }

    #[test]
    fn same_name_at_different_address_is_distinct() {
        assert_ne!(
            listing_key("Smile Dental", Some("1 Main St")),
            listing_key("Smile Dental", Some("2 Main St"))
        );
    }

    #[test]
    fn deduper_keeps_first_occurrence_only() {
        let mut deduper = ListingDeduper::default();
        assert!(deduper.insert("Glow Med Spa", Some("100 Ocean Dr")));
        assert!(!deduper.insert("GLOW MED SPA", Some("100 Ocean Dr.")));
        assert!(deduper.insert("Glow Med Spa", None));
        assert!(!deduper.insert("Glow Med Spa", Some("")));
    }
}
