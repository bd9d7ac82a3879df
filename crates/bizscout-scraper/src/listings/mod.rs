//! Listing discovery: turns a niche search and a location into a bounded,
//! deduplicated sequence of candidate businesses.

mod dedup;
mod places;

use async_trait::async_trait;
use bizscout_core::ListingStub;
use thiserror::Error;

use crate::error::ScraperError;
use crate::rate_limit::Pacer;

pub use dedup::{listing_key, normalize_identity};
pub use places::PlacesSource;

use dedup::ListingDeduper;

/// Upper bound on candidates a single run may request.
pub const MAX_RESULTS_CAP: usize = 50;

/// Maximum number of result pages followed before giving up.
/// Prevents infinite loops on cycling page tokens.
pub const MAX_PAGES: usize = 10;

/// Clamps a requested result count into `1..=MAX_RESULTS_CAP`.
#[must_use]
pub fn clamp_max_results(requested: usize) -> usize {
    requested.clamp(1, MAX_RESULTS_CAP)
}

/// A location-scoped text search, rendered as `"{terms} in {location}"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub terms: String,
    pub location: String,
}

impl ListingQuery {
    #[must_use]
    pub fn new(terms: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            terms: terms.into(),
            location: location.into(),
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        format!("{} in {}", self.terms.trim(), self.location.trim())
    }
}

/// One result tile as returned by a search page, before dedup.
///
/// Any field may be missing; tiles without a name are skipped. When
/// `detail_ref` is set the source can fill contact fields with a second
/// lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingTile {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
    pub detail_ref: Option<String>,
}

/// Contact fields resolved from a tile's detail reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingDetails {
    pub phone: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingPage {
    pub tiles: Vec<ListingTile>,
    pub next_page_token: Option<String>,
}

/// A map-style search surface.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Short identifier used in logs and errors.
    fn source_name(&self) -> &'static str;

    /// Fetch one page of results; `page_token` is `None` for the first page.
    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, ScraperError>;

    /// Resolve the contact fields behind a tile's `detail_ref`.
    async fn details(&self, detail_ref: &str) -> Result<ListingDetails, ScraperError>;
}

/// The listing source could not be used at all for this run.
#[derive(Debug, Error)]
#[error("listing discovery unavailable ({source_name}): {reason}")]
pub struct DiscoveryUnavailableError {
    pub source_name: &'static str,
    pub reason: String,
}

/// Collect up to `max_results` distinct candidates, in source order.
///
/// Every request to `source` (search pages and detail lookups) waits on
/// `pacer` first. Pagination stops when enough candidates are collected, the
/// source has no further page, or [`MAX_PAGES`] is reached. A failure on a
/// later page or detail lookup keeps what was collected so far.
///
/// # Errors
///
/// Returns [`DiscoveryUnavailableError`] when the first search request fails.
pub async fn discover_listings(
    source: &dyn ListingSource,
    pacer: &Pacer,
    query: &ListingQuery,
    max_results: usize,
) -> Result<Vec<ListingStub>, DiscoveryUnavailableError> {
    let max_results = clamp_max_results(max_results);
    let query_text = query.text();
    let source_name = source.source_name();

    let mut deduper = ListingDeduper::default();
    let mut stubs: Vec<ListingStub> = Vec::new();
    let mut page_token: Option<String> = None;

    for page_index in 0..MAX_PAGES {
        pacer.wait().await;
        let page = match source.search_page(&query_text, page_token.as_deref()).await {
            Ok(page) => page,
            Err(e) if page_index == 0 => {
                return Err(DiscoveryUnavailableError {
                    source_name,
                    reason: e.to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    source = source_name,
                    page = page_index,
                    error = %e,
                    "listing page failed; keeping candidates collected so far"
                );
                break;
            }
        };

        tracing::debug!(
            source = source_name,
            page = page_index,
            tiles = page.tiles.len(),
            "fetched listing page"
        );

        for tile in page.tiles {
            if stubs.len() >= max_results {
                break;
            }
            let Some(name) = tile.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
            else {
                tracing::debug!(source = source_name, "skipping listing tile without a name");
                continue;
            };
            if !deduper.insert(name, tile.address.as_deref()) {
                tracing::debug!(business = name, "skipping duplicate listing");
                continue;
            }
            let stub = resolve_tile(source, pacer, tile).await;
            stubs.push(stub);
        }

        if stubs.len() >= max_results {
            break;
        }
        match page.next_page_token {
            Some(token) if page_token.as_deref() != Some(token.as_str()) => {
                page_token = Some(token);
            }
            _ => break,
        }
    }

    tracing::info!(
        source = source_name,
        query = %query_text,
        candidates = stubs.len(),
        "listing discovery complete"
    );
    Ok(stubs)
}

/// Turn a named tile into a stub, filling contact fields from the source's
/// detail lookup when the tile lacks them.
async fn resolve_tile(source: &dyn ListingSource, pacer: &Pacer, tile: ListingTile) -> ListingStub {
    let mut stub = ListingStub {
        name: tile.name.map(|n| n.trim().to_owned()).unwrap_or_default(),
        rating: tile.rating.filter(|r| (0.0..=5.0).contains(r)),
        reviews_count: tile.reviews_count,
        address: non_blank(tile.address),
        phone: non_blank(tile.phone),
        website: non_blank(tile.website),
        hours: non_blank(tile.hours),
    };

    let complete = stub.phone.is_some() && stub.website.is_some() && stub.hours.is_some();
    let Some(detail_ref) = tile.detail_ref.filter(|_| !complete) else {
        return stub;
    };

    pacer.wait().await;
    match source.details(&detail_ref).await {
        Ok(details) => {
            stub.phone = stub.phone.or(non_blank(details.phone));
            stub.website = stub.website.or(non_blank(details.website));
            stub.hours = stub.hours.or(non_blank(details.hours));
        }
        Err(e) => {
            tracing::warn!(
                business = %stub.name,
                error = %e,
                "listing detail lookup failed; keeping tile fields"
            );
        }
    }
    stub
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[path = "discover_test.rs"]
mod tests;
