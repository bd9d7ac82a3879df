//! Website extraction: fetch a business's own page and classify it against
//! the active niche.

mod extract;
mod fetch;
mod team;
mod text;

use async_trait::async_trait;
use bizscout_core::{ExtractedWebsiteData, NicheDefinition};
use thiserror::Error;

use crate::client::normalize_website_url;

pub use extract::{
    extract_prices, extract_website_data, match_services, MAX_CTA_BUTTONS, MAX_IMAGES, MAX_LINKS,
};
pub use fetch::HttpPageFetcher;
pub use team::MAX_TEAM_MEMBERS;

/// The website could not be fetched: DNS or connection failure, timeout,
/// non-2xx status, or an unusable URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("website {url} unreachable: {reason}")]
pub struct WebsiteUnreachableError {
    pub url: String,
    pub reason: String,
}

/// Retrieves the static HTML of a page. No script execution.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<String, WebsiteUnreachableError>;
}

/// Fetch `raw_url` and classify the page under `niche`.
///
/// # Errors
///
/// Returns [`WebsiteUnreachableError`] when the URL is unusable or the page
/// cannot be fetched.
pub async fn scrape_website(
    fetcher: &dyn PageFetcher,
    raw_url: &str,
    niche: &NicheDefinition,
) -> Result<ExtractedWebsiteData, WebsiteUnreachableError> {
    let url = normalize_website_url(raw_url).map_err(|reason| WebsiteUnreachableError {
        url: raw_url.to_owned(),
        reason,
    })?;

    let html = fetcher.fetch_html(url.as_str()).await?;
    let data = extract_website_data(url.as_str(), &html, niche);

    tracing::debug!(
        url = %url,
        services = data.services.len(),
        prices = data.prices.len(),
        team_members = data.team_members.len(),
        "website classified"
    );
    Ok(data)
}
