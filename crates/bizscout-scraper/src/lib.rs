//! Network-facing extraction stages: listing discovery, website extraction,
//! and social profile enrichment, plus the HTTP plumbing they share.

pub mod client;
pub mod error;
pub mod listings;
pub mod rate_limit;
pub mod social;
pub mod website;

pub use client::JsonClient;
pub use error::ScraperError;
pub use listings::{
    discover_listings, DiscoveryUnavailableError, ListingDetails, ListingPage, ListingQuery,
    ListingSource, ListingTile, PlacesSource,
};
pub use rate_limit::Pacer;
pub use social::{
    enrich_profile, InstagramSource, PostStats, ProfileLookupError, ProfileSource, RawProfile,
};
pub use website::{scrape_website, HttpPageFetcher, PageFetcher, WebsiteUnreachableError};
