//! Records produced and merged by the extraction pipeline.

use serde::{Deserialize, Serialize};

/// A candidate business as discovered on the map listing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingStub {
    pub name: String,
    /// Star rating in `0.0..=5.0`.
    pub rating: Option<f64>,
    pub reviews_count: Option<u32>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub hours: Option<String>,
}

/// An `<img>` on a business website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    /// Absolute URL.
    pub src: String,
    pub alt: String,
    pub has_alt: bool,
}

/// A link to another page on the same host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: String,
    pub text: String,
}

/// Fields recovered from a business's own website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedWebsiteData {
    pub url: String,
    /// Deduplicated, ordered by first appearance in the page.
    pub services: Vec<String>,
    /// Currency strings exactly as written, in document order.
    pub prices: Vec<String>,
    pub team_members: Vec<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub h1_tags: Vec<String>,
    pub images: Vec<PageImage>,
    pub internal_links: Vec<PageLink>,
    pub has_mobile_viewport: bool,
    pub cta_buttons: Vec<String>,
    /// Non-whitespace characters in the visible page text.
    pub text_length: usize,
    pub instagram_url: Option<String>,
}

/// Public statistics of a social profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProfileData {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub is_business: bool,
    /// Percentage, two decimals. `None` when it cannot be defined.
    pub engagement_rate: Option<f64>,
}

/// Structured insight returned by the analyzer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub revenue_streams: Vec<String>,
    pub estimated_revenue_tier: Option<String>,
    pub pricing_strategy: Option<String>,
    pub service_quality_score: Option<f64>,
    pub competitive_assessment: Option<String>,
    pub niche_specific_insights: Option<String>,
}

/// Design and SEO grade of a business website.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteGrade {
    /// `0..=100`, design plus SEO.
    pub total_score: u32,
    /// `0..=50`.
    pub design_score: u32,
    /// `0..=50`.
    pub seo_score: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// One business after enrichment: the listing fields are always present,
/// every enrichment is independently optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    #[serde(flatten)]
    pub listing: ListingStub,
    pub niche: String,
    pub location: String,
    pub website_data: Option<ExtractedWebsiteData>,
    pub social: Option<SocialProfileData>,
    pub website_grade: Option<WebsiteGrade>,
    pub analysis: Option<AnalysisResult>,
}

impl BusinessRecord {
    /// Start a record from a listing with no enrichment yet.
    #[must_use]
    pub fn from_listing(listing: ListingStub, niche: &str, location: &str) -> Self {
        Self {
            listing,
            niche: niche.to_string(),
            location: location.to_string(),
            website_data: None,
            social: None,
            website_grade: None,
            analysis: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.listing.name
    }
}
