//! Total merge of stage outcomes into one business record.

use bizscout_core::{BusinessRecord, ExtractedWebsiteData, ListingStub, SocialProfileData};

use crate::stage::StageOutcome;

/// Combine a listing with its enrichment outcomes.
///
/// Defined for every combination of outcomes: listing fields are always
/// kept, and each enrichment field is present exactly when its stage
/// returned `Found`.
#[must_use]
pub fn merge_record(
    listing: ListingStub,
    niche: &str,
    location: &str,
    website: StageOutcome<ExtractedWebsiteData>,
    social: StageOutcome<SocialProfileData>,
) -> BusinessRecord {
    let mut record = BusinessRecord::from_listing(listing, niche, location);
    record.website_data = website.into_option();
    record.social = social.into_option();
    record
}
