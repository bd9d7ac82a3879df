//! Social profile enrichment: derive candidate handles, look them up on a
//! public profile source, and compute engagement.

mod engagement;
mod handles;
mod instagram;

use async_trait::async_trait;
use bizscout_core::SocialProfileData;
use thiserror::Error;

use crate::error::ScraperError;
use crate::rate_limit::Pacer;

pub use engagement::{engagement_rate, DEFAULT_POST_SAMPLE};
pub use handles::{candidate_handles, handle_from_url, MAX_HANDLE_LEN};
pub use instagram::InstagramSource;

/// Interaction counts of one recent post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostStats {
    pub likes: u64,
    pub comments: u64,
}

/// A public profile as returned by the source, before engagement is derived.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProfile {
    pub username: String,
    pub followers: u64,
    pub following: u64,
    pub posts: u64,
    pub bio: Option<String>,
    pub is_verified: bool,
    pub is_business: bool,
    /// Most recent first.
    pub recent_posts: Vec<PostStats>,
}

/// A public profile lookup service.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Look up one handle. A profile that does not exist is `Ok(None)`.
    async fn lookup(&self, handle: &str) -> Result<Option<RawProfile>, ScraperError>;
}

/// Recoverable failure of the profile source (network, auth, rate limit,
/// or malformed payload).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("profile lookup for '{handle}' failed: {reason}")]
pub struct ProfileLookupError {
    pub handle: String,
    pub reason: String,
}

/// Find the business's public profile and summarise it.
///
/// Candidates from [`candidate_handles`] are tried in order, each lookup
/// waiting on `pacer`; the first profile found wins. A failing candidate
/// does not stop the search.
///
/// # Errors
///
/// Returns the last [`ProfileLookupError`] when no candidate was found and at
/// least one lookup failed. When every lookup simply found nothing the
/// result is `Ok(None)`.
pub async fn enrich_profile(
    source: &dyn ProfileSource,
    pacer: &Pacer,
    business_name: &str,
    website_instagram_url: Option<&str>,
    post_sample: usize,
) -> Result<Option<SocialProfileData>, ProfileLookupError> {
    let candidates = candidate_handles(business_name, website_instagram_url);
    let mut last_error: Option<ProfileLookupError> = None;

    for handle in candidates {
        pacer.wait().await;
        match source.lookup(&handle).await {
            Ok(Some(profile)) => {
                tracing::debug!(
                    business = business_name,
                    handle = %handle,
                    followers = profile.followers,
                    "profile found"
                );
                return Ok(Some(summarise(profile, post_sample)));
            }
            Ok(None) => {
                tracing::debug!(business = business_name, handle = %handle, "no profile for handle");
            }
            Err(e) => {
                tracing::warn!(
                    business = business_name,
                    handle = %handle,
                    source = source.source_name(),
                    error = %e,
                    "profile lookup failed; trying next candidate"
                );
                last_error = Some(ProfileLookupError {
                    handle,
                    reason: e.to_string(),
                });
            }
        }
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(None),
    }
}

fn summarise(profile: RawProfile, post_sample: usize) -> SocialProfileData {
    let engagement_rate = engagement_rate(profile.followers, &profile.recent_posts, post_sample);
    SocialProfileData {
        username: profile.username,
        followers: profile.followers,
        following: profile.following,
        posts: profile.posts,
        bio: profile.bio.filter(|b| !b.trim().is_empty()),
        is_verified: profile.is_verified,
        is_business: profile.is_business,
        engagement_rate,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use super::*;

    #[derive(Default)]
    struct MapSource {
        profiles: HashMap<&'static str, RawProfile>,
        failing: Vec<&'static str>,
        asked: Mutex<Vec<String>>,
        asked_at: Mutex<Vec<Instant>>,
    }

    #[async_trait]
    impl ProfileSource for MapSource {
        fn source_name(&self) -> &'static str {
            "map"
        }

        async fn lookup(&self, handle: &str) -> Result<Option<RawProfile>, ScraperError> {
            self.asked.lock().unwrap().push(handle.to_owned());
            self.asked_at.lock().unwrap().push(Instant::now());
            if self.failing.iter().any(|f| *f == handle) {
                return Err(ScraperError::RateLimited {
                    domain: "profiles.example".to_owned(),
                    retry_after_secs: 60,
                });
            }
            Ok(self.profiles.get(handle).cloned())
        }
    }

    fn profile(username: &str, followers: u64) -> RawProfile {
        RawProfile {
            username: username.to_owned(),
            followers,
            following: 10,
            posts: 2,
            bio: Some("  ".to_owned()),
            recent_posts: vec![PostStats { likes: 45, comments: 5 }],
            ..RawProfile::default()
        }
    }

    #[tokio::test]
    async fn first_found_candidate_wins() {
        let mut source = MapSource::default();
        source.profiles.insert("glowmedspa", profile("glowmedspa", 1_000));

        let found = enrich_profile(&source, &Pacer::disabled(), "The Glow Med Spa", None, 12)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.username, "glowmedspa");
        assert_eq!(found.engagement_rate, Some(5.0));
        assert_eq!(found.bio, None);
        assert_eq!(
            *source.asked.lock().unwrap(),
            vec!["theglowmedspa".to_owned(), "glowmedspa".to_owned()]
        );
    }

    #[tokio::test]
    async fn zero_followers_leaves_engagement_absent() {
        let mut source = MapSource::default();
        source.profiles.insert("newspa", profile("newspa", 0));

        let found = enrich_profile(&source, &Pacer::disabled(), "New Spa", None, 12)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.followers, 0);
        assert_eq!(found.engagement_rate, None);
    }

    #[tokio::test]
    async fn nothing_found_is_ok_none() {
        let source = MapSource::default();
        let found = enrich_profile(&source, &Pacer::disabled(), "Quiet Clinic", None, 12)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn failure_then_success_returns_profile() {
        let mut source = MapSource::default();
        source.failing.push("glowmiami");
        source.profiles.insert("glowspa", profile("glowspa", 500));

        let found = enrich_profile(
            &source,
            &Pacer::disabled(),
            "Glow Spa",
            Some("https://instagram.com/glowmiami"),
            12,
        )
        .await
        .unwrap();
        assert_eq!(found.map(|p| p.username).as_deref(), Some("glowspa"));
    }

    #[tokio::test]
    async fn failure_without_any_profile_is_an_error() {
        let mut source = MapSource::default();
        source.failing.push("smiledental");

        let err = enrich_profile(&source, &Pacer::disabled(), "Smile Dental", None, 12)
            .await
            .unwrap_err();
        assert_eq!(err.handle, "smiledental");
        assert!(err.reason.contains("rate limited"));
    }

    #[tokio::test]
    async fn candidate_lookups_are_spaced_by_the_pacer() {
        let source = MapSource::default();

        let found = enrich_profile(
            &source,
            &Pacer::new(60, 60),
            "The Glow Med Spa",
            Some("https://instagram.com/glow.miami/"),
            12,
        )
        .await
        .unwrap();
        assert!(found.is_none());

        let asked_at = source.asked_at.lock().unwrap();
        assert!(asked_at.len() >= 3, "linked handle plus name variants");
        for pair in asked_at.windows(2) {
            assert!(
                pair[1] - pair[0] >= Duration::from_millis(50),
                "lookups only {:?} apart",
                pair[1] - pair[0]
            );
        }
    }
}
