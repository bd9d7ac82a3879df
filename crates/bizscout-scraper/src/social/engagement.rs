//! Engagement rate over a profile's most recent posts.

use super::PostStats;

/// Posts sampled when no window is configured.
pub const DEFAULT_POST_SAMPLE: usize = 12;

/// Average interactions (likes + comments) over the first `sample` posts,
/// as a percentage of followers, rounded to two decimals.
///
/// `posts` must be ordered most recent first. Returns `None` when the rate
/// is undefined: no followers, no sampled posts, or a zero window.
#[must_use]
pub fn engagement_rate(followers: u64, posts: &[PostStats], sample: usize) -> Option<f64> {
    if followers == 0 {
        return None;
    }
    let sampled = &posts[..posts.len().min(sample)];
    if sampled.is_empty() {
        return None;
    }

    let interactions: u64 = sampled
        .iter()
        .map(|p| p.likes.saturating_add(p.comments))
        .fold(0, u64::saturating_add);

    // Counts stay far below 2^52, so the float conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let rate = (interactions as f64 / sampled.len() as f64) / followers as f64 * 100.0;
    Some((rate * 100.0).round() / 100.0)
}
