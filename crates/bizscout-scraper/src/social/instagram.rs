//! Public Instagram profile source (`web_profile_info`).

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;

use super::{PostStats, ProfileSource, RawProfile};
use crate::client::JsonClient;
use crate::error::ScraperError;

const SOURCE_NAME: &str = "instagram";
const APP_ID_HEADER: &str = "x-ig-app-id";

#[derive(Debug, Deserialize)]
struct ProfileEnvelope {
    #[serde(default)]
    data: Option<ProfileData>,
}

#[derive(Debug, Deserialize)]
struct ProfileData {
    #[serde(default)]
    user: Option<UserNode>,
}

#[derive(Debug, Deserialize)]
struct Count {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct UserNode {
    username: String,
    #[serde(default)]
    biography: Option<String>,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    is_business_account: bool,
    edge_followed_by: Count,
    edge_follow: Count,
    edge_owner_to_timeline_media: Timeline,
}

#[derive(Debug, Deserialize)]
struct Timeline {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    edges: Vec<MediaEdge>,
}

#[derive(Debug, Deserialize)]
struct MediaEdge {
    node: MediaNode,
}

#[derive(Debug, Deserialize)]
struct MediaNode {
    #[serde(alias = "edge_media_preview_like")]
    edge_liked_by: Count,
    edge_media_to_comment: Count,
}

/// Looks up profiles through the public web profile endpoint.
#[derive(Debug, Clone)]
pub struct InstagramSource {
    client: JsonClient,
    base_url: String,
    headers: HeaderMap,
}

impl InstagramSource {
    /// `app_id` is sent as the web app identifier header when present.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidHeader`] when `app_id` is not a valid
    /// header value.
    pub fn new(client: JsonClient, base_url: &str, app_id: Option<&str>) -> Result<Self, ScraperError> {
        let mut headers = HeaderMap::new();
        if let Some(app_id) = app_id {
            let value = HeaderValue::from_str(app_id).map_err(|e| ScraperError::InvalidHeader {
                name: APP_ID_HEADER,
                reason: e.to_string(),
            })?;
            headers.insert(APP_ID_HEADER, value);
        }
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            headers,
        })
    }
}

#[async_trait]
impl ProfileSource for InstagramSource {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn lookup(&self, handle: &str) -> Result<Option<RawProfile>, ScraperError> {
        let url = format!(
            "{}/api/v1/users/web_profile_info/?username={}",
            self.base_url,
            utf8_percent_encode(handle, NON_ALPHANUMERIC)
        );

        let envelope: ProfileEnvelope = match self
            .client
            .get_json(&url, &self.headers, "instagram profile")
            .await
        {
            Ok(envelope) => envelope,
            Err(ScraperError::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(envelope.data.and_then(|d| d.user).map(into_raw_profile))
    }
}

fn into_raw_profile(user: UserNode) -> RawProfile {
    RawProfile {
        username: user.username,
        followers: user.edge_followed_by.count,
        following: user.edge_follow.count,
        posts: user.edge_owner_to_timeline_media.count,
        bio: user.biography,
        is_verified: user.is_verified,
        is_business: user.is_business_account,
        recent_posts: user
            .edge_owner_to_timeline_media
            .edges
            .into_iter()
            .map(|edge| PostStats {
                likes: edge.node.edge_liked_by.count,
                comments: edge.node.edge_media_to_comment.count,
            })
            .collect(),
    }
}
