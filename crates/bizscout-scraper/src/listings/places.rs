//! Places-style text search source: `textsearch/json` for result pages and
//! `details/json` for contact fields.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::header::HeaderMap;
use serde::Deserialize;

use super::{ListingDetails, ListingPage, ListingSource, ListingTile};
use crate::client::JsonClient;
use crate::error::ScraperError;

const SOURCE_NAME: &str = "places";
const DETAIL_FIELDS: &str = "formatted_phone_number,website,opening_hours";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    formatted_address: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    #[serde(default)]
    place_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    result: Option<PlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    opening_hours: Option<OpeningHours>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

/// Listing source backed by a Places-style JSON API.
///
/// A missing API key is not a construction error: every request then fails
/// with [`ScraperError::MissingCredentials`], which discovery reports as
/// unavailable.
#[derive(Debug, Clone)]
pub struct PlacesSource {
    client: JsonClient,
    base_url: String,
    api_key: Option<String>,
}

impl PlacesSource {
    #[must_use]
    pub fn new(client: JsonClient, base_url: &str, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    fn api_key(&self) -> Result<&str, ScraperError> {
        self.api_key
            .as_deref()
            .ok_or(ScraperError::MissingCredentials {
                source_name: SOURCE_NAME,
            })
    }
}

#[async_trait]
impl ListingSource for PlacesSource {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search_page(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<ListingPage, ScraperError> {
        let key = self.api_key()?;
        let mut url = format!(
            "{}/textsearch/json?query={}&key={}",
            self.base_url,
            utf8_percent_encode(query, NON_ALPHANUMERIC),
            utf8_percent_encode(key, NON_ALPHANUMERIC),
        );
        if let Some(token) = page_token {
            url.push_str("&pagetoken=");
            url.push_str(&utf8_percent_encode(token, NON_ALPHANUMERIC).to_string());
        }

        let response: TextSearchResponse = self
            .client
            .get_json(&url, &HeaderMap::new(), "places text search")
            .await?;
        check_status(&response.status, response.error_message.as_deref())?;

        let tiles = response.results.into_iter().map(into_tile).collect();
        Ok(ListingPage {
            tiles,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }

    async fn details(&self, detail_ref: &str) -> Result<ListingDetails, ScraperError> {
        let key = self.api_key()?;
        let url = format!(
            "{}/details/json?place_id={}&fields={}&key={}",
            self.base_url,
            utf8_percent_encode(detail_ref, NON_ALPHANUMERIC),
            utf8_percent_encode(DETAIL_FIELDS, NON_ALPHANUMERIC),
            utf8_percent_encode(key, NON_ALPHANUMERIC),
        );

        let response: DetailsResponse = self
            .client
            .get_json(&url, &HeaderMap::new(), "places details")
            .await?;
        check_status(&response.status, response.error_message.as_deref())?;

        let Some(result) = response.result else {
            return Ok(ListingDetails::default());
        };
        let hours = result
            .opening_hours
            .map(|h| h.weekday_text.join("; "))
            .filter(|h| !h.is_empty());
        Ok(ListingDetails {
            phone: result.formatted_phone_number,
            website: result.website,
            hours,
        })
    }
}

/// `OK` and `ZERO_RESULTS` are successes; every other API status is a
/// refusal carrying the API's own message.
fn check_status(status: &str, error_message: Option<&str>) -> Result<(), ScraperError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        "OVER_QUERY_LIMIT" => Err(ScraperError::RateLimited {
            domain: SOURCE_NAME.to_owned(),
            retry_after_secs: 60,
        }),
        other => Err(ScraperError::Rejected {
            source_name: SOURCE_NAME,
            reason: match error_message {
                Some(msg) => format!("{other}: {msg}"),
                None => other.to_owned(),
            },
        }),
    }
}

fn into_tile(result: PlaceResult) -> ListingTile {
    ListingTile {
        name: result.name,
        rating: result.rating,
        reviews_count: result.user_ratings_total,
        address: result.formatted_address,
        phone: None,
        website: None,
        hours: None,
        detail_ref: result.place_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_results_is_not_an_error() {
        assert!(check_status("ZERO_RESULTS", None).is_ok());
    }

    #[test]
    fn denied_status_carries_message() {
        let err = check_status("REQUEST_DENIED", Some("The provided API key is invalid.")).unwrap_err();
        assert!(matches!(
            err,
            ScraperError::Rejected { ref reason, .. } if reason.contains("API key is invalid")
        ));
    }

    #[test]
    fn result_maps_to_tile_with_detail_ref() {
        let result: PlaceResult = serde_json::from_str(
            r#"{"name":"Glow Med Spa","formatted_address":"100 Ocean Dr","rating":4.8,
                "user_ratings_total":212,"place_id":"abc"}"#,
        )
        .unwrap();
        let tile = into_tile(result);
        assert_eq!(tile.name.as_deref(), Some("Glow Med Spa"));
        assert_eq!(tile.reviews_count, Some(212));
        assert_eq!(tile.detail_ref.as_deref(), Some("abc"));
        assert!(tile.website.is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = JsonClient::new(5, "test-agent", 0, 0).unwrap();
        let source = PlacesSource::new(client, "http://127.0.0.1:9", None);
        let err = source.search_page("med spa in Miami", None).await.unwrap_err();
        assert!(matches!(err, ScraperError::MissingCredentials { source_name: "places" }));
    }
}
