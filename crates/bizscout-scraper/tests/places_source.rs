//! Integration tests for `PlacesSource` and `discover_listings` against a
//! `wiremock` server standing in for the Places API.

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizscout_scraper::{
    discover_listings, JsonClient, ListingQuery, ListingSource, Pacer, PlacesSource, ScraperError,
};

fn test_source(server: &MockServer, key: Option<&str>) -> PlacesSource {
    let client = JsonClient::new(5, "bizscout-test/0.1", 0, 0).expect("failed to build test client");
    PlacesSource::new(client, &server.uri(), key.map(str::to_owned))
}

fn place(name: &str, address: &str, place_id: &str) -> serde_json::Value {
    json!({
        "name": name,
        "formatted_address": address,
        "rating": 4.6,
        "user_ratings_total": 88,
        "place_id": place_id
    })
}

#[tokio::test]
async fn search_page_sends_query_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("query", "med spa in Miami, FL"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [place("Glow Med Spa", "100 Ocean Dr, Miami, FL", "p1")],
            "next_page_token": "next-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_source(&server, Some("test-key"))
        .search_page("med spa in Miami, FL", None)
        .await
        .expect("search page should succeed");

    assert_eq!(page.tiles.len(), 1);
    assert_eq!(page.tiles[0].name.as_deref(), Some("Glow Med Spa"));
    assert_eq!(page.tiles[0].reviews_count, Some(88));
    assert_eq!(page.next_page_token.as_deref(), Some("next-1"));
}

#[tokio::test]
async fn request_denied_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "results": []
        })))
        .mount(&server)
        .await;

    let err = test_source(&server, Some("bad-key"))
        .search_page("dentist in Austin, TX", None)
        .await
        .unwrap_err();
    assert!(matches!(err, ScraperError::Rejected { source_name: "places", .. }));
}

#[tokio::test]
async fn details_join_weekday_hours() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .and(query_param("place_id", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": {
                "formatted_phone_number": "(305) 555-0100",
                "website": "https://glowmedspa.example/",
                "opening_hours": { "weekday_text": ["Monday: 9 AM–5 PM", "Tuesday: Closed"] }
            }
        })))
        .mount(&server)
        .await;

    let details = test_source(&server, Some("test-key"))
        .details("p1")
        .await
        .expect("details should succeed");

    assert_eq!(details.phone.as_deref(), Some("(305) 555-0100"));
    assert_eq!(details.website.as_deref(), Some("https://glowmedspa.example/"));
    assert_eq!(details.hours.as_deref(), Some("Monday: 9 AM–5 PM; Tuesday: Closed"));
}

#[tokio::test]
async fn discovery_follows_tokens_and_resolves_details() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .and(query_param("pagetoken", "next-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                place("GLOW MED SPA", "100 Ocean Dr., Miami, FL", "p1-dup"),
                place("Radiance Clinic", "9 Palm Ave, Miami, FL", "p3")
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                place("Glow Med Spa", "100 Ocean Dr, Miami, FL", "p1"),
                place("Luxe Aesthetics", "5 Bay St, Miami, FL", "p2")
            ],
            "next_page_token": "next-1"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/details/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "result": { "website": "https://example.com" }
        })))
        .mount(&server)
        .await;

    let source = test_source(&server, Some("test-key"));
    let stubs = discover_listings(
        &source,
        &Pacer::disabled(),
        &ListingQuery::new("med spa", "Miami, FL"),
        10,
    )
    .await
    .expect("discovery should succeed");

    let names: Vec<&str> = stubs.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Glow Med Spa", "Luxe Aesthetics", "Radiance Clinic"]);
    assert!(stubs.iter().all(|s| s.website.as_deref() == Some("https://example.com")));
}

#[tokio::test]
async fn missing_key_makes_discovery_unavailable() {
    let server = MockServer::start().await;

    let err = discover_listings(
        &test_source(&server, None),
        &Pacer::disabled(),
        &ListingQuery::new("med spa", "Miami, FL"),
        10,
    )
    .await
    .unwrap_err();

    assert_eq!(err.source_name, "places");
    assert!(err.reason.contains("credentials"));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn forbidden_first_page_makes_discovery_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/textsearch/json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = discover_listings(
        &test_source(&server, Some("test-key")),
        &Pacer::disabled(),
        &ListingQuery::new("med spa", "Miami, FL"),
        10,
    )
    .await
    .unwrap_err();
    assert!(err.reason.contains("403"));
}
