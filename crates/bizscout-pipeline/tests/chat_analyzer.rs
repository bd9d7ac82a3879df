//! Integration tests for `ChatAnalyzer` against a mock chat completion API.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bizscout_core::{BusinessRecord, ListingStub, NicheDefinition};
use bizscout_pipeline::{AnalysisError, Analyzer, ChatAnalyzer};

fn niche() -> NicheDefinition {
    NicheDefinition {
        key: "dentists".to_string(),
        label: "Dentists".to_string(),
        search_query: None,
        vocabulary: vec!["whitening".to_string()],
        canonical_services: vec!["Teeth Whitening".to_string()],
    }
}

fn record() -> BusinessRecord {
    BusinessRecord::from_listing(
        ListingStub {
            name: "Smile Dental".to_string(),
            rating: Some(4.9),
            reviews_count: Some(40),
            address: None,
            phone: None,
            website: None,
            hours: None,
        },
        "dentists",
        "Austin, TX",
    )
}

fn analyzer(server: &MockServer) -> ChatAnalyzer {
    ChatAnalyzer::new(
        &format!("{}/openai/v1/chat/completions", server.uri()),
        "test-model",
        "test-key",
        5,
    )
    .expect("failed to build analyzer")
}

#[tokio::test]
async fn parses_fenced_reply_from_first_choice() {
    let server = MockServer::start().await;

    let content = "```json\n{\"revenue_streams\":[\"Cleanings\",\"Whitening\"],\
                   \"estimated_revenue_tier\":\"Medium\",\"service_quality_score\":8}\n```";
    Mock::given(method("POST"))
        .and(path("/openai/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analysis = analyzer(&server)
        .analyze(&record(), &niche())
        .await
        .expect("analysis should succeed");

    assert_eq!(analysis.revenue_streams, vec!["Cleanings", "Whitening"]);
    assert_eq!(analysis.estimated_revenue_tier.as_deref(), Some("Medium"));
    assert_eq!(analysis.service_quality_score, Some(8.0));
    assert_eq!(analysis.pricing_strategy, None);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = analyzer(&server)
        .analyze(&record(), &niche())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::UnexpectedStatus { status: 401, ref body } if body.contains("invalid")
    ));
}

#[tokio::test]
async fn missing_choices_is_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = analyzer(&server)
        .analyze(&record(), &niche())
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyResponse));
}
