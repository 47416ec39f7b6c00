//! Integration tests for [`web_search::TavilyClient`] against a mockito server.
//!
//! **BDD style**: Given a mocked Tavily `/search` endpoint, when searching, then the request
//! carries the domain filter and the response is mapped into hits and images.

use mockito::Matcher;
use serde_json::json;
use web_search::{TavilyClient, WebSearch, WebSearchConfig, WebSearchError};

fn client_for(server: &mockito::ServerGuard) -> TavilyClient {
    let config = WebSearchConfig::new("tvly-test-key", vec!["example.kg".to_string()])
        .with_base_url(server.url());
    TavilyClient::new(config).expect("client")
}

/// **Test: Request is domain-restricted, asks for images and 10 results.**
#[tokio::test]
async fn search_sends_domain_filter_and_maps_results() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header("authorization", "Bearer tvly-test-key")
        .match_body(Matcher::PartialJson(json!({
            "query": "opening hours",
            "include_domains": ["example.kg"],
            "include_images": true,
            "max_results": 10
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "query": "opening hours",
                "results": [
                    {"title": "Contacts", "url": "https://example.kg/contacts",
                     "content": "Open 9-18", "score": 0.91, "published_date": "2024-05-01"},
                    {"title": "News", "url": "https://example.kg/news", "content": "Holiday hours"}
                ],
                "images": [
                    "https://example.kg/logo.png",
                    {"url": "https://example.kg/office.jpg", "description": "Office"}
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let results = client_for(&server).search("opening hours").await.unwrap();
    mock.assert_async().await;

    assert_eq!(results.results.len(), 2);
    assert_eq!(results.results[0].url, "https://example.kg/contacts");
    assert_eq!(results.results[0].published_date.as_deref(), Some("2024-05-01"));
    assert_eq!(results.results[1].score, None);
    assert_eq!(results.images.len(), 2);
    assert_eq!(results.images[0].description, None);
    assert_eq!(results.images[1].description.as_deref(), Some("Office"));
}

/// **Test: Empty result set is not an error.**
#[tokio::test]
async fn search_with_no_results_is_empty() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/search")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"query": "nothing", "results": [], "images": []}"#)
        .create_async()
        .await;

    let results = client_for(&server).search("nothing").await.unwrap();
    assert!(results.is_empty());
}

/// **Test: 401 maps to InvalidApiKey, 500 to Api with body.**
#[tokio::test]
async fn http_errors_are_classified() {
    let mut server = mockito::Server::new_async().await;
    let _unauthorized = server
        .mock("POST", "/search")
        .match_body(Matcher::PartialJson(json!({"query": "a"})))
        .with_status(401)
        .create_async()
        .await;
    let _broken = server
        .mock("POST", "/search")
        .match_body(Matcher::PartialJson(json!({"query": "b"})))
        .with_status(500)
        .with_body("upstream down")
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(matches!(
        client.search("a").await,
        Err(WebSearchError::InvalidApiKey)
    ));
    match client.search("b").await {
        Err(WebSearchError::Api { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream down");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}
