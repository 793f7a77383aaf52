use itinera::error::SearchError;
use itinera::search::tavily::TavilyClient;
use itinera::search::{SearchClient, SearchDepth};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn tavily_search_happy_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({
            "api_key": "tvly-test",
            "query": "berlin events",
            "search_depth": "advanced",
            "include_images": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "berlin events",
            "results": [
                {
                    "title": "Berlin this week",
                    "content": "Festival of Lights opens Friday.",
                    "url": "https://example.com/berlin",
                    "score": 0.93
                },
                { "content": "Museum night on Saturday." }
            ],
            "response_time": 1.2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::with_base_url("tvly-test", &server.uri());
    let response = client
        .search("berlin events", SearchDepth::Advanced, false)
        .await
        .expect("search should succeed");

    assert_eq!(response.query, "berlin events");
    assert_eq!(response.results.len(), 2);
    assert_eq!(response.results[0].title.as_deref(), Some("Berlin this week"));
    assert_eq!(response.results[0].score, Some(0.93));
    assert!(response.results[1].title.is_none());
    assert!(response.results[1].url.is_none());
}

#[tokio::test]
async fn tavily_search_accepts_trailing_slash_and_missing_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TavilyClient::with_base_url("tvly-test", &format!("{}/", server.uri()));
    let response = client
        .search("kyoto temples", SearchDepth::Basic, false)
        .await
        .expect("search should succeed");

    assert_eq!(response.query, "kyoto temples");
    assert!(response.is_empty());
}

#[tokio::test]
async fn tavily_search_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = TavilyClient::with_base_url("bad-key", &server.uri());
    let err = client
        .search("anything", SearchDepth::Advanced, false)
        .await
        .expect_err("401 must fail");

    match err {
        SearchError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "invalid api key");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn tavily_search_reports_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = TavilyClient::with_base_url("tvly-test", &server.uri());
    let err = client
        .search("anything", SearchDepth::Advanced, false)
        .await
        .expect_err("html is not a search response");

    assert!(matches!(err, SearchError::Decode(_)));
}
