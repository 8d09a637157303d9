//! API client tests over real HTTP using wiremock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use adaptive_delivery::adapters::ReqwestHttpClient;
use adaptive_delivery::api::{MarketClient, NewsItem, SimulationClient};
use adaptive_delivery::error::{DeliveryError, NetworkError, StreamError};
use adaptive_delivery::progressive::ProgressiveLoader;
use adaptive_delivery::retry::RetryPolicy;
use common::strategy_with_chunk;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Short real-time delays; these tests talk to a socket.
fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10), Duration::from_millis(40))
}

fn market(server: &MockServer) -> MarketClient<ReqwestHttpClient> {
    MarketClient::new(Arc::new(ReqwestHttpClient::new()), server.uri()).with_retry_policy(fast_retry())
}

fn simulation(server: &MockServer) -> SimulationClient<ReqwestHttpClient> {
    SimulationClient::new(Arc::new(ReqwestHttpClient::new()), server.uri())
        .with_retry_policy(fast_retry())
}

fn articles(range: std::ops::Range<usize>) -> serde_json::Value {
    let items: Vec<_> = range
        .map(|i| json!({"id": i.to_string(), "headline": format!("Story {}", i)}))
        .collect();
    json!({ "articles": items })
}

#[tokio::test]
async fn test_search_companies() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/companies/search"))
        .and(query_param("q", "apple inc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"symbol": "AAPL", "name": "Apple Inc.", "exchange": "NASDAQ"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = market(&server).search_companies("apple inc").await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].symbol, "AAPL");
    assert_eq!(results[0].exchange.as_deref(), Some("NASDAQ"));
}

#[tokio::test]
async fn test_server_error_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/companies/search"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/companies/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let results = market(&server).search_companies("msft").await.unwrap();
    assert!(results.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/companies/search"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let err = market(&server).search_companies("zzzz").await.unwrap_err();
    assert!(matches!(
        err.inner(),
        DeliveryError::Network(NetworkError::HttpStatus { status: 404, .. })
    ));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/companies/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
        .mount(&server)
        .await;

    let err = MarketClient::new(Arc::new(ReqwestHttpClient::new()), server.uri())
        .with_retry_policy(RetryPolicy::no_retry())
        .search_companies("tsla")
        .await
        .unwrap_err();

    assert_eq!(
        err.inner(),
        &DeliveryError::Network(NetworkError::RateLimited {
            retry_after_secs: Some(7)
        })
    );
}

#[tokio::test]
async fn test_market_news_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/market-news"))
        .and(query_param("category", "general"))
        .respond_with(ResponseTemplate::new(200).set_body_json(articles(0..3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = market(&server);
    let first = client.market_news("general").await.unwrap();
    let second = client.market_news(" GENERAL ").await.unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_news_pages_load_progressively() {
    let server = MockServer::start().await;

    for (offset, range) in [(0, 0..10), (10, 10..20), (20, 20..24)] {
        Mock::given(method("GET"))
            .and(path("/api/market-news"))
            .and(query_param("category", "earnings"))
            .and(query_param("offset", offset.to_string()))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(articles(range)))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = market(&server);
    let loader = ProgressiveLoader::new(fast_retry());

    let mut partials = Vec::new();
    let items: Vec<NewsItem> = loader
        .run(
            &client.news_pages("earnings"),
            None,
            &strategy_with_chunk(10),
            |items| partials.push(items.len()),
        )
        .await
        .unwrap();

    assert_eq!(partials, vec![10, 20, 24]);
    assert_eq!(items[0].headline, "Story 0");
    assert_eq!(items[23].headline, "Story 23");
}

#[tokio::test]
async fn test_document_progress_stream() {
    let server = MockServer::start().await;

    let body = concat!(
        "event: progress\ndata: {\"percent\": 25, \"stage\": \"parsing\"}\n\n",
        "event: ping\n\n",
        "event: progress\ndata: {\"percent\": 75}\n\n",
        "event: complete\ndata: {\"document_id\": \"doc-9\", \"url\": \"/docs/9\"}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/simulation/documents/doc-9/progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let mut progress = Vec::new();
    let done = simulation(&server)
        .wait_for_document("doc-9", |percent, _| progress.push(percent))
        .await
        .unwrap();

    assert_eq!(progress, vec![25.0, 75.0]);
    assert_eq!(done.document_id, "doc-9");
    assert_eq!(done.url.as_deref(), Some("/docs/9"));
}

#[tokio::test]
async fn test_document_progress_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/simulation/documents/doc-3/progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string("event: error\ndata: {\"message\": \"out of memory\"}\n\n"),
        )
        .mount(&server)
        .await;

    let err = simulation(&server)
        .wait_for_document("doc-3", |_, _| {})
        .await
        .unwrap_err();

    assert_eq!(
        err,
        DeliveryError::Stream(StreamError::BackendError {
            message: "out of memory".to_string()
        })
    );
}

#[tokio::test]
async fn test_load_document_metadata() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/simulation/documents/doc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "doc-1",
            "title": "Monte Carlo run",
            "status": "ready"
        })))
        .mount(&server)
        .await;

    let doc = simulation(&server).load_document("doc-1").await.unwrap();
    assert!(doc.is_ready());
    assert_eq!(doc.title.as_deref(), Some("Monte Carlo run"));
}

#[tokio::test]
async fn test_request_timeout_spares_progress_stream() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/simulation/documents/doc-7/progress"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/event-stream")
                .set_body_string("event: complete\ndata: {\"document_id\": \"doc-7\"}\n\n")
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/simulation/documents/doc-7"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": "doc-7", "status": "ready"}))
                .set_delay(Duration::from_millis(400)),
        )
        .mount(&server)
        .await;

    let client = SimulationClient::new(
        Arc::new(ReqwestHttpClient::with_timeout(Duration::from_millis(100))),
        server.uri(),
    )
    .with_retry_policy(RetryPolicy::no_retry());

    let done = client.wait_for_document("doc-7", |_, _| {}).await.unwrap();
    assert_eq!(done.document_id, "doc-7");

    let err = client.load_document("doc-7").await.unwrap_err();
    assert!(matches!(
        err.inner(),
        DeliveryError::Network(NetworkError::Timeout { .. })
    ));
}
