//! Tests for engine module

use super::*;
use crate::error::Error;
use crate::http::{FixedDelay, HttpClientConfig, Unlimited};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    let config = HttpClientConfig::builder()
        .recharge_auth("test-token", "2021-11")
        .build();
    HttpClient::with_config(config).unwrap()
}

fn fetcher() -> PageFetcher {
    PageFetcher::with_pacer(client(), Arc::new(Unlimited))
}

// ============================================================================
// FetchStats Tests
// ============================================================================

#[test]
fn test_fetch_stats_counters() {
    let mut stats = FetchStats::new();
    stats.add_page();
    stats.add_page();
    stats.add_records(250);
    stats.add_records(3);
    stats.set_duration(42);

    assert_eq!(
        stats,
        FetchStats {
            pages: 2,
            records: 253,
            elapsed_ms: 42,
        }
    );
}

// ============================================================================
// PageFetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_single_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(header("X-Recharge-Access-Token", "test-token"))
        .and(header("X-Recharge-Version", "2021-11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_cursor": null,
            "subscriptions": [{"id": 1}, {"id": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/subscriptions", server.uri());
    let output = fetcher()
        .fetch_all(&format!("{base}?limit=250"), Resource::Subscriptions, &base)
        .await
        .unwrap();

    assert_eq!(output.records, vec![json!({"id": 1}), json!({"id": 2})]);
    assert_eq!(output.stats.pages, 1);
    assert_eq!(output.stats.records, 2);
}

#[tokio::test]
async fn test_fetch_follows_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("status", "active"))
        .and(query_param_is_missing("page_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_cursor": "abc",
            "subscriptions": [{"id": 1}, {"id": 2}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("limit", "250"))
        .and(query_param("page_info", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "previous_cursor": "abc",
            "subscriptions": [{"id": 3}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/subscriptions", server.uri());
    let output = fetcher()
        .fetch_all(
            &format!("{base}?limit=250&status=active"),
            Resource::Subscriptions,
            &base,
        )
        .await
        .unwrap();

    assert_eq!(output.len(), 3);
    assert_eq!(output.records[2], json!({"id": 3}));
    assert_eq!(output.stats.pages, 2);
}

#[tokio::test]
async fn test_fetch_missing_record_key_is_empty_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"next_cursor": null})))
        .mount(&server)
        .await;

    let base = format!("{}/orders", server.uri());
    let output = fetcher()
        .fetch_all(&format!("{base}?limit=250"), Resource::Orders, &base)
        .await
        .unwrap();

    assert!(output.is_empty());
    assert_eq!(output.stats.pages, 1);
}

#[tokio::test]
async fn test_fetch_malformed_second_page_aborts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param_is_missing("page_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_cursor": "p2",
            "orders": [{"id": 1}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .and(query_param("page_info", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let base = format!("{}/orders", server.uri());
    let result = fetcher()
        .fetch_all(&format!("{base}?limit=250"), Resource::Orders, &base)
        .await;

    assert!(matches!(result, Err(Error::Decode { .. })));
}

#[tokio::test]
async fn test_fetch_status_error_aborts() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/orders", server.uri());
    let err = fetcher()
        .fetch_all(&base, Resource::Orders, &base)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
}

#[tokio::test]
async fn test_fetch_paces_between_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param_is_missing("page_info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "next_cursor": "abc",
            "subscriptions": []
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(query_param("page_info", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscriptions": []
        })))
        .mount(&server)
        .await;

    let fetcher = PageFetcher::with_pacer(
        client(),
        Arc::new(FixedDelay::new(Duration::from_millis(100))),
    );
    let base = format!("{}/subscriptions", server.uri());

    let start = std::time::Instant::now();
    let output = fetcher
        .fetch_all(&base, Resource::Subscriptions, &base)
        .await
        .unwrap();

    assert_eq!(output.stats.pages, 2);
    assert!(start.elapsed() >= Duration::from_millis(100));
}
