//! Enrichment client tests against a local mock HTTP server

use httpmock::prelude::*;
use people_api::services::{Enricher, EnrichmentClient, EnrichmentError};
use people_common::config::EnrichmentConfig;
use serde_json::json;
use std::time::Duration;

fn client_for(server: &MockServer, timeout_ms: u64) -> EnrichmentClient {
    let config = EnrichmentConfig {
        age_url: server.url("/age"),
        gender_url: server.url("/gender"),
        nation_url: server.url("/nation"),
        timeout_ms,
    };
    EnrichmentClient::new(&config).expect("Should build client")
}

#[tokio::test]
async fn test_successful_lookups_send_name_query() {
    let server = MockServer::start_async().await;

    let age_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/age").query_param("name", "Alice");
            then.status(200)
                .json_body(json!({"count": 1, "name": "Alice", "age": 30}));
        })
        .await;
    let gender_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/gender").query_param("name", "Alice");
            then.status(200)
                .json_body(json!({"name": "Alice", "gender": "female", "probability": 0.98}));
        })
        .await;
    let nation_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/nation").query_param("name", "Alice");
            then.status(200).json_body(json!({
                "name": "Alice",
                "country": [
                    {"country_id": "US", "probability": 0.4},
                    {"country_id": "GB", "probability": 0.2}
                ]
            }));
        })
        .await;

    let client = client_for(&server, 2000);

    assert_eq!(client.infer_age("Alice").await.unwrap(), 30);
    assert_eq!(client.infer_gender("Alice").await.unwrap(), "female");
    assert_eq!(client.infer_nation("Alice").await.unwrap(), "US");

    age_mock.assert_async().await;
    gender_mock.assert_async().await;
    nation_mock.assert_async().await;
}

#[tokio::test]
async fn test_null_values_decode_as_defaults() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/age");
            then.status(200).json_body(json!({"name": "Zzyx", "age": null}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/gender");
            then.status(200).json_body(json!({"name": "Zzyx", "gender": null}));
        })
        .await;

    let client = client_for(&server, 2000);

    assert_eq!(client.infer_age("Zzyx").await.unwrap(), 0);
    assert_eq!(client.infer_gender("Zzyx").await.unwrap(), "");
}

#[tokio::test]
async fn test_empty_country_list_is_an_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/nation");
            then.status(200).json_body(json!({"name": "Zzyx", "country": []}));
        })
        .await;

    let client = client_for(&server, 2000);
    let err = client.infer_nation("Zzyx").await.unwrap_err();

    assert!(matches!(err, EnrichmentError::NoNationCandidate(ref name) if name == "Zzyx"));
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/gender");
            then.status(429).body("Too Many Requests");
        })
        .await;

    let client = client_for(&server, 2000);
    let err = client.infer_gender("Alice").await.unwrap_err();

    match err {
        EnrichmentError::Status { service, status } => {
            assert_eq!(service, "genderize");
            assert_eq!(status, 429);
        }
        other => panic!("Expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_parse_error() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/age");
            then.status(200)
                .header("content-type", "application/json")
                .body("{\"age\": \"thirty\"");
        })
        .await;

    let client = client_for(&server, 2000);
    let err = client.infer_age("Alice").await.unwrap_err();

    assert!(matches!(err, EnrichmentError::Parse { service: "agify", .. }));
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/age");
            then.status(200)
                .delay(Duration::from_millis(1500))
                .json_body(json!({"age": 30}));
        })
        .await;

    let client = client_for(&server, 100);
    let err = client.infer_age("Alice").await.unwrap_err();

    assert!(matches!(err, EnrichmentError::Network { service: "agify", .. }));
}

#[tokio::test]
async fn test_unreachable_service_is_a_network_error() {
    let config = EnrichmentConfig {
        age_url: "http://127.0.0.1:9/age".to_string(),
        gender_url: "http://127.0.0.1:9/gender".to_string(),
        nation_url: "http://127.0.0.1:9/nation".to_string(),
        timeout_ms: 500,
    };
    let client = EnrichmentClient::new(&config).unwrap();

    let err = client.infer_nation("Alice").await.unwrap_err();
    assert!(matches!(err, EnrichmentError::Network { .. }));
}
