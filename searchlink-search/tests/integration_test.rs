//! Integration tests for searchlink-search

use chrono::{TimeZone, Utc};
use searchlink_search::*;
use searchlink_signer::Credential;
use serde_json::json;
use std::num::NonZeroU32;
use std::sync::Arc;
use url::Url;
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_at(endpoint: &str) -> SearchClient {
    let credential = Arc::new(Credential::new("AKIDEXAMPLE", "secret", "eu-west-1", "es"));
    SearchClient::new(Url::parse(endpoint).unwrap(), credential)
        .unwrap()
        .with_clock(Arc::new(|| Utc.with_ymd_and_hms(2019, 1, 14, 12, 0, 0).unwrap()))
}

fn client_for(server: &MockServer) -> SearchClient {
    client_at(&server.uri())
}

fn habitats() -> SearchQuery {
    SearchQuery::build(0, NonZeroU32::new(10).unwrap(), "datahub", "habitats")
}

#[tokio::test]
async fn test_search_returns_raw_body() {
    let server = MockServer::start().await;
    let response = json!({ "hits": { "total": 1, "hits": [ { "_id": "123456789" } ] } });

    Mock::given(method("POST"))
        .and(path("/test/_search"))
        .and(header("content-type", "application/json"))
        .and(header("x-amz-date", "20190114T120000Z"))
        .and(header_exists("x-amz-content-sha256"))
        .and(header_exists("authorization"))
        .and(body_json(habitats().to_json().unwrap()))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let body = client_for(&server).search("test", &habitats()).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed, response);
}

#[tokio::test]
async fn test_authorization_header_matches_signed_request() {
    let server = MockServer::start().await;
    let client = client_for(&server);
    let expected = client.signed_request("test", &habitats()).unwrap();

    Mock::given(method("POST"))
        .and(path("/test/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let body = client.search("test", &habitats()).await.unwrap();
    assert_eq!(&body[..], b"{}");

    // the authorization value contains commas, so compare the raw header
    let received = server.received_requests().await.unwrap();
    let sent = received[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert_eq!(sent, expected.header("authorization").unwrap());
}

#[tokio::test]
async fn test_forbidden_maps_to_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            r#"{"message":"The request signature we calculated does not match"}"#,
        ))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search("test", &habitats())
        .await
        .unwrap_err();

    match err {
        SearchError::Auth { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("signature"));
        }
        other => panic!("expected auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_maps_to_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search("test", &habitats())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(503));
    assert!(err.is_retryable());
    assert!(matches!(err, SearchError::Http { ref body, .. } if body == "unavailable"));
}

#[tokio::test]
async fn test_not_found_is_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such index"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .search("missing", &habitats())
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(404));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_connection_failure_maps_to_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = client_at(&format!("http://127.0.0.1:{}", port));

    let err = client.search("test", &habitats()).await.unwrap_err();
    assert!(matches!(err, SearchError::Transport(_)));
}
