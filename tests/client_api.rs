//! Integration tests for the analytics client against a mock backend.
//!
//! Covers the authentication handshake, token caching, request shapes for
//! both HTTP styles (JSON body vs query parameters), header sanitization,
//! streaming, and error mapping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lumenore_mcp_server::core::client::{AnalyticsClient, ClientError, TimeoutSettings};
use lumenore_mcp_server::core::config::CredentialsConfig;

const LOGIN_PATH: &str = "/api/secure/client/user-login";
const GET_DOMAIN_PATH: &str = "/api/askme-manager/get-domain";
const TREND_PATH: &str = "/api/ai-engine/mcp/get-trend-data";
const NLQ_PATH: &str = "/api/ai-engine/mcp/nlq-to-data";

fn static_token_client(base_url: &str) -> AnalyticsClient {
    AnalyticsClient::new(
        base_url,
        CredentialsConfig {
            api_token: Some("tok".to_string()),
            client_id: None,
            client_secret: None,
        },
        TimeoutSettings::default(),
        None,
    )
    .unwrap()
}

fn exchange_client(base_url: &str) -> AnalyticsClient {
    AnalyticsClient::new(
        base_url,
        CredentialsConfig {
            api_token: None,
            client_id: Some("client-1".to_string()),
            client_secret: Some("s3cret".to_string()),
        },
        TimeoutSettings::default(),
        None,
    )
    .unwrap()
}

async fn mount_login(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_json(json!({
            "data": { "clientId": "client-1", "secret": "s3cret" }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "access_token=issued-token; Path=/")
                .set_body_json(json!({"status": "ok"})),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

// =============================================================================
// Authentication handshake
// =============================================================================

#[tokio::test]
async fn test_credential_exchange_sends_bearer_token() {
    let server = MockServer::start().await;
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .and(header("authorization", "Bearer issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = exchange_client(&server.uri());
    let response = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap();
    assert_eq!(response.as_json(), Some(&json!({"data": []})));
}

#[tokio::test]
async fn test_handshake_runs_once_across_calls() {
    let server = MockServer::start().await;
    // The token is cached after the first call; a second handshake would
    // trip the expectation.
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .and(header("authorization", "Bearer issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(2)
        .mount(&server)
        .await;

    let client = exchange_client(&server.uri());
    for _ in 0..2 {
        client
            .call_endpoint("get-domain", "GET", false, Map::new())
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_handshake() {
    let server = MockServer::start().await;
    // All tasks race on a cold token cache; the lock held across the
    // exchange must collapse them into a single login round-trip.
    mount_login(&server, 1).await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .and(header("authorization", "Bearer issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(8)
        .mount(&server)
        .await;

    let client = Arc::new(exchange_client(&server.uri()));
    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .call_endpoint("get-domain", "GET", false, Map::new())
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_handshake_rejection_surfaces_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "bad credentials"})),
        )
        .mount(&server)
        .await;

    let client = exchange_client(&server.uri());
    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();

    match err {
        ClientError::Authentication(message) => {
            assert!(message.contains("401"), "missing status in: {message}");
            assert!(
                message.contains("bad credentials"),
                "missing body in: {message}"
            );
        }
        other => panic!("expected Authentication error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_backend_is_authentication_error() {
    // Bind a server to reserve a port, then drop it so the connection is
    // refused.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = exchange_client(&uri);
    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Authentication(_)));
}

#[tokio::test]
async fn test_handshake_without_cookie_is_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;

    let client = exchange_client(&server.uri());
    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Authentication(_)));
}

// =============================================================================
// Request shapes
// =============================================================================

#[tokio::test]
async fn test_post_sends_params_as_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TREND_PATH))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({
            "userQuery": "monthly revenue trend",
            "schemaId": 42
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"trend": "up"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    let mut params = Map::new();
    params.insert("userQuery".to_string(), json!("monthly revenue trend"));
    params.insert("schemaId".to_string(), json!(42));

    let response = client
        .call_endpoint("get-trend-data", "POST", false, params)
        .await
        .unwrap();
    assert_eq!(response.as_json(), Some(&json!({"trend": "up"})));
}

#[tokio::test]
async fn test_get_sends_params_as_query_string() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .and(query_param("domainId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    let mut params = Map::new();
    params.insert("domainId".to_string(), json!(7));

    client
        .call_endpoint("get-domain", "GET", false, params)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unsafe_headers_stripped_and_accept_defaulted() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .and(header("accept", "application/json"))
        .and(header("x-request-source", "integration"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let mut overrides = HashMap::new();
    overrides.insert("Host".to_string(), "spoof.test".to_string());
    overrides.insert("Content-Length".to_string(), "9999".to_string());
    overrides.insert("X-Request-Source".to_string(), "integration".to_string());

    let client = AnalyticsClient::new(
        server.uri(),
        CredentialsConfig {
            api_token: Some("tok".to_string()),
            client_id: None,
            client_secret: None,
        },
        TimeoutSettings::default(),
        Some(overrides),
    )
    .unwrap();

    client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_nested_endpoint_path_routes_by_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/askme-manager/metadata/get/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    client
        .call_endpoint("metadata/get/42", "POST", false, Map::new())
        .await
        .unwrap();
}

// =============================================================================
// Streaming
// =============================================================================

#[tokio::test]
async fn test_streamed_response_is_buffered_fully() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(NLQ_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("chunk-one chunk-two"))
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    let mut params = Map::new();
    params.insert("userQuery".to_string(), json!("total sales"));
    params.insert("schemaId".to_string(), json!(1));

    let response = client
        .call_endpoint("nlq-to-data", "POST", true, params)
        .await
        .unwrap();
    assert_eq!(response.into_text(), "chunk-one chunk-two");
}

// =============================================================================
// Error mapping
// =============================================================================

#[tokio::test]
async fn test_server_error_maps_to_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Request { .. }));
}

#[tokio::test]
async fn test_malformed_json_maps_to_unexpected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Unexpected { .. }));
}

#[tokio::test]
async fn test_slow_response_maps_to_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let timeouts = TimeoutSettings {
        request_timeout: 0.2,
        total_timeout: 0.5,
        ..TimeoutSettings::default()
    };
    let client = AnalyticsClient::new(
        server.uri(),
        CredentialsConfig {
            api_token: Some("tok".to_string()),
            client_id: None,
            client_secret: None,
        },
        timeouts,
        None,
    )
    .unwrap();

    let err = client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::RequestTimeout { .. }));
}

#[tokio::test]
async fn test_pool_recreated_after_shutdown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(GET_DOMAIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(2)
        .mount(&server)
        .await;

    let client = static_token_client(&server.uri());
    client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap();

    client.shutdown().await;

    client
        .call_endpoint("get-domain", "GET", false, Map::new())
        .await
        .unwrap();
}
