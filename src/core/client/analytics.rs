//! The Lumenore analytics API client.
//!
//! Central entry point for every backend call. Owns the shared connection
//! pool, the sanitized header overrides, and the authentication lifecycle.
//! All tools funnel through [`AnalyticsClient::call_endpoint`].
//!
//! Shared-state rules:
//! - The access token is acquired at most once per process. The async mutex
//!   is held across the credential exchange, so concurrent first calls wait
//!   on a single in-flight handshake instead of each authenticating.
//! - The `reqwest::Client` pool is created lazily, reused for every call,
//!   and recreated if a call arrives after `shutdown`.

use futures::StreamExt;
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::auth::AuthClient;
use super::endpoints;
use super::error::{ClientError, ClientResult};
use super::headers::sanitized_headers;
use super::timeouts::TimeoutSettings;
use crate::core::config::CredentialsConfig;

/// Maximum accepted query length after trimming.
const MAX_QUERY_LEN: usize = 5000;

/// A backend response: parsed JSON for regular calls, accumulated text for
/// streamed calls.
///
/// Streaming reads the body incrementally but buffers it fully before
/// returning; callers never see partial chunks.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Json(Value),
    Text(String),
}

impl ApiResponse {
    /// Render the response as a string for the MCP text envelope.
    pub fn into_text(self) -> String {
        match self {
            ApiResponse::Json(value) => value.to_string(),
            ApiResponse::Text(text) => text,
        }
    }

    /// Borrow the JSON value, if this was a JSON response.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            ApiResponse::Text(_) => None,
        }
    }
}

/// Analytics API client.
pub struct AnalyticsClient {
    headers: HashMap<String, String>,
    base_url: String,
    credentials: CredentialsConfig,
    timeouts: TimeoutSettings,
    http: Mutex<Option<reqwest::Client>>,
    token: Mutex<Option<String>>,
}

impl AnalyticsClient {
    /// Create a client for `base_url` with optional header overrides.
    pub fn new(
        base_url: impl Into<String>,
        credentials: CredentialsConfig,
        timeouts: TimeoutSettings,
        headers: Option<HashMap<String, String>>,
    ) -> ClientResult<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(ClientError::validation("SERVER_URL is not configured"));
        }

        Ok(Self {
            headers: headers.unwrap_or_default(),
            base_url,
            credentials,
            timeouts,
            http: Mutex::new(None),
            token: Mutex::new(None),
        })
    }

    /// Server base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sanitized copy of the configured header overrides.
    pub fn sanitized_headers(&self) -> HashMap<String, String> {
        sanitized_headers(&self.headers)
    }

    /// All supported endpoints grouped by service name.
    pub fn supported_endpoints(&self) -> HashMap<&'static str, Vec<&'static str>> {
        endpoints::supported_endpoints()
    }

    /// Whether `endpoint_name` is a registered endpoint.
    pub fn is_endpoint_supported(&self, endpoint_name: &str) -> bool {
        endpoints::is_endpoint_supported(endpoint_name)
    }

    /// Validate the common schema id / query parameter pair.
    pub fn validate_request(&self, schema_id: i64, query: &str) -> ClientResult<()> {
        if schema_id <= 0 {
            return Err(ClientError::validation(
                "Schema ID must be a positive integer",
            ));
        }

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(ClientError::validation("Query cannot be empty"));
        }
        if trimmed.chars().count() > MAX_QUERY_LEN {
            return Err(ClientError::validation(
                "Query too long (max 5000 characters)",
            ));
        }

        Ok(())
    }

    /// Call a named endpoint with dynamic parameters.
    ///
    /// For `POST`/`PUT`/`PATCH` the parameters become the JSON body; for all
    /// other methods they become URL query parameters. Exactly one of the
    /// two is populated per call.
    pub async fn call_endpoint(
        &self,
        endpoint_name: &str,
        method: &str,
        stream: bool,
        params: Map<String, Value>,
    ) -> ClientResult<ApiResponse> {
        if params.contains_key("schemaId") && params.contains_key("userQuery") {
            let schema_id = params["schemaId"].as_i64().ok_or_else(|| {
                ClientError::validation("Schema ID must be a positive integer")
            })?;
            let query = params["userQuery"].as_str().ok_or_else(|| {
                ClientError::validation("Query must be a string")
            })?;
            self.validate_request(schema_id, query)?;
        }

        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| ClientError::validation(format!("Invalid HTTP method: {method}")))?;

        let (payload, query_params) = if matches!(method, Method::POST | Method::PUT | Method::PATCH)
        {
            let payload = (!params.is_empty()).then_some(params);
            (payload, None)
        } else {
            let pairs: Vec<(String, String)> = params
                .into_iter()
                .map(|(k, v)| (k, query_value(&v)))
                .collect();
            (None, (!pairs.is_empty()).then_some(pairs))
        };

        self.make_request(endpoint_name, method, payload, query_params, stream)
            .await
    }

    /// Low-level request path shared by every call.
    async fn make_request(
        &self,
        endpoint_name: &str,
        method: Method,
        payload: Option<Map<String, Value>>,
        query_params: Option<Vec<(String, String)>>,
        stream: bool,
    ) -> ClientResult<ApiResponse> {
        // Endpoint routing is pure validation; fail it before any network
        // activity, including the authentication handshake.
        let url = endpoints::build_url(&self.base_url, endpoint_name)?;

        let token = self.ensure_authorized().await?;

        let mut headers = self.sanitized_headers();
        headers.retain(|name, _| !name.eq_ignore_ascii_case("authorization"));
        headers.insert("Authorization".to_string(), token);

        let client = self.http_client().await?;

        let mut request = client.request(method.clone(), &url);
        request = request.headers(to_header_map(&headers));
        if let Some(pairs) = &query_params {
            request = request.query(pairs);
        }
        if let Some(body) = &payload {
            request = request.json(body);
        }

        info!("API call {method} {url}");

        let response = request.send().await.map_err(|e| self.transport_error(&url, e))?;

        if stream {
            let mut body = String::new();
            let mut chunks = response.bytes_stream();
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk.map_err(|e| self.transport_error(&url, e))?;
                body.push_str(&String::from_utf8_lossy(&chunk));
            }
            return Ok(ApiResponse::Text(body));
        }

        let response = response.error_for_status().map_err(|e| ClientError::Request {
            url: url.clone(),
            message: e.to_string(),
        })?;

        let value: Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::RequestTimeout { url: url.clone() }
            } else {
                ClientError::Unexpected {
                    url: url.clone(),
                    message: e.to_string(),
                }
            }
        })?;

        debug!("{url} responded");
        Ok(ApiResponse::Json(value))
    }

    /// Resolve a usable bearer token, authenticating at most once.
    ///
    /// A configured static token always wins and never touches the network.
    /// The lock is held across the credential exchange so concurrent callers
    /// share one in-flight handshake.
    async fn ensure_authorized(&self) -> ClientResult<String> {
        let mut token = self.token.lock().await;

        if let Some(cached) = token.as_ref() {
            return Ok(cached.clone());
        }

        if let Some(static_token) = self.credentials.static_token() {
            let formatted = if static_token.starts_with("Bearer ") {
                static_token.to_string()
            } else {
                format!("Bearer {static_token}")
            };
            *token = Some(formatted.clone());
            return Ok(formatted);
        }

        if let Some((client_id, secret)) = self.credentials.client_credentials() {
            let auth = AuthClient::new(client_id, secret, &self.base_url)?;
            let fresh = auth.authenticate().await?;
            info!("Cookie-based authentication initialized");
            *token = Some(fresh.clone());
            return Ok(fresh);
        }

        Err(ClientError::authorization(
            "No valid authorization found. Please provide LUMENORE_API_KEY \
             or both LUMENORE_CLIENT_ID and LUMENORE_SECRET",
        ))
    }

    /// Get or lazily create the pooled HTTP client.
    async fn http_client(&self) -> ClientResult<reqwest::Client> {
        let mut pool = self.http.lock().await;

        if let Some(client) = pool.as_ref() {
            return Ok(client.clone());
        }

        let client = reqwest::Client::builder()
            .connect_timeout(self.timeouts.connect_timeout())
            .read_timeout(self.timeouts.request_timeout())
            .timeout(self.timeouts.total_timeout())
            .pool_max_idle_per_host(self.timeouts.pool_connections)
            .pool_idle_timeout(self.timeouts.keep_alive_timeout())
            .build()
            .map_err(|e| ClientError::Unexpected {
                url: self.base_url.clone(),
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        *pool = Some(client.clone());
        Ok(client)
    }

    /// Release the connection pool. In-flight calls fail best-effort; a
    /// later call recreates the pool.
    pub async fn shutdown(&self) {
        info!("Closing HTTP client pool");
        *self.http.lock().await = None;
    }

    fn transport_error(&self, url: &str, error: reqwest::Error) -> ClientError {
        if error.is_timeout() {
            ClientError::RequestTimeout {
                url: url.to_string(),
            }
        } else {
            ClientError::Request {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Render a JSON value as a query-string value.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Convert the sanitized string map into a reqwest header map, skipping
/// names or values that are not legal HTTP headers.
fn to_header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => warn!("Skipping invalid header override: {name}"),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_token() -> AnalyticsClient {
        AnalyticsClient::new(
            "https://x.test",
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

    #[test]
    fn test_empty_base_url_rejected() {
        let result = AnalyticsClient::new(
            "  ",
            CredentialsConfig::default(),
            TimeoutSettings::default(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_request_schema_id_bounds() {
        let client = client_with_token();
        assert!(client.validate_request(0, "q").is_err());
        assert!(client.validate_request(-5, "q").is_err());
        assert!(client.validate_request(1, "q").is_ok());
    }

    #[test]
    fn test_validate_request_query_bounds() {
        let client = client_with_token();
        assert!(client.validate_request(1, "").is_err());
        assert!(client.validate_request(1, "   \t ").is_err());
        assert!(client.validate_request(1, &"a".repeat(5000)).is_ok());
        assert!(client.validate_request(1, &"a".repeat(5001)).is_err());
    }

    #[test]
    fn test_validate_request_trims_before_length_check() {
        let client = client_with_token();
        let padded = format!("  {}  ", "a".repeat(5000));
        assert!(client.validate_request(1, &padded).is_ok());
    }

    #[tokio::test]
    async fn test_static_token_never_authenticates() {
        // A routable handshake would need a network; a static token must
        // resolve without one.
        let client = client_with_token();
        let token = client.ensure_authorized().await.unwrap();
        assert_eq!(token, "Bearer tok");
    }

    #[tokio::test]
    async fn test_static_token_bearer_prefix_not_doubled() {
        let client = AnalyticsClient::new(
            "https://x.test",
            CredentialsConfig {
                api_token: Some("Bearer abc".to_string()),
                client_id: None,
                client_secret: None,
            },
            TimeoutSettings::default(),
            None,
        )
        .unwrap();
        assert_eq!(client.ensure_authorized().await.unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn test_no_credentials_is_authorization_error() {
        let client = AnalyticsClient::new(
            "https://x.test",
            CredentialsConfig::default(),
            TimeoutSettings::default(),
            None,
        )
        .unwrap();
        let err = client.ensure_authorized().await.unwrap_err();
        assert!(matches!(err, ClientError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_unknown_endpoint_fails_before_network() {
        // No credentials configured: if routing did not fail first, this
        // would surface an authorization error instead.
        let client = AnalyticsClient::new(
            "https://x.test",
            CredentialsConfig::default(),
            TimeoutSettings::default(),
            None,
        )
        .unwrap();
        let err = client
            .call_endpoint("bogus-endpoint", "POST", false, Map::new())
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_invalid_schema_id_fails_before_network() {
        let client = client_with_token();
        let mut params = Map::new();
        params.insert("schemaId".to_string(), serde_json::json!(0));
        params.insert("userQuery".to_string(), serde_json::json!("q"));
        let err = client
            .call_endpoint("get-trend-data", "POST", false, params)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_non_integer_schema_id_rejected() {
        let client = client_with_token();
        let mut params = Map::new();
        params.insert("schemaId".to_string(), serde_json::json!(1.5));
        params.insert("userQuery".to_string(), serde_json::json!("q"));
        let err = client
            .call_endpoint("get-trend-data", "POST", false, params)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_query_value_rendering() {
        assert_eq!(query_value(&serde_json::json!("text")), "text");
        assert_eq!(query_value(&serde_json::json!(42)), "42");
        assert_eq!(query_value(&serde_json::json!(true)), "true");
    }

    #[test]
    fn test_api_response_into_text() {
        assert_eq!(
            ApiResponse::Json(serde_json::json!({"a": 1})).into_text(),
            "{\"a\":1}"
        );
        assert_eq!(ApiResponse::Text("raw".to_string()).into_text(), "raw");
    }
}
