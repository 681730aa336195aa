//! Credential-exchange authentication against the Lumenore login endpoint.
//!
//! Trades a client id/secret pair for a session cookie named `access_token`
//! and returns it formatted as a bearer credential. The caller owns token
//! caching; this client performs exactly one handshake per call.

use reqwest::StatusCode;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use super::error::{ClientError, ClientResult};

/// Path of the login endpoint under the server base URL.
const LOGIN_PATH: &str = "api/secure/client/user-login";

/// Name of the session cookie carrying the access token.
const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Timeout for the login round-trip.
const LOGIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Cookie-based authentication client.
pub struct AuthClient {
    client_id: String,
    secret: String,
    base_url: String,
    http: reqwest::Client,
}

impl AuthClient {
    /// Create a new authentication client.
    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(LOGIN_TIMEOUT)
            .user_agent(concat!("lumenore-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::authentication(format!("Failed to build HTTP client: {e}")))?;

        let base_url = base_url.into();
        info!("Initialized AuthClient for {base_url}");

        Ok(Self {
            client_id: client_id.into(),
            secret: secret.into(),
            base_url,
            http,
        })
    }

    /// Perform the credential exchange and return a `Bearer`-prefixed token.
    pub async fn authenticate(&self) -> ClientResult<String> {
        let url = format!(
            "{}/{LOGIN_PATH}",
            self.base_url.trim_end_matches('/')
        );
        let payload = json!({
            "data": { "clientId": self.client_id, "secret": self.secret }
        });

        debug!("Authenticating to {url}");

        let response = self
            .http
            .post(&url)
            .json(&payload)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                ClientError::authentication(format!("Network error during authentication: {e}"))
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let mut message = format!("Authentication failed with status {status}");
            match response.text().await {
                Ok(body) => {
                    // Prefer the parsed JSON body when the server returned one.
                    match serde_json::from_str::<serde_json::Value>(&body) {
                        Ok(parsed) => message.push_str(&format!(": {parsed}")),
                        Err(_) => message.push_str(&format!(": {body}")),
                    }
                }
                Err(e) => message.push_str(&format!(" (unreadable body: {e})")),
            }
            return Err(ClientError::Authentication(message));
        }

        let token = response
            .cookies()
            .find(|c| c.name() == ACCESS_TOKEN_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or_else(|| {
                ClientError::authentication("No access_token in response cookies")
            })?;

        info!("Authentication successful");
        Ok(format!("Bearer {token}"))
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("client_id", &self.client_id)
            .field("secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_redacted_in_debug() {
        let auth = AuthClient::new("client", "super_secret", "https://x.test").unwrap();
        let debug_str = format!("{auth:?}");
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret"));
    }
}
