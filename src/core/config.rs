//! Configuration management for the MCP server.
//!
//! Configuration is read once at startup from environment variables (with
//! `.env` support via dotenvy) and is immutable afterwards. Credential
//! validation happens here: a process without a usable credential source
//! must fail before serving any request.

use super::client::TimeoutSettings;
use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default backend when SERVER_URL is not set.
const DEFAULT_SERVER_URL: &str = "https://preview.lumenore.com";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Backend API connection settings.
    pub api: ApiConfig,

    /// Backend API credentials.
    pub credentials: CredentialsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// HTTP timeout and pool tuning.
    pub timeouts: TimeoutSettings,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Backend API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the Lumenore backend.
    pub base_url: String,

    /// Debug flag (raises the default log level).
    pub debug: bool,
}

/// Credentials for the backend API.
///
/// Either a static API token or a client id/secret pair must be present;
/// the static token takes precedence and skips the login handshake.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// Static bearer token, used directly when configured.
    pub api_token: Option<String>,

    /// Client id for credential-exchange authentication.
    pub client_id: Option<String>,

    /// Client secret for credential-exchange authentication.
    pub client_secret: Option<String>,
}

impl CredentialsConfig {
    /// The static token, if configured and non-empty.
    pub fn static_token(&self) -> Option<&str> {
        self.api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    /// The client id/secret pair, if both are configured and non-empty.
    pub fn client_credentials(&self) -> Option<(&str, &str)> {
        let id = self.client_id.as_deref().map(str::trim)?;
        let secret = self.client_secret.as_deref().map(str::trim)?;
        (!id.is_empty() && !secret.is_empty()).then_some((id, secret))
    }

    /// Whether any usable credential source is configured.
    pub fn is_usable(&self) -> bool {
        self.static_token().is_some() || self.client_credentials().is_some()
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "Lumenore-Analytics-MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            api: ApiConfig {
                base_url: DEFAULT_SERVER_URL.to_string(),
                debug: false,
            },
            credentials: CredentialsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            timeouts: TimeoutSettings::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails fast when the credential invariant does not hold or a numeric
    /// tuning variable is malformed - no partial startup.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(url) = std::env::var("SERVER_URL") {
            if url.trim().is_empty() {
                return Err(Error::config("SERVER_URL must not be empty"));
            }
            config.api.base_url = url;
        }

        config.api.debug = std::env::var("DEBUG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        config.credentials = CredentialsConfig {
            api_token: std::env::var("LUMENORE_API_KEY").ok(),
            client_id: std::env::var("LUMENORE_CLIENT_ID").ok(),
            client_secret: std::env::var("LUMENORE_SECRET").ok(),
        };

        if !config.credentials.is_usable() {
            return Err(Error::config(
                "Either LUMENORE_API_KEY or both LUMENORE_CLIENT_ID and \
                 LUMENORE_SECRET must be provided",
            ));
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        } else if config.api.debug {
            config.logging.level = "debug".to_string();
        }

        config.transport = TransportConfig::from_env();
        config.timeouts = TimeoutSettings::from_env().map_err(Error::config)?;

        info!("Configuration loaded for {}", config.api.base_url);

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    fn clear_credential_vars() {
        unsafe {
            std::env::remove_var("LUMENORE_API_KEY");
            std::env::remove_var("LUMENORE_CLIENT_ID");
            std::env::remove_var("LUMENORE_SECRET");
        }
    }

    #[test]
    fn test_missing_credentials_fail_fast() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_credential_vars();
        assert!(Config::from_env().is_err());
    }

    #[test]
    fn test_static_token_satisfies_invariant() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            std::env::set_var("LUMENORE_API_KEY", "tok");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.credentials.static_token(), Some("tok"));
        clear_credential_vars();
    }

    #[test]
    fn test_client_credentials_satisfy_invariant() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            std::env::set_var("LUMENORE_CLIENT_ID", "id");
            std::env::set_var("LUMENORE_SECRET", "secret");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(
            config.credentials.client_credentials(),
            Some(("id", "secret"))
        );
        clear_credential_vars();
    }

    #[test]
    fn test_whitespace_credentials_are_unusable() {
        let creds = CredentialsConfig {
            api_token: Some("   ".to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("".to_string()),
        };
        assert!(!creds.is_usable());
    }

    #[test]
    fn test_empty_server_url_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            std::env::set_var("LUMENORE_API_KEY", "tok");
            std::env::set_var("SERVER_URL", "  ");
        }
        assert!(Config::from_env().is_err());
        unsafe {
            std::env::remove_var("SERVER_URL");
        }
        clear_credential_vars();
    }

    #[test]
    fn test_secrets_redacted_in_debug() {
        let creds = CredentialsConfig {
            api_token: Some("super_secret_token".to_string()),
            client_id: Some("client".to_string()),
            client_secret: Some("super_secret_value".to_string()),
        };
        let debug_str = format!("{creds:?}");
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_token"));
        assert!(!debug_str.contains("super_secret_value"));
    }
}
