//! Timeout and connection-pool tuning knobs.
//!
//! Every value is read from an environment variable with a documented
//! default. A variable that is present but malformed is a configuration
//! error and aborts startup; absence always falls back to the default.
//!
//! The retry knobs are part of the configuration surface but are not
//! consulted by the request path - the client performs no retries.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

const DEFAULT_REQUEST_TIMEOUT: f64 = 60.0;
const DEFAULT_CONNECT_TIMEOUT: f64 = 10.0;
const DEFAULT_TOTAL_TIMEOUT: f64 = 300.0;
const DEFAULT_RETRY_ATTEMPTS: u32 = 1;
const DEFAULT_RETRY_DELAY: f64 = 1.0;
const DEFAULT_POOL_CONNECTIONS: usize = 10;
const DEFAULT_POOL_MAXSIZE: usize = 20;
const DEFAULT_POOL_TIMEOUT: f64 = 30.0;
const DEFAULT_SERVER_TIMEOUT: u64 = 300;
const DEFAULT_KEEP_ALIVE_TIMEOUT: u64 = 60;

/// Resolved timeout and pool settings for the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutSettings {
    /// Per-read (socket) timeout in seconds.
    pub request_timeout: f64,
    /// Connection-establishment timeout in seconds.
    pub connect_timeout: f64,
    /// Whole-request deadline in seconds.
    pub total_timeout: f64,
    /// Retry attempts (resolved but unused by the request path).
    pub retry_attempts: u32,
    /// Delay between retries in seconds (resolved but unused).
    pub retry_delay: f64,
    /// Maximum idle connections kept per host.
    pub pool_connections: usize,
    /// Upper bound on pooled connections.
    pub pool_maxsize: usize,
    /// Pool checkout timeout in seconds.
    pub pool_timeout: f64,
    /// Server-side request timeout in seconds.
    pub server_timeout: u64,
    /// Idle keep-alive window in seconds.
    pub keep_alive_timeout: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            total_timeout: DEFAULT_TOTAL_TIMEOUT,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            pool_connections: DEFAULT_POOL_CONNECTIONS,
            pool_maxsize: DEFAULT_POOL_MAXSIZE,
            pool_timeout: DEFAULT_POOL_TIMEOUT,
            server_timeout: DEFAULT_SERVER_TIMEOUT,
            keep_alive_timeout: DEFAULT_KEEP_ALIVE_TIMEOUT,
        }
    }
}

impl TimeoutSettings {
    /// Load settings from environment variables, falling back to defaults.
    ///
    /// Returns an error message naming the offending variable when a value
    /// is present but does not parse.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            request_timeout: parse_env("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT)?,
            connect_timeout: parse_env("CONNECT_TIMEOUT", DEFAULT_CONNECT_TIMEOUT)?,
            total_timeout: parse_env("TOTAL_TIMEOUT", DEFAULT_TOTAL_TIMEOUT)?,
            retry_attempts: parse_env("RETRY_ATTEMPTS", DEFAULT_RETRY_ATTEMPTS)?,
            retry_delay: parse_env("RETRY_DELAY", DEFAULT_RETRY_DELAY)?,
            pool_connections: parse_env("POOL_CONNECTIONS", DEFAULT_POOL_CONNECTIONS)?,
            pool_maxsize: parse_env("POOL_MAXSIZE", DEFAULT_POOL_MAXSIZE)?,
            pool_timeout: parse_env("POOL_TIMEOUT", DEFAULT_POOL_TIMEOUT)?,
            server_timeout: parse_env("SERVER_TIMEOUT", DEFAULT_SERVER_TIMEOUT)?,
            keep_alive_timeout: parse_env("KEEP_ALIVE_TIMEOUT", DEFAULT_KEEP_ALIVE_TIMEOUT)?,
        })
    }

    /// Socket read timeout as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.request_timeout)
    }

    /// Connect timeout as a `Duration`.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.connect_timeout)
    }

    /// Total request deadline as a `Duration`.
    pub fn total_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.total_timeout)
    }

    /// Idle keep-alive window as a `Duration`.
    pub fn keep_alive_timeout(&self) -> Duration {
        Duration::from_secs(self.keep_alive_timeout)
    }

    /// Log the resolved configuration at startup.
    pub fn log_settings(&self) {
        info!("Timeout configuration:");
        info!("  request_timeout: {}s", self.request_timeout);
        info!("  connect_timeout: {}s", self.connect_timeout);
        info!("  total_timeout: {}s", self.total_timeout);
        info!("  retry_attempts: {} (unused)", self.retry_attempts);
        info!("  retry_delay: {}s (unused)", self.retry_delay);
        info!("  pool_connections: {}", self.pool_connections);
        info!("  pool_maxsize: {}", self.pool_maxsize);
        info!("  pool_timeout: {}s", self.pool_timeout);
        info!("  server_timeout: {}s", self.server_timeout);
        info!("  keep_alive_timeout: {}s", self.keep_alive_timeout);
    }
}

/// Read and parse an environment variable, erroring only when a value is
/// present but malformed.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| format!("Invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults_when_unset() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("REQUEST_TIMEOUT");
            std::env::remove_var("POOL_MAXSIZE");
        }
        let settings = TimeoutSettings::from_env().unwrap();
        assert_eq!(settings.request_timeout, 60.0);
        assert_eq!(settings.pool_maxsize, 20);
        assert_eq!(settings.keep_alive_timeout, 60);
    }

    #[test]
    fn test_env_override() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("CONNECT_TIMEOUT", "2.5");
        }
        let settings = TimeoutSettings::from_env().unwrap();
        assert_eq!(settings.connect_timeout, 2.5);
        unsafe {
            std::env::remove_var("CONNECT_TIMEOUT");
        }
    }

    #[test]
    fn test_malformed_value_is_error() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("RETRY_ATTEMPTS", "lots");
        }
        let err = TimeoutSettings::from_env().unwrap_err();
        assert!(err.contains("RETRY_ATTEMPTS"));
        unsafe {
            std::env::remove_var("RETRY_ATTEMPTS");
        }
    }

    #[test]
    fn test_durations() {
        let settings = TimeoutSettings::default();
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.total_timeout(), Duration::from_secs(300));
    }
}
