//! Error taxonomy for the Lumenore API client.
//!
//! Every failure the client can surface maps to exactly one of these
//! variants. The tool layer is the only place they are caught and turned
//! into user-visible envelopes; the client itself never swallows them.

use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors produced by the analytics API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The credential-exchange handshake failed.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// No usable token was available at call time.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// A request was rejected before any network activity (unknown
    /// endpoint, malformed schema id or query, bad HTTP method).
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The outbound request hit a client-side timeout.
    #[error("Request to {url} timed out")]
    RequestTimeout { url: String },

    /// Any other HTTP or transport-level failure.
    #[error("API request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Anything else - malformed JSON body, unexpected response shape.
    #[error("Unexpected error from {url}: {message}")]
    Unexpected { url: String, message: String },
}

impl ClientError {
    /// Create an authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an authorization error.
    pub fn authorization(msg: impl Into<String>) -> Self {
        Self::Authorization(msg.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// True for errors raised by parameter or endpoint validation, before
    /// any network call was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
