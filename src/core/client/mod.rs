//! Lumenore backend API client.
//!
//! This module is the heart of the server: everything the tools do ends up
//! as a call through [`AnalyticsClient`]. It covers authentication (static
//! bearer token or credential-exchange cookie auth), endpoint-to-service
//! routing, header sanitization, connection pooling, and the typed error
//! taxonomy the tool layer converts into MCP envelopes.

pub mod analytics;
pub mod auth;
pub mod endpoints;
pub mod error;
pub mod headers;
pub mod timeouts;

pub use analytics::{AnalyticsClient, ApiResponse};
pub use auth::AuthClient;
pub use endpoints::Service;
pub use error::{ClientError, ClientResult};
pub use timeouts::TimeoutSettings;
