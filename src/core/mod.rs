//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! the backend API client, error handling, configuration, server lifecycle
//! management, and transport layer abstractions.

pub mod client;
pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use client::{AnalyticsClient, ClientError, TimeoutSettings};
pub use config::Config;
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
