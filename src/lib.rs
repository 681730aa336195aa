//! Lumenore Analytics MCP Server
//!
//! This crate exposes Lumenore analytics operations as Model Context
//! Protocol (MCP) tools: trend, prediction, outlier, correlation, change
//! and Pareto analysis, natural-language queries, dataset metadata and a
//! backend health check. Each tool call is translated into an
//! authenticated HTTP request against the Lumenore backend.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Core infrastructure including the backend API client,
//!   configuration, error handling, and the main server
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: MCP tools that can be executed by clients
//!
//! # Example
//!
//! ```rust,no_run
//! use lumenore_mcp_server::{core::McpServer, core::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config)?;
//!     // Start the server...
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{AnalyticsClient, Config, Error, McpServer, Result};
