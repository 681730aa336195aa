//! MCP Server implementation and lifecycle management.
//!
//! The server owns the single shared [`AnalyticsClient`] instance for the
//! process and wires it into the dynamically built ToolRouter. Adding a
//! tool means adding a definition file and a route - not touching this
//! file.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

use super::client::AnalyticsClient;
use super::config::Config;
use super::error::Result as CoreResult;
use crate::domains::tools::build_tool_router;

#[cfg(feature = "http")]
use crate::domains::tools::ToolRegistry;

/// The main MCP server handler.
///
/// Implements the `ServerHandler` trait from rmcp; tool calls are routed
/// through the ToolRouter to the definitions in `domains/tools/`.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared backend API client.
    client: Arc<AnalyticsClient>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    ///
    /// Fails when the backend client cannot be constructed (e.g. empty
    /// base URL).
    ///
    /// The crate Result alias is renamed on import: the `tool_handler`
    /// macro expands two-parameter `Result` return types in this module.
    pub fn new(config: Config) -> CoreResult<Self> {
        let config = Arc::new(config);

        let client = Arc::new(AnalyticsClient::new(
            config.api.base_url.clone(),
            config.credentials.clone(),
            config.timeouts.clone(),
            None,
        )?);

        Ok(Self {
            tool_router: build_tool_router::<Self>(client.clone()),
            config,
            client,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared backend client (for shutdown and tests).
    pub fn client(&self) -> &Arc<AnalyticsClient> {
        &self.client
    }

    /// Release the backend connection pool during teardown.
    pub async fn shutdown(&self) {
        self.client.shutdown().await;
    }

    /// List all available tools (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> std::result::Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.client.clone());
        registry.call_tool(name, arguments).await
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Exposes Lumenore analytics operations as tools: trend, prediction, \
                 outlier, correlation, change, and Pareto analysis, natural-language \
                 queries, dataset metadata, and a health check."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CredentialsConfig;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.credentials = CredentialsConfig {
            api_token: Some("tok".to_string()),
            client_id: None,
            client_secret: None,
        };
        config
    }

    #[test]
    fn test_server_construction() {
        let server = McpServer::new(test_config()).unwrap();
        assert_eq!(server.name(), "Lumenore-Analytics-MCP");
        assert_eq!(server.list_tools().len(), 10);
    }

    #[test]
    fn test_server_rejects_empty_base_url() {
        let mut config = test_config();
        config.api.base_url = "  ".to_string();
        assert!(McpServer::new(config).is_err());
    }
}
