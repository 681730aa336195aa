//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools
//! - HTTP dispatch for tool calls (when http feature is enabled)
//! - Tool metadata for listing

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use super::definitions::{
    GetChangeDataTool, GetCorrelationDataTool, GetDatasetMetadataTool, GetMetadataInfoTool,
    GetOutlierDataTool, GetParetoDataTool, GetPredictionDataTool, GetTrendDataTool,
    HealthCheckTool, NlqToDataTool,
};
use crate::core::client::AnalyticsClient;

/// Tool registry - manages all available tools.
pub struct ToolRegistry {
    client: Arc<AnalyticsClient>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(client: Arc<AnalyticsClient>) -> Self {
        Self { client }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GetTrendDataTool::NAME,
            GetPredictionDataTool::NAME,
            GetOutlierDataTool::NAME,
            GetCorrelationDataTool::NAME,
            GetChangeDataTool::NAME,
            GetParetoDataTool::NAME,
            NlqToDataTool::NAME,
            GetDatasetMetadataTool::NAME,
            GetMetadataInfoTool::NAME,
            HealthCheckTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// This is the single source of truth for all available tools. Both
    /// transports use this to get tool metadata.
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GetTrendDataTool::to_tool(),
            GetPredictionDataTool::to_tool(),
            GetOutlierDataTool::to_tool(),
            GetCorrelationDataTool::to_tool(),
            GetChangeDataTool::to_tool(),
            GetParetoDataTool::to_tool(),
            NlqToDataTool::to_tool(),
            GetDatasetMetadataTool::to_tool(),
            GetMetadataInfoTool::to_tool(),
            HealthCheckTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let client = self.client.clone();
        match name {
            GetTrendDataTool::NAME => GetTrendDataTool::http_handler(arguments, client).await,
            GetPredictionDataTool::NAME => {
                GetPredictionDataTool::http_handler(arguments, client).await
            }
            GetOutlierDataTool::NAME => GetOutlierDataTool::http_handler(arguments, client).await,
            GetCorrelationDataTool::NAME => {
                GetCorrelationDataTool::http_handler(arguments, client).await
            }
            GetChangeDataTool::NAME => GetChangeDataTool::http_handler(arguments, client).await,
            GetParetoDataTool::NAME => GetParetoDataTool::http_handler(arguments, client).await,
            NlqToDataTool::NAME => NlqToDataTool::http_handler(arguments, client).await,
            GetDatasetMetadataTool::NAME => {
                GetDatasetMetadataTool::http_handler(arguments, client).await
            }
            GetMetadataInfoTool::NAME => GetMetadataInfoTool::http_handler(arguments, client).await,
            HealthCheckTool::NAME => HealthCheckTool::http_handler(arguments, client).await,
            _ => {
                warn!("Unknown tool requested: {name}");
                Err(super::ToolError::not_found(name).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::client::TimeoutSettings;
    use crate::core::config::CredentialsConfig;

    fn test_client() -> Arc<AnalyticsClient> {
        Arc::new(
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
            .unwrap(),
        )
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_client());
        let names = registry.tool_names();
        assert_eq!(names.len(), 10);
        assert!(names.contains(&"get_trend_data"));
        assert!(names.contains(&"nlq_to_data"));
        assert!(names.contains(&"get_dataset_metadata"));
        assert!(names.contains(&"get_metadata_info"));
        assert!(names.contains(&"health_check"));
    }

    #[test]
    fn test_all_tools_have_descriptions() {
        for tool in ToolRegistry::get_all_tools() {
            assert!(tool.description.is_some(), "{} lacks description", tool.name);
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_client());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(result.is_err());
    }
}
