//! Dataset listing tool.

use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use serde_json::{Map, json};
use std::sync::Arc;
use tracing::info;

use super::common::{error_result, success_result};
use crate::core::client::AnalyticsClient;

/// Fetches all available datasets with their metadata.
#[derive(Debug, Clone)]
pub struct GetDatasetMetadataTool;

impl GetDatasetMetadataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_dataset_metadata";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetches all available datasets with comprehensive metadata, including dataset \
         names, IDs, timestamps, and types. Use this to discover which schema IDs are \
         available for the analysis tools.";

    const ENDPOINT: &'static str = "get-domain";

    /// Execute the tool logic. Takes no parameters.
    pub async fn execute(client: &AnalyticsClient) -> CallToolResult {
        info!("Fetching dataset metadata");

        match client
            .call_endpoint(Self::ENDPOINT, "GET", false, Map::new())
            .await
        {
            Ok(response) => {
                let datasets = response
                    .as_json()
                    .and_then(|v| v.get("data"))
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let text = serde_json::to_string_pretty(&datasets)
                    .unwrap_or_else(|_| datasets.to_string());
                success_result(text)
            }
            Err(e) => error_result(json!({
                "error": format!("Failed to get dataset metadata: {e}"),
                "status": "error",
                "available": false,
            })),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Arc::new(
                json!({"type": "object", "properties": {}})
                    .as_object()
                    .cloned()
                    .unwrap_or_default(),
            ),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for the rmcp router.
    pub fn create_route<S>(client: Arc<AnalyticsClient>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |_ctx: ToolCallContext<'_, S>| {
            let client = client.clone();
            async move { Ok(Self::execute(&client).await) }.boxed()
        })
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        _arguments: serde_json::Value,
        client: Arc<AnalyticsClient>,
    ) -> Result<serde_json::Value, String> {
        super::common::http_result(Self::execute(&client).await)
    }
}
