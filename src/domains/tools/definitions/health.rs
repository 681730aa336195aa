//! Health check tool.
//!
//! Reports server status plus a non-intrusive backend connectivity probe
//! (a `get-domain` round-trip). Always returns a success envelope; a
//! failed probe downgrades the status instead of flagging an error.

use chrono::Utc;
use futures::FutureExt;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use serde_json::{Map, json};
use std::sync::Arc;
use tracing::info;

use super::common::success_result;
use crate::core::client::AnalyticsClient;

/// Verifies server and backend connectivity.
#[derive(Debug, Clone)]
pub struct HealthCheckTool;

impl HealthCheckTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "health_check";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Health check to verify server connectivity and status. Returns server status, \
         backend API connectivity, and basic diagnostics.";

    /// Execute the tool logic. Takes no parameters.
    pub async fn execute(client: &AnalyticsClient) -> CallToolResult {
        info!("Running health check");

        let mut status = "healthy";
        let connectivity;
        let backend_api;

        match client
            .call_endpoint("get-domain", "GET", false, Map::new())
            .await
        {
            Ok(_) => {
                connectivity = "connected".to_string();
                backend_api = "healthy".to_string();
            }
            Err(e) => {
                status = "degraded";
                connectivity = "error".to_string();
                backend_api = format!("error: {e}");
            }
        }

        let payload = json!({
            "status": status,
            "server": "Lumenore-Analytics-MCP",
            "timestamp": Utc::now().to_rfc3339(),
            "connectivity": connectivity,
            "services": {
                "lumenore_client": "healthy",
                "backend_api": backend_api,
            },
        });

        let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
        success_result(text)
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
