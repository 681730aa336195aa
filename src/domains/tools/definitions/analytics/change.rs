//! Change analysis tool.

use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::{CallToolResult, Tool};
use std::sync::Arc;

use super::{AnalysisParams, analysis_route, run_analysis};
use crate::core::client::AnalyticsClient;

/// Quantifies shifts between periods or segments.
#[derive(Debug, Clone)]
pub struct GetChangeDataTool;

impl GetChangeDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_change_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Performs change analysis to quantify shifts between time periods or segments. \
         Highlights significant increases and decreases, their magnitude, and the \
         contributing factors in JSON format.";

    const ENDPOINT: &'static str = "get-change-data";

    const FAILURE_LABEL: &'static str = "Change analysis failed";

    /// Execute the tool logic.
    pub async fn execute(client: &AnalyticsClient, params: &AnalysisParams) -> CallToolResult {
        run_analysis(client, Self::ENDPOINT, Self::FAILURE_LABEL, params).await
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<AnalysisParams>(),
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
        analysis_route(Self::to_tool(), client, Self::ENDPOINT, Self::FAILURE_LABEL)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        client: Arc<AnalyticsClient>,
    ) -> Result<serde_json::Value, String> {
        super::analysis_http_handler(arguments, client, Self::ENDPOINT, Self::FAILURE_LABEL).await
    }
}
