//! Pareto (80/20) analysis tool.

use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::{CallToolResult, Tool};
use std::sync::Arc;

use super::{AnalysisParams, analysis_route, run_analysis};
use crate::core::client::AnalyticsClient;

/// Identifies the vital few contributors driving the majority of results.
#[derive(Debug, Clone)]
pub struct GetParetoDataTool;

impl GetParetoDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_pareto_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Performs Pareto (80/20) analysis to identify the most significant contributing \
         factors. Useful for prioritization and resource allocation decisions. Returns \
         the 80/20 distribution, impact rankings, contribution percentages, and \
         prioritized factor lists in JSON format.";

    const ENDPOINT: &'static str = "get-pareto-data";

    const FAILURE_LABEL: &'static str = "Pareto analysis failed";

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
