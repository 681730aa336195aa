//! Correlation analysis tool.

use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::{CallToolResult, Tool};
use std::sync::Arc;

use super::{AnalysisParams, analysis_route, run_analysis};
use crate::core::client::AnalyticsClient;

/// Finds relationships between variables in a dataset.
#[derive(Debug, Clone)]
pub struct GetCorrelationDataTool;

impl GetCorrelationDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_correlation_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Performs correlation analysis to identify relationships between variables. \
         Measures the strength and direction of associations in the specified dataset \
         and returns correlation coefficients and related insights in JSON format.";

    const ENDPOINT: &'static str = "get-correlation-data";

    const FAILURE_LABEL: &'static str = "Correlation analysis failed";

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
