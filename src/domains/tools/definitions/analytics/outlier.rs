//! Outlier detection tool.

use rmcp::handler::server::tool::{ToolRoute, cached_schema_for_type};
use rmcp::model::{CallToolResult, Tool};
use std::sync::Arc;

use super::{AnalysisParams, analysis_route, run_analysis};
use crate::core::client::AnalyticsClient;

/// Detects anomalies and unusual data points.
#[derive(Debug, Clone)]
pub struct GetOutlierDataTool;

impl GetOutlierDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_outlier_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Detects outliers and anomalies in the specified dataset. Identifies data points \
         that deviate significantly from expected patterns, with anomaly scores and \
         context for each detected outlier in JSON format.";

    const ENDPOINT: &'static str = "get-outlier-data";

    const FAILURE_LABEL: &'static str = "Outlier analysis failed";

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
