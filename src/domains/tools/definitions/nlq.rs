//! Natural-language-query-to-data tool.
//!
//! Unlike the analysis tools this one uses the client's streamed (buffered)
//! read: the backend emits the result incrementally and the full text is
//! returned once the stream ends.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::info;

use super::analytics::AnalysisParams;
use super::common::{error_result, error_status, success_result};
use crate::core::client::AnalyticsClient;

/// Converts plain-English questions into structured data results.
#[derive(Debug, Clone)]
pub struct NlqToDataTool;

impl NlqToDataTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "nlq_to_data";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Converts natural language queries into structured data analysis results. \
         Processes questions expressed in plain English and transforms them into \
         analytical operations on the specified dataset schema - aggregations, \
         rankings, filters, and insights. Returns structured data with headers and \
         data rows.";

    const ENDPOINT: &'static str = "nlq-to-data";

    /// Execute the tool logic.
    pub async fn execute(client: &AnalyticsClient, params: &AnalysisParams) -> CallToolResult {
        info!("Running NLQ for schema {}", params.schema_id);

        let mut body = Map::new();
        body.insert("userQuery".to_string(), json!(params.user_query));
        body.insert("schemaId".to_string(), json!(params.schema_id));

        match client.call_endpoint(Self::ENDPOINT, "POST", true, body).await {
            Ok(response) => success_result(response.into_text()),
            Err(e) => {
                let message = if e.is_validation() {
                    format!("Invalid request parameters: {e}")
                } else {
                    format!("Analysis failed: {e}")
                };
                error_result(json!({
                    "error": message,
                    "status": error_status(&e),
                    "query": params.user_query,
                    "schema_id": params.schema_id,
                    "suggestion": "Check that you have valid authorization and schema ID",
                }))
            }
        }
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
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let client = client.clone();
            let args = ctx.arguments.clone().unwrap_or_default();
            async move {
                let params: AnalysisParams = serde_json::from_value(Value::Object(args))
                    .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

                Ok(Self::execute(&client, &params).await)
            }
            .boxed()
        })
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: Value,
        client: Arc<AnalyticsClient>,
    ) -> Result<Value, String> {
        let params: AnalysisParams =
            serde_json::from_value(arguments).map_err(|e| format!("Invalid parameters: {e}"))?;

        super::common::http_result(Self::execute(&client, &params).await)
    }
}
