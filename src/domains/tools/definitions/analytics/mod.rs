//! Advanced analytics tools.
//!
//! Six operations share the same shape: a natural-language query plus a
//! dataset schema id, POSTed to an ai-engine endpoint. The per-tool files
//! carry the names and descriptions; the shared plumbing lives here.

mod change;
mod correlation;
mod outlier;
mod pareto;
mod prediction;
mod trend;

pub use change::GetChangeDataTool;
pub use correlation::GetCorrelationDataTool;
pub use outlier::GetOutlierDataTool;
pub use pareto::GetParetoDataTool;
pub use prediction::GetPredictionDataTool;
pub use trend::GetTrendDataTool;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::info;

use super::common::{query_error_envelope, error_result, success_result};
use crate::core::client::AnalyticsClient;

/// Parameters shared by every analysis tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalysisParams {
    /// Natural language query describing the analysis needed.
    #[serde(rename = "userQuery")]
    #[schemars(
        description = "Natural language query describing the analysis needed (1-5000 characters)"
    )]
    pub user_query: String,

    /// Dataset schema identifier.
    #[serde(rename = "schemaId")]
    #[schemars(
        description = "Integer identifier for the dataset schema to analyze. Must be a positive integer."
    )]
    pub schema_id: i64,
}

/// Run one analysis call and wrap the outcome into an MCP envelope.
pub(crate) async fn run_analysis(
    client: &AnalyticsClient,
    endpoint: &str,
    failure_label: &str,
    params: &AnalysisParams,
) -> CallToolResult {
    info!("Running {endpoint} for schema {}", params.schema_id);

    let mut body = Map::new();
    body.insert("userQuery".to_string(), json!(params.user_query));
    body.insert("schemaId".to_string(), json!(params.schema_id));

    match client.call_endpoint(endpoint, "POST", false, body).await {
        Ok(response) => success_result(response.into_text()),
        Err(e) => error_result(query_error_envelope(
            failure_label,
            &e,
            &params.user_query,
            params.schema_id,
        )),
    }
}

/// Build the STDIO/HTTP-shared `ToolRoute` for one analysis tool.
pub(crate) fn analysis_route<S>(
    tool: Tool,
    client: Arc<AnalyticsClient>,
    endpoint: &'static str,
    failure_label: &'static str,
) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(tool, move |ctx: ToolCallContext<'_, S>| {
        let client = client.clone();
        let args = ctx.arguments.clone().unwrap_or_default();
        async move {
            let params: AnalysisParams = serde_json::from_value(Value::Object(args))
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;

            Ok(run_analysis(&client, endpoint, failure_label, &params).await)
        }
        .boxed()
    })
}

/// Shared HTTP dispatch for one analysis tool.
#[cfg(feature = "http")]
pub(crate) async fn analysis_http_handler(
    arguments: Value,
    client: Arc<AnalyticsClient>,
    endpoint: &'static str,
    failure_label: &'static str,
) -> Result<Value, String> {
    let params: AnalysisParams =
        serde_json::from_value(arguments).map_err(|e| format!("Invalid parameters: {e}"))?;

    super::common::http_result(run_analysis(&client, endpoint, failure_label, &params).await)
}
