//! Column metadata lookup tool.
//!
//! Targets the dynamic endpoint `metadata/get/{schemaId}` - the endpoint
//! registry resolves it through its registered base `metadata/get`.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tracing::info;

use super::common::{error_result, success_result};
use crate::core::client::AnalyticsClient;

/// Column attributes requested from the backend.
const METADATA_COLUMNS: [&str; 7] = [
    "description",
    "column_name",
    "column_alias",
    "column_type",
    "unit",
    "column_datatype_name",
    "date_format",
];

/// Parameters for the metadata lookup.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct MetadataInfoParams {
    /// Schema/Domain ID whose column metadata is requested.
    #[serde(rename = "schemaId")]
    #[schemars(
        description = "Unique Schema/Domain ID used to retrieve column metadata. Must be a positive integer."
    )]
    pub schema_id: i64,
}

/// Fetches detailed column metadata for a dataset schema.
#[derive(Debug, Clone)]
pub struct GetMetadataInfoTool;

impl GetMetadataInfoTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "get_metadata_info";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Fetches detailed column metadata for a specific dataset schema: column names, \
         aliases, descriptions, data types, date formats, and units. Helps understand \
         the purpose and structure of fields inside a dataset before querying it.";

    /// Execute the tool logic.
    pub async fn execute(client: &AnalyticsClient, params: &MetadataInfoParams) -> CallToolResult {
        if params.schema_id <= 0 {
            return error_result(json!({
                "error": "Schema ID must be a positive integer",
                "status": "failed",
                "success": false,
            }));
        }

        info!("Fetching column metadata for schema {}", params.schema_id);

        let endpoint = format!("metadata/get/{}", params.schema_id);
        let mut body = Map::new();
        body.insert(
            "data".to_string(),
            json!({
                "columns": METADATA_COLUMNS,
                "domainId": params.schema_id,
            }),
        );

        match client.call_endpoint(&endpoint, "POST", false, body).await {
            Ok(response) => {
                let result_set = response
                    .as_json()
                    .and_then(|v| v.pointer("/data/result/resultSet"))
                    .cloned()
                    .unwrap_or_else(|| json!({}));
                let payload = json!({
                    "columns": METADATA_COLUMNS,
                    "data": result_set,
                });
                let text = serde_json::to_string_pretty(&payload)
                    .unwrap_or_else(|_| payload.to_string());
                success_result(text)
            }
            Err(e) => error_result(json!({
                "error": format!(
                    "Unable to fetch metadata for Schema/Domain ID {}: {e}",
                    params.schema_id
                ),
                "status": "failed",
                "success": false,
            })),
        }
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<MetadataInfoParams>(),
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
                let params: MetadataInfoParams = serde_json::from_value(Value::Object(args))
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
        let params: MetadataInfoParams =
            serde_json::from_value(arguments).map_err(|e| format!("Invalid parameters: {e}"))?;

        super::common::http_result(Self::execute(&client, &params).await)
    }
}
