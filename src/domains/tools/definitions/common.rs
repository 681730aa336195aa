//! Shared helpers for the analytics tool definitions.
//!
//! Every tool converts core client results into the same MCP envelope:
//! plain text content on success, a structured JSON payload with an
//! `isError` marker on failure. The client's typed errors never leave the
//! tool layer.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Value, json};
use tracing::warn;

use crate::core::client::ClientError;

/// Create a success result with text content.
pub fn success_result(content: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(content)])
}

/// Create an error result whose text is a serialized JSON payload.
pub fn error_result(payload: Value) -> CallToolResult {
    warn!("Tool failed: {payload}");
    CallToolResult::error(vec![Content::text(payload.to_string())])
}

/// Status tag for a client error: validation failures are distinguished
/// from everything else.
pub fn error_status(error: &ClientError) -> &'static str {
    if error.is_validation() {
        "validation_error"
    } else {
        "error"
    }
}

/// Build the standard error envelope for query/schema tools, echoing the
/// input parameters.
pub fn query_error_envelope(
    failure_label: &str,
    error: &ClientError,
    query: &str,
    schema_id: i64,
) -> Value {
    let message = if error.is_validation() {
        format!("Invalid request parameters: {error}")
    } else {
        format!("{failure_label}: {error}")
    };

    json!({
        "error": message,
        "status": error_status(error),
        "query": query,
        "schema_id": schema_id,
    })
}

/// Wrap a `CallToolResult` into the JSON shape the HTTP transport returns.
#[cfg(feature = "http")]
pub fn http_result(result: CallToolResult) -> Result<serde_json::Value, String> {
    Ok(json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_distinguishes_validation() {
        let validation = ClientError::validation("bad");
        let transport = ClientError::Request {
            url: "https://x.test".to_string(),
            message: "refused".to_string(),
        };
        assert_eq!(error_status(&validation), "validation_error");
        assert_eq!(error_status(&transport), "error");
    }

    #[test]
    fn test_query_error_envelope_echoes_input() {
        let err = ClientError::validation("Query cannot be empty");
        let payload = query_error_envelope("Trend analysis failed", &err, "q", 5);
        assert_eq!(payload["status"], "validation_error");
        assert_eq!(payload["query"], "q");
        assert_eq!(payload["schema_id"], 5);
        assert!(
            payload["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid request parameters")
        );
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = error_result(json!({"error": "boom"}));
        assert_eq!(result.is_error, Some(true));
    }
}
