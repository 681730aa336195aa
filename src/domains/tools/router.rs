//! Tool Router - builds the rmcp ToolRouter from the definitions.
//!
//! Each tool knows how to create its own route; this module wires them all
//! to the shared analytics client.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use super::definitions::{
    GetChangeDataTool, GetCorrelationDataTool, GetDatasetMetadataTool, GetMetadataInfoTool,
    GetOutlierDataTool, GetParetoDataTool, GetPredictionDataTool, GetTrendDataTool,
    HealthCheckTool, NlqToDataTool,
};
use crate::core::client::AnalyticsClient;

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(client: Arc<AnalyticsClient>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetTrendDataTool::create_route(client.clone()))
        .with_route(GetPredictionDataTool::create_route(client.clone()))
        .with_route(GetOutlierDataTool::create_route(client.clone()))
        .with_route(GetCorrelationDataTool::create_route(client.clone()))
        .with_route(GetChangeDataTool::create_route(client.clone()))
        .with_route(GetParetoDataTool::create_route(client.clone()))
        .with_route(NlqToDataTool::create_route(client.clone()))
        .with_route(GetDatasetMetadataTool::create_route(client.clone()))
        .with_route(GetMetadataInfoTool::create_route(client.clone()))
        .with_route(HealthCheckTool::create_route(client))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;
    use crate::core::client::TimeoutSettings;
    use crate::core::config::CredentialsConfig;

    struct TestServer {}

    fn test_client() -> Arc<AnalyticsClient> {
        Arc::new(
            AnalyticsClient::new(
                "https://x.test",
                CredentialsConfig {
                    api_token: Some("tok".to_string()),
                    client_id: None,
                    client_secret: None,
                },
                TimeoutSettings::default(),
                None,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_client());
        let tools = router.list_all();
        assert_eq!(tools.len(), 10);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"get_trend_data"));
        assert!(names.contains(&"get_prediction_data"));
        assert!(names.contains(&"get_outlier_data"));
        assert!(names.contains(&"get_correlation_data"));
        assert!(names.contains(&"get_change_data"));
        assert!(names.contains(&"get_pareto_data"));
        assert!(names.contains(&"nlq_to_data"));
        assert!(names.contains(&"get_dataset_metadata"));
        assert!(names.contains(&"get_metadata_info"));
        assert!(names.contains(&"health_check"));
    }

    #[test]
    fn test_registry_matches_router() {
        // Ensure registry and router have the same tools
        let client = test_client();
        let registry = ToolRegistry::new(client.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(client);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }
}
