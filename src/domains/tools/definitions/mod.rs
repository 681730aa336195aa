//! Individual tool implementations, one file per tool.
//!
//! Each tool defines its parameters struct, an `execute()` method holding
//! the core logic, a `to_tool()` metadata model, a `create_route()` for the
//! rmcp router, and an `http_handler()` for the HTTP transport.

pub mod analytics;
pub mod common;
pub mod datasets;
pub mod health;
pub mod metadata;
pub mod nlq;

pub use analytics::{
    AnalysisParams, GetChangeDataTool, GetCorrelationDataTool, GetOutlierDataTool,
    GetParetoDataTool, GetPredictionDataTool, GetTrendDataTool,
};
pub use datasets::GetDatasetMetadataTool;
pub use health::HealthCheckTool;
pub use metadata::{GetMetadataInfoTool, MetadataInfoParams};
pub use nlq::NlqToDataTool;
