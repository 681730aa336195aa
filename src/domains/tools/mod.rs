//! Tools domain module.
//!
//! Tools are the exposed API surface: one per analytics operation, each a
//! thin pass-through validating its parameters, calling the analytics
//! client, and wrapping the outcome into the MCP envelope. The client's
//! typed errors are caught here and nowhere else.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `router.rs` - Dynamic ToolRouter builder for STDIO transport
//! - `registry.rs` - Central tool registry and HTTP dispatch
//! - `error.rs` - Tool-specific error types

pub mod definitions;
mod error;
mod registry;
pub mod router;

pub use error::ToolError;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
