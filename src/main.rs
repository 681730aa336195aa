//! MCP Server Entry Point
//!
//! This is the main entry point for the MCP server. It loads and validates
//! configuration, initializes logging, and starts the server with the
//! configured transport.

use anyhow::Result;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use lumenore_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment; an unusable configuration
    // (missing credentials, malformed tuning values) aborts startup.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            error!("Startup failed: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    config.timeouts.log_settings();

    // Create the MCP server
    let transport_config = config.transport.clone();
    let server = match McpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Startup failed: {e}");
            std::process::exit(1);
        }
    };

    info!("Server initialized");

    let client = server.client().clone();

    // Create and run the transport service
    let transport = TransportService::new(transport_config);
    let outcome = transport.run(server).await;

    // Release the backend pool before exiting
    client.shutdown().await;

    outcome?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Configures tracing with the specified log level and format. Logs go to
/// stderr so that the STDIO transport keeps stdout for the protocol.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
