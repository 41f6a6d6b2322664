//! Server binary: parse configuration, open the SQLite pool, then run the
//! selected MCP transport until shutdown.

use clap::Parser;
use sqlite_mcp_server::config::{Config, TransportMode};
use sqlite_mcp_server::db::{self, QueryExecutor};
use sqlite_mcp_server::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Set up the tracing subscriber.
///
/// Logs go to stderr: the stdio transport owns stdout for protocol messages.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        transport = %config.transport,
        database = %config.database,
        "Starting sqlite-mcp-server"
    );

    // Open the database pool and probe it once
    let pool = db::create_pool(&config).await?;
    let version = db::sqlite_version(&pool).await?;
    info!(sqlite_version = %version, "Database ready");

    let executor = Arc::new(QueryExecutor::new(pool));

    let outcome = match config.transport {
        TransportMode::Stdio => StdioTransport::new(executor).run().await,
        TransportMode::Http => {
            HttpTransport::new(
                executor,
                &config.http_host,
                config.http_port,
                &config.endpoint,
            )
            .run()
            .await
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "Server exited with error");
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}
