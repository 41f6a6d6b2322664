//! MCP transports.
//!
//! The server speaks MCP over one of two transports chosen at startup:
//! stdio for clients that spawn the server as a child process, and
//! streamable HTTP for network clients. Both wrap the same service and
//! differ only in framing and shutdown handling.

pub mod http;
pub mod stdio;

pub use http::HttpTransport;
pub use stdio::StdioTransport;

use crate::error::DbResult;
use std::future::Future;
use tokio::signal;
use tracing::info;

/// Interface each transport implements.
pub trait Transport: Send + Sync {
    /// Serve MCP traffic until the client disconnects or a shutdown
    /// signal arrives.
    fn run(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Short name used in startup logs.
    fn name(&self) -> &'static str;
}

/// Resolves once SIGINT or SIGTERM is delivered.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("SIGINT received"),
        _ = terminate => info!("SIGTERM received"),
    }
}
