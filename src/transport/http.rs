//! Streamable HTTP transport.
//!
//! Mounts the MCP service at a configurable path using rmcp's streamable
//! HTTP server (POST for requests, SSE for streamed responses), with a
//! `/health` route for probes. Sessions live in-process, so a single
//! instance owns all of its clients.

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::mcp::SqliteService;
use crate::transport::{Transport, shutdown_signal};
use rmcp::transport::streamable_http_server::{
    StreamableHttpService, session::local::LocalSessionManager,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// How long open connections get to finish after the first shutdown
/// signal. SSE streams can stay open forever, so the drain is bounded.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Serves MCP over streamable HTTP on a TCP listener.
pub struct HttpTransport {
    executor: Arc<QueryExecutor>,
    host: String,
    port: u16,
    /// Path the MCP service is mounted at, e.g. "/mcp".
    endpoint: String,
}

impl HttpTransport {
    pub fn new(
        executor: Arc<QueryExecutor>,
        host: impl Into<String>,
        port: u16,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            host: host.into(),
            port,
            endpoint: endpoint.into(),
        }
    }

    /// Socket address string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path the MCP service is mounted at.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Assemble the axum router: health probe plus the mounted service.
    fn router(&self) -> axum::Router {
        let executor = self.executor.clone();
        let service = StreamableHttpService::new(
            move || Ok(SqliteService::new(executor.clone())),
            LocalSessionManager::default().into(),
            Default::default(),
        );

        let router = axum::Router::new().route("/health", axum::routing::get(health));
        // nest_service rejects "/"; mounting at the root goes through the fallback
        if self.endpoint == "/" {
            router.fallback_service(service)
        } else {
            router.nest_service(&self.endpoint, service)
        }
    }
}

impl Transport for HttpTransport {
    async fn run(&self) -> DbResult<()> {
        let bind_addr = self.bind_addr();
        let listener = TcpListener::bind(&bind_addr)
            .await
            .map_err(|e| DbError::database_error(format!("cannot bind {bind_addr}: {e}")))?;

        info!(addr = %bind_addr, endpoint = %self.endpoint, "Serving MCP over HTTP");

        let drain_started = Arc::new(tokio::sync::Notify::new());
        let drain_trigger = drain_started.clone();

        let server = axum::serve(listener, self.router()).with_graceful_shutdown(async move {
            shutdown_signal().await;
            drain_trigger.notify_one();
        });

        // Graceful shutdown stops accepting new connections but waits on
        // open ones, so bound the wait and honor a second signal.
        tokio::select! {
            outcome = server => {
                if let Err(e) = outcome {
                    error!(error = %e, "HTTP server failed");
                    return Err(DbError::database_error(format!(
                        "HTTP server failed: {e}"
                    )));
                }
                info!("HTTP server stopped");
            }
            _ = bounded_drain(drain_started) => {}
        }

        info!("Closing database pool");
        self.executor.pool().close().await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Resolves `DRAIN_TIMEOUT` after the first signal, or sooner on a second
/// signal. Resolving drops the server future along with its connections.
async fn bounded_drain(drain_started: Arc<tokio::sync::Notify>) {
    drain_started.notified().await;
    info!(
        timeout_secs = DRAIN_TIMEOUT.as_secs(),
        "Draining open connections (repeat signal to force exit)"
    );

    tokio::select! {
        _ = tokio::time::sleep(DRAIN_TIMEOUT) => {
            warn!("Drain timed out, dropping remaining connections");
        }
        _ = shutdown_signal() => {
            warn!("Second signal, dropping remaining connections");
        }
    }
}

/// Liveness probe.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "sqlite-mcp-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
