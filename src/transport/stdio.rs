//! Stdio transport.
//!
//! Runs a single MCP session over stdin/stdout for clients that spawn the
//! server as a child process. Protocol frames own stdout, so every log
//! line goes to stderr (see `init_tracing` in main).

use crate::db::QueryExecutor;
use crate::error::{DbError, DbResult};
use crate::mcp::SqliteService;
use crate::transport::{Transport, shutdown_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Serves one MCP session over standard input/output.
pub struct StdioTransport {
    executor: Arc<QueryExecutor>,
}

impl StdioTransport {
    pub fn new(executor: Arc<QueryExecutor>) -> Self {
        Self { executor }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Serving MCP over stdio");

        let session = SqliteService::new(self.executor.clone())
            .serve(stdio())
            .await
            .map_err(|e| DbError::database_error(format!("stdio setup failed: {e}")))?;

        // Race session completion against the first shutdown signal.
        let interrupted = tokio::select! {
            outcome = session.waiting() => {
                if let Err(e) = outcome {
                    warn!(error = %e, "stdio session failed");
                    return Err(DbError::database_error(format!(
                        "stdio session failed: {e}"
                    )));
                }
                info!("Client closed the session");
                false
            }
            _ = shutdown_signal() => {
                info!("Shutdown requested, closing (repeat signal to force exit)");
                true
            }
        };

        if interrupted {
            // Let an impatient second signal cut the teardown short.
            tokio::spawn(async {
                shutdown_signal().await;
                warn!("Second signal, exiting now");
                std::process::exit(1);
            });
        }

        info!("Closing database pool");
        self.executor.pool().close().await;

        if interrupted {
            // The stdin reader parks a thread in a blocking read that no
            // cancellation reaches, so returning here would never unwind.
            info!("Done, exiting");
            std::process::exit(0);
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
