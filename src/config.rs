//! Runtime configuration.
//!
//! Every setting is a CLI flag with an environment variable fallback, so
//! the server configures the same way whether a client spawns it or a
//! container runs it.

use clap::{Parser, ValueEnum};
use std::time::Duration;

pub const DEFAULT_HTTP_HOST: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_MCP_ENDPOINT: &str = "/mcp";

// Pool configuration defaults. SQLite is single-writer, so one pooled
// connection is the safe default.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 1;
pub const DEFAULT_BUSY_TIMEOUT_SECS: u64 = 5;

/// Which channel serves MCP traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TransportMode {
    /// Standard input/output, for clients that spawn the server
    #[default]
    Stdio,
    /// Streamable HTTP with SSE, for network clients
    Http,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stdio => write!(f, "stdio"),
            Self::Http => write!(f, "http"),
        }
    }
}

/// Configuration for the SQLite MCP Server.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sqlite-mcp-server",
    about = "MCP server exposing SQLite CRUD operations as tools for AI assistants",
    version,
    author
)]
pub struct Config {
    /// Path to the SQLite database file. Created if missing. Use ":memory:"
    /// for a transient in-memory database.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "PATH",
        env = "MCP_DATABASE"
    )]
    pub database: String,

    /// Transport to serve on: stdio or http
    #[arg(
        short,
        long,
        value_enum,
        default_value = "stdio",
        env = "MCP_TRANSPORT"
    )]
    pub transport: TransportMode,

    /// Host the HTTP listener binds (http transport only)
    #[arg(
        long,
        default_value = DEFAULT_HTTP_HOST,
        env = "MCP_HTTP_HOST"
    )]
    pub http_host: String,

    /// Port the HTTP listener binds (http transport only)
    #[arg(
        long,
        default_value_t = DEFAULT_HTTP_PORT,
        env = "MCP_HTTP_PORT"
    )]
    pub http_port: u16,

    /// Path the MCP service is mounted at (http transport only)
    #[arg(
        long,
        default_value = DEFAULT_MCP_ENDPOINT,
        env = "MCP_ENDPOINT"
    )]
    pub endpoint: String,

    /// Maximum connections in the pool
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONNECTIONS,
        env = "MCP_MAX_CONNECTIONS"
    )]
    pub max_connections: u32,

    /// Seconds a statement waits on a locked database before failing
    #[arg(
        long,
        default_value_t = DEFAULT_BUSY_TIMEOUT_SECS,
        env = "MCP_BUSY_TIMEOUT_SECS"
    )]
    pub busy_timeout_secs: u64,

    /// Default log filter when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "MCP_LOG_LEVEL")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "MCP_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Create a default in-memory configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            database: ":memory:".to_string(),
            transport: TransportMode::Stdio,
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            endpoint: DEFAULT_MCP_ENDPOINT.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            busy_timeout_secs: DEFAULT_BUSY_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// sqlx connection string for the configured database path.
    pub fn connection_string(&self) -> String {
        if self.database.starts_with("sqlite:") {
            self.database.clone()
        } else {
            format!("sqlite:{}", self.database)
        }
    }

    /// True when the configured database lives in memory only.
    pub fn is_in_memory(&self) -> bool {
        let path = self
            .database
            .strip_prefix("sqlite:")
            .unwrap_or(&self.database);
        path == ":memory:"
    }

    /// Get the busy timeout as a Duration.
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_secs(self.busy_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transport, TransportMode::Stdio);
        assert_eq!(config.http_host, DEFAULT_HTTP_HOST);
        assert_eq!(config.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(config.endpoint, DEFAULT_MCP_ENDPOINT);
        assert_eq!(config.max_connections, 1);
        assert!(config.is_in_memory());
    }

    #[test]
    fn test_connection_string_adds_scheme() {
        let config = Config {
            database: "data/app.db".to_string(),
            ..Config::default()
        };
        assert_eq!(config.connection_string(), "sqlite:data/app.db");
    }

    #[test]
    fn test_connection_string_keeps_existing_scheme() {
        let config = Config {
            database: "sqlite:data/app.db".to_string(),
            ..Config::default()
        };
        assert_eq!(config.connection_string(), "sqlite:data/app.db");
    }

    #[test]
    fn test_is_in_memory() {
        let mut config = Config::default();
        assert!(config.is_in_memory());

        config.database = "sqlite::memory:".to_string();
        assert!(config.is_in_memory());

        config.database = "app.db".to_string();
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_busy_timeout_duration() {
        let config = Config {
            busy_timeout_secs: 12,
            ..Config::default()
        };
        assert_eq!(config.busy_timeout(), Duration::from_secs(12));
    }

    #[test]
    fn test_transport_mode_display() {
        assert_eq!(TransportMode::Stdio.to_string(), "stdio");
        assert_eq!(TransportMode::Http.to_string(), "http");
    }
}
