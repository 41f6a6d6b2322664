//! Connection pool construction.
//!
//! The pool is built once by the composition root and handed to the executor;
//! nothing else acquires handles from it.

use crate::config::Config;
use crate::error::DbResult;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// How long a statement waits for a pool handle before surfacing busy.
const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Open the SQLite pool described by the configuration.
///
/// The database file is created on first use. An in-memory database keeps a
/// single persistent connection, otherwise each pooled connection would see
/// its own empty database.
pub async fn create_pool(config: &Config) -> DbResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&config.connection_string())?
        .create_if_missing(true)
        .busy_timeout(config.busy_timeout());

    let mut pool_options = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS));

    if config.is_in_memory() {
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    debug!(database = %config.database, "Opened SQLite pool");
    Ok(pool)
}

/// Report the SQLite library version, logged at startup.
pub async fn sqlite_version(pool: &SqlitePool) -> DbResult<String> {
    let version = sqlx::query_scalar::<_, String>("SELECT sqlite_version()")
        .fetch_one(pool)
        .await?;
    Ok(version)
}
