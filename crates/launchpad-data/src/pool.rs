//! Pool construction, migrations, and the liveness probe.

use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::info;

use crate::error::{DataError, Result};

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Build the process-wide MySQL pool. Constructed once at bootstrap and
/// passed explicitly to everything that touches the database.
///
/// # Errors
///
/// Returns an error when the pool cannot reach the server.
pub async fn connect(database_url: &str) -> Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
        .map_err(|source| DataError::ConnectFailed { source })?;
    info!(max_connections = MAX_CONNECTIONS, "database pool ready");
    Ok(pool)
}

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns an error when migration execution fails.
pub async fn run_migrations(pool: &MySqlPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|source| DataError::MigrationFailed { source })?;
    Ok(())
}

/// Minimal round-trip query used by the health endpoint to establish that
/// the database is reachable.
///
/// # Errors
///
/// Returns an error when the round trip fails.
pub async fn ping(pool: &MySqlPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|source| DataError::QueryFailed {
            operation: "ping",
            source,
        })?;
    Ok(())
}
