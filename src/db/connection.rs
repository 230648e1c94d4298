//! Database connection management

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::DatabaseConfig,
    db::dsn::ConnectionConfig,
    error::{AppError, AppResult},
};

/// Create a connection pool for `target` and verify it with a round trip.
///
/// Each attempt is bounded by the acquire timeout. After
/// `connect_attempts` failures the error is surfaced as
/// [`AppError::DatabaseUnavailable`].
pub async fn create_pool(target: &ConnectionConfig, config: &DatabaseConfig) -> AppResult<PgPool> {
    let mut last_error = String::new();

    for attempt in 1..=config.connect_attempts {
        match connect_once(target, config).await {
            Ok(pool) => {
                tracing::info!(database = %target, attempt, "Connected to database");
                return Ok(pool);
            }
            Err(e) => {
                tracing::warn!(
                    database = %target,
                    attempt,
                    max_attempts = config.connect_attempts,
                    error = %e,
                    "Database connection failed"
                );
                last_error = e.to_string();
            }
        }

        if attempt < config.connect_attempts {
            tokio::time::sleep(config.retry_backoff).await;
        }
    }

    Err(AppError::DatabaseUnavailable(format!(
        "{} after {} attempts: {}",
        target.dsn(),
        config.connect_attempts,
        last_error
    )))
}

/// One pool creation plus the `SELECT 1` round trip
async fn connect_once(
    target: &ConnectionConfig,
    config: &DatabaseConfig,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(target.connect_options())
        .await?;

    if let Err(e) = test_connection(&pool).await {
        pool.close().await;
        return Err(e);
    }
    Ok(pool)
}

/// Test database connection
pub async fn test_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
