use crate::core::config::DatabaseConfig;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{Connection, PgPool};
use std::time::Duration;
use tracing::{error, info, warn};

/// Idempotent schema for the metadata table, safe to apply on every startup
pub const SCHEMA: &str = include_str!("../../migrations/0001_create_uploaded_files.sql");

fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions, sqlx::Error> {
    let ssl_mode = config.ssl_mode.parse::<PgSslMode>()?;

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name)
        .ssl_mode(ssl_mode))
}

async fn create_pool(
    config: &DatabaseConfig,
    options: PgConnectOptions,
) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
        .connect_with(options)
        .await?;

    if let Err(e) = ping(&pool).await {
        pool.close().await;
        return Err(e);
    }

    Ok(pool)
}

/// Open the connection pool, retrying until the database answers a ping.
///
/// Each failed attempt is logged and followed by `connect_retry_delay`.
/// `connect_max_attempts == 0` retries forever; otherwise the last error is
/// returned once the bound is reached.
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let options = connect_options(config)?;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match create_pool(config, options.clone()).await {
            Ok(pool) => {
                info!(
                    attempt,
                    host = %config.host,
                    database = %config.name,
                    "Database connection established"
                );
                return Ok(pool);
            }
            Err(e) => {
                if config.connect_max_attempts != 0 && attempt >= config.connect_max_attempts {
                    error!(
                        attempt,
                        error = %e,
                        "Giving up connecting to database"
                    );
                    return Err(e);
                }

                warn!(
                    attempt,
                    max_attempts = config.connect_max_attempts,
                    retry_in_secs = config.connect_retry_delay.as_secs(),
                    error = %e,
                    "Failed to connect to database, retrying"
                );
                tokio::time::sleep(config.connect_retry_delay).await;
            }
        }
    }
}

/// Create the metadata table and its index if they do not exist yet
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Check that a pooled connection is alive
pub async fn ping(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut conn = pool.acquire().await?;
    conn.ping().await
}
