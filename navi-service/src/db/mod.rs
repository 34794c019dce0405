//! Database module for SQLite connection management.

use crate::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Create a SQLite connection pool, creating the database file if needed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    tracing::info!(url = %config.url, "Connecting to SQLite");

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await?;

    tracing::info!("Successfully connected to SQLite");

    Ok(pool)
}

/// Run database migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

/// Migrated single-connection in-memory pool for unit tests.
#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    migrated_pool("sqlite::memory:".to_string(), 1).await
}

/// Migrated pool over a database file, for tests that need several connections.
#[cfg(test)]
pub(crate) async fn file_pool(path: &std::path::Path, max_connections: u32) -> SqlitePool {
    migrated_pool(format!("sqlite://{}", path.display()), max_connections).await
}

#[cfg(test)]
async fn migrated_pool(url: String, max_connections: u32) -> SqlitePool {
    let config = DatabaseConfig {
        url,
        max_connections,
        min_connections: 1,
    };

    let pool = create_pool(&config).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
