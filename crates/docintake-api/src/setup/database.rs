//! Database setup and initialization

use anyhow::{Context, Result};
use docintake_core::Config;
use docintake_db::{connect, run_migrations};
use sqlx::SqlitePool;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<SqlitePool> {
    tracing::info!("Connecting to database...");
    let pool = connect(
        config.database_url(),
        config.db_max_connections(),
        config.db_timeout_seconds(),
    )
    .await
    .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Database connected successfully"
    );

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
