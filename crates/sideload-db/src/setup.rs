//! Pool creation and schema migrations

use crate::RepositoryError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

const ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Open a connection pool for `database_url`.
pub async fn connect_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, RepositoryError> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "Database connected successfully");
    Ok(pool)
}

/// Apply pending migrations from the workspace `migrations/` directory.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir).await?;
    migrator.run(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
