use sideload_core::AssetId;
use thiserror::Error;

/// Errors raised by asset repositories
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Asset not found: {0}")]
    NotFound(AssetId),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}
