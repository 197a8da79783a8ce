//! Database access for imported assets
//!
//! [`AssetRepository`] is the record-keeping collaborator of the importer.
//! [`PgAssetRepository`] implements it on PostgreSQL; the schema lives in the
//! workspace `migrations/` directory and is applied with [`run_migrations`].

pub mod asset;
pub mod error;
pub mod setup;

pub use asset::{AssetRepository, AssetRow, PgAssetRepository};
pub use error::RepositoryError;
pub use setup::{connect_pool, run_migrations};
