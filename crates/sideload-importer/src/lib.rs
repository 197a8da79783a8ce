//! Sideload Importer
//!
//! Imports a remote image into the media library. One run normalizes and
//! validates the URL, downloads the file into transient storage, gates it on
//! its sniffed content type, then hands it to the [`Registrar`] which stores
//! it, creates the asset record and backfills descriptive metadata.
//!
//! ```no_run
//! use std::sync::Arc;
//! use sideload_core::{Config, ImportRequest};
//! use sideload_db::PgAssetRepository;
//! use sideload_importer::{HttpFetcher, Importer};
//! use sideload_storage::create_storage;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! config.validate()?;
//!
//! let fetcher = Arc::new(HttpFetcher::new(&config.importer)?);
//! let storage = create_storage(&config.storage).await?;
//! let database_url = config.database_url().unwrap_or_default();
//! let repository =
//!     Arc::new(PgAssetRepository::connect(database_url, config.db_max_connections).await?);
//!
//! let importer = Importer::new(config.importer.clone(), fetcher, storage, repository);
//! let request = ImportRequest::new("example.com/pics/sunset.jpg").with_title("Sunset");
//! let asset_id = importer.import(request).await?;
//! println!("imported {asset_id}");
//! # Ok(())
//! # }
//! ```

pub mod fetcher;
mod guard;
pub mod importer;
pub mod registrar;
pub mod url;

pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use importer::{Importer, ImporterHandle};
pub use registrar::Registrar;
