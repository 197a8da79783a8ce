//! Test helpers: spy collaborators and an importer wired to them.
//!
//! Run from workspace root: `cargo test -p sideload-importer`.

#![allow(dead_code)]

pub mod fixtures;
pub mod spies;

use sideload_core::ImporterConfig;
use sideload_importer::Importer;
use spies::{InMemoryRepository, RecordingStorage, SpyFetcher};
use std::sync::Arc;

/// Importer plus handles on its collaborators.
pub struct TestImporter {
    pub importer: Importer,
    pub fetcher: Arc<SpyFetcher>,
    pub storage: Arc<RecordingStorage>,
    pub repository: Arc<InMemoryRepository>,
}

impl TestImporter {
    pub async fn new(fetcher: SpyFetcher) -> Self {
        Self::with_parts(ImporterConfig::default(), fetcher, InMemoryRepository::new()).await
    }

    pub async fn with_parts(
        config: ImporterConfig,
        fetcher: SpyFetcher,
        repository: InMemoryRepository,
    ) -> Self {
        let fetcher = Arc::new(fetcher);
        let storage = Arc::new(RecordingStorage::new().await);
        let repository = Arc::new(repository);
        let importer = Importer::new(config, fetcher.clone(), storage.clone(), repository.clone());
        Self {
            importer,
            fetcher,
            storage,
            repository,
        }
    }
}
