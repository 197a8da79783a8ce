//! Collaborators that record how the importer used them.

use async_trait::async_trait;
use chrono::Utc;
use sideload_core::mime;
use sideload_core::{
    Asset, AssetFieldsUpdate, AssetId, AttachmentMetadata, FetchedFile, NewAssetRecord,
    StoredFile,
};
use sideload_db::{AssetRepository, RepositoryError};
use sideload_importer::{FetchError, Fetcher};
use sideload_storage::{LocalStorage, Storage, StorageBackend, StorageError, StorageResult};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tempfile::TempDir;
use uuid::Uuid;

enum FetchBehavior {
    Body(Vec<u8>),
    Timeout,
}

/// Fetcher serving a fixed body (or timing out) without touching the network.
pub struct SpyFetcher {
    behavior: FetchBehavior,
    calls: Mutex<Vec<String>>,
    temp_paths: Mutex<Vec<PathBuf>>,
}

impl SpyFetcher {
    fn with_behavior(behavior: FetchBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
            temp_paths: Mutex::new(Vec::new()),
        }
    }

    pub fn serving(body: Vec<u8>) -> Self {
        Self::with_behavior(FetchBehavior::Body(body))
    }

    pub fn timing_out() -> Self {
        Self::with_behavior(FetchBehavior::Timeout)
    }

    /// URLs requested so far.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Transient files handed out so far.
    pub fn temp_paths(&self) -> Vec<PathBuf> {
        self.temp_paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for SpyFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedFile, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());

        match &self.behavior {
            FetchBehavior::Timeout => Err(FetchError::Timeout(timeout)),
            FetchBehavior::Body(body) => {
                let mut file = tempfile::NamedTempFile::new()?;
                file.write_all(body)?;
                let path = file.into_temp_path();
                self.temp_paths.lock().unwrap().push(path.to_path_buf());
                Ok(FetchedFile::new(
                    path,
                    mime::sniff(body),
                    body.len() as u64,
                ))
            }
        }
    }
}

/// Local storage on a temp directory that records persist and delete calls.
pub struct RecordingStorage {
    inner: LocalStorage,
    dir: TempDir,
    fail_persist: AtomicBool,
    persisted: Mutex<Vec<StoredFile>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingStorage {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let inner = LocalStorage::new(dir.path(), "http://localhost:3000/media".to_string())
            .await
            .expect("Failed to create local storage");
        Self {
            inner,
            dir,
            fail_persist: AtomicBool::new(false),
            persisted: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_persist(&self) {
        self.fail_persist.store(true, Ordering::SeqCst);
    }

    pub fn base_path(&self) -> &Path {
        self.dir.path()
    }

    pub fn persisted(&self) -> Vec<StoredFile> {
        self.persisted.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn persist(&self, file: &FetchedFile, filename: &str) -> StorageResult<StoredFile> {
        if self.fail_persist.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("disk full".to_string()));
        }
        let stored = self.inner.persist(file, filename).await?;
        self.persisted.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.deleted.lock().unwrap().push(storage_key.to_string());
        self.inner.delete(storage_key).await
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        self.inner.exists(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// One observed repository call.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoCall {
    Create(NewAssetRecord),
    UpdateFields(AssetId, AssetFieldsUpdate),
    SetAltText(AssetId, String),
    Attachment(AssetId, AttachmentMetadata),
}

/// Which repository operations should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct RepositoryFailures {
    pub create: bool,
    pub nil_id: bool,
    pub fields: bool,
    pub alt_text: bool,
    pub attachment: bool,
}

fn simulated(field: &'static str) -> RepositoryError {
    RepositoryError::InvalidValue {
        field,
        message: "simulated failure".to_string(),
    }
}

/// Asset repository held in memory.
#[derive(Default)]
pub struct InMemoryRepository {
    failures: RepositoryFailures,
    assets: Mutex<HashMap<AssetId, Asset>>,
    calls: Mutex<Vec<RepoCall>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: RepositoryFailures) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, RepoCall::Create(_)))
            .count()
    }

    pub fn field_updates(&self) -> Vec<AssetFieldsUpdate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                RepoCall::UpdateFields(_, update) => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn asset_count(&self) -> usize {
        self.assets.lock().unwrap().len()
    }

    fn record(&self, call: RepoCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn with_asset<F>(&self, id: AssetId, f: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Asset),
    {
        let mut assets = self.assets.lock().unwrap();
        let asset = assets.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        f(asset);
        asset.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl AssetRepository for InMemoryRepository {
    async fn create_record(&self, record: NewAssetRecord) -> Result<AssetId, RepositoryError> {
        self.record(RepoCall::Create(record.clone()));

        if self.failures.create {
            return Err(simulated("storage_key"));
        }
        if self.failures.nil_id {
            return Ok(AssetId(Uuid::nil()));
        }

        let id = AssetId::new();
        let now = Utc::now();
        let asset = Asset {
            id,
            storage_key: record.storage_key,
            storage_url: record.storage_url,
            mime_type: record.mime_type,
            title: record.provisional_title,
            caption: String::new(),
            description: String::new(),
            alt_text: None,
            status: record.status,
            width: None,
            height: None,
            file_size: None,
            created_at: now,
            updated_at: now,
        };
        self.assets.lock().unwrap().insert(id, asset);
        Ok(id)
    }

    async fn update_record_fields(
        &self,
        id: AssetId,
        fields: AssetFieldsUpdate,
    ) -> Result<(), RepositoryError> {
        self.record(RepoCall::UpdateFields(id, fields.clone()));
        if self.failures.fields {
            return Err(simulated("title"));
        }

        self.with_asset(id, |asset| {
            if let Some(title) = fields.title {
                asset.title = title;
            }
            if let Some(caption) = fields.caption {
                asset.caption = caption;
            }
            if let Some(description) = fields.description {
                asset.description = description;
            }
        })
    }

    async fn set_alt_text(&self, id: AssetId, alt_text: &str) -> Result<(), RepositoryError> {
        self.record(RepoCall::SetAltText(id, alt_text.to_string()));
        if self.failures.alt_text {
            return Err(simulated("alt_text"));
        }

        self.with_asset(id, |asset| asset.alt_text = Some(alt_text.to_string()))
    }

    async fn update_attachment_metadata(
        &self,
        id: AssetId,
        metadata: AttachmentMetadata,
    ) -> Result<(), RepositoryError> {
        self.record(RepoCall::Attachment(id, metadata));
        if self.failures.attachment {
            return Err(simulated("width"));
        }

        self.with_asset(id, |asset| {
            if let Some(width) = metadata.width {
                asset.width = Some(width as i32);
            }
            if let Some(height) = metadata.height {
                asset.height = Some(height as i32);
            }
            asset.file_size = Some(metadata.file_size as i64);
        })
    }

    async fn get(&self, id: AssetId) -> Result<Option<Asset>, RepositoryError> {
        Ok(self.assets.lock().unwrap().get(&id).cloned())
    }
}
