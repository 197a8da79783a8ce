use crate::keys::{generate_storage_key, numbered_filename};
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use sideload_core::mime;
use sideload_core::{FetchedFile, StoredFile};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncReadExt;

/// Give up looking for a free filename after this many numbered variants.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Bytes read from a stored file to confirm its type.
const SNIFF_LEN: usize = 64;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/sideload/media")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:3000/uploads")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Rejects keys that could escape the base storage directory.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    fn validate_filename(filename: &str) -> StorageResult<()> {
        if filename.is_empty()
            || filename == "."
            || filename.contains('/')
            || filename.contains('\\')
            || filename.contains("..")
        {
            return Err(StorageError::InvalidKey(format!(
                "Invalid filename: {}",
                filename
            )));
        }
        Ok(())
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }

    /// Ensure parent directory exists
    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Create the destination file under the first free numbered variant of `filename`.
    async fn create_unique(&self, filename: &str) -> StorageResult<(String, PathBuf, fs::File)> {
        let now = chrono::Utc::now();

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = numbered_filename(filename, attempt);
            let key = generate_storage_key(now, &candidate);
            let path = self.key_to_path(&key)?;
            self.ensure_parent_dir(&path).await?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((key, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    tracing::debug!(key = %key, "Storage key taken, trying next filename");
                    continue;
                }
                Err(e) => {
                    return Err(StorageError::UploadFailed(format!(
                        "Failed to create file {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::UploadFailed(format!(
            "No free filename for {} after {} attempts",
            filename, MAX_NAME_ATTEMPTS
        )))
    }

    async fn sniff_stored(path: &Path) -> StorageResult<&'static str> {
        let mut file = fs::File::open(path).await?;
        let mut head = Vec::with_capacity(SNIFF_LEN);
        (&mut file).take(SNIFF_LEN as u64).read_to_end(&mut head).await?;
        Ok(mime::sniff(&head))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn persist(&self, file: &FetchedFile, filename: &str) -> StorageResult<StoredFile> {
        Self::validate_filename(filename)?;

        let start = std::time::Instant::now();
        let (key, path, mut dest) = self.create_unique(filename).await?;

        let copy_result = async {
            let mut source = fs::File::open(file.path()).await?;
            let bytes = tokio::io::copy(&mut source, &mut dest).await?;
            dest.sync_all().await?;
            Ok::<u64, std::io::Error>(bytes)
        }
        .await;

        let bytes_copied = match copy_result {
            Ok(bytes) => bytes,
            Err(e) => {
                drop(dest);
                if let Err(cleanup_err) = fs::remove_file(&path).await {
                    tracing::warn!(
                        error = %cleanup_err,
                        path = %path.display(),
                        "Failed to remove partially written file"
                    );
                }
                return Err(StorageError::UploadFailed(format!(
                    "Failed to write file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let mime_type = Self::sniff_stored(&path).await?;
        let url = self.generate_url(&key);

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = bytes_copied,
            mime_type = %mime_type,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage persist successful"
        );

        Ok(StoredFile {
            storage_key: key,
            storage_url: url,
            mime_type: mime_type.to_string(),
        })
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage delete successful"
        );

        Ok(())
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(storage_key)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
