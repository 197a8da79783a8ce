//! Registration of a fetched file as a media asset
//!
//! Steps run strictly in order: choose a filename, persist, create the record,
//! then the best-effort backfills (attachment metadata, descriptive fields,
//! alt text). Failures before the record exists end the run; failures after
//! it are collected as warnings.

use sideload_core::{
    AssetFieldsUpdate, AssetId, AssetStatus, FetchedFile, ImportError, ImportReport,
    ImportRequest, ImportResult, MetadataField, NewAssetRecord, StoredFile,
};
use sideload_db::AssetRepository;
use sideload_processing::{read_attachment_metadata, select_filename};
use sideload_storage::Storage;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct Registrar {
    storage: Arc<dyn Storage>,
    repository: Arc<dyn AssetRepository>,
    cleanup_on_record_failure: bool,
}

impl Registrar {
    pub fn new(
        storage: Arc<dyn Storage>,
        repository: Arc<dyn AssetRepository>,
        cleanup_on_record_failure: bool,
    ) -> Self {
        Self {
            storage,
            repository,
            cleanup_on_record_failure,
        }
    }

    pub async fn register(
        &self,
        request: &ImportRequest,
        url: &str,
        fetched: &FetchedFile,
    ) -> ImportResult<ImportReport> {
        let filename = select_filename(request.title(), url, fetched.mime_type());

        let stored = self.storage.persist(fetched, &filename).await.map_err(|e| {
            tracing::error!(error = %e, filename = %filename, "Failed to persist fetched file");
            ImportError::PersistFailed(e.to_string())
        })?;

        let asset_id = self.create_record(&stored).await?;

        tracing::info!(
            asset_id = %asset_id,
            storage_key = %stored.storage_key,
            mime_type = %stored.mime_type,
            "Asset record created"
        );

        let mut warnings = Vec::new();

        let metadata =
            read_attachment_metadata(fetched.path().to_path_buf(), fetched.size_bytes()).await;
        if let Err(e) = self
            .repository
            .update_attachment_metadata(asset_id, metadata)
            .await
        {
            warnings.push(ImportError::MetadataUpdateFailed {
                field: MetadataField::Attachment,
                message: e.to_string(),
            });
        }

        let fields = AssetFieldsUpdate::from_non_empty(
            request.title(),
            request.caption(),
            request.description(),
        );
        if !fields.is_empty() {
            if let Err(e) = self.repository.update_record_fields(asset_id, fields).await {
                warnings.push(ImportError::MetadataUpdateFailed {
                    field: MetadataField::Fields,
                    message: e.to_string(),
                });
            }
        }

        if let Some(alt_text) = request.effective_alt_text() {
            if let Err(e) = self.repository.set_alt_text(asset_id, alt_text).await {
                warnings.push(ImportError::MetadataUpdateFailed {
                    field: MetadataField::AltText,
                    message: e.to_string(),
                });
            }
        }

        Ok(ImportReport {
            asset_id,
            filename: stored.filename().to_string(),
            storage_url: stored.storage_url,
            mime_type: stored.mime_type,
            warnings,
        })
    }

    async fn create_record(&self, stored: &StoredFile) -> ImportResult<AssetId> {
        let record = NewAssetRecord {
            storage_key: stored.storage_key.clone(),
            storage_url: stored.storage_url.clone(),
            mime_type: stored.mime_type.clone(),
            provisional_title: provisional_title(stored.filename()),
            status: AssetStatus::Inherit,
        };

        let message = match self.repository.create_record(record).await {
            Ok(id) if !id.is_empty() => return Ok(id),
            Ok(_) => "repository returned an empty identifier".to_string(),
            Err(e) => e.to_string(),
        };

        self.handle_orphan(&stored.storage_key, &message).await;
        Err(ImportError::RecordCreationFailed(message))
    }

    /// The file is stored but has no record.
    async fn handle_orphan(&self, storage_key: &str, reason: &str) {
        if !self.cleanup_on_record_failure {
            tracing::error!(
                storage_key = %storage_key,
                error = %reason,
                "Failed to create asset record, stored file left orphaned"
            );
            return;
        }

        tracing::error!(
            storage_key = %storage_key,
            error = %reason,
            "Failed to create asset record, removing stored file"
        );
        if let Err(cleanup_err) = self.storage.delete(storage_key).await {
            tracing::error!(
                error = %cleanup_err,
                storage_key = %storage_key,
                "Failed to cleanup storage file after record error"
            );
        }
    }
}

/// Stored filename without its extension.
fn provisional_title(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
        .to_string()
}
