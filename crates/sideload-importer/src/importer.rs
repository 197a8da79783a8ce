use crate::fetcher::Fetcher;
use crate::registrar::Registrar;
use crate::url;
use sideload_core::{
    AssetId, ErrorMetadata, ImportError, ImportReport, ImportRequest, ImportResult,
    ImporterConfig, LogLevel,
};
use sideload_db::AssetRepository;
use sideload_processing::{MediaValidator, ValidationError};
use sideload_storage::Storage;
use std::sync::Arc;

/// A configured import, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterHandle {
    url: String,
    request: ImportRequest,
}

impl ImporterHandle {
    /// The normalized URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn request(&self) -> &ImportRequest {
        &self.request
    }
}

/// Remote image importer
///
/// Holds no per-run state; one instance can serve any number of runs,
/// including concurrent ones when shared behind an `Arc`.
pub struct Importer {
    config: ImporterConfig,
    validator: MediaValidator,
    fetcher: Arc<dyn Fetcher>,
    registrar: Registrar,
}

impl Importer {
    pub fn new(
        config: ImporterConfig,
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<dyn Storage>,
        repository: Arc<dyn AssetRepository>,
    ) -> Self {
        let validator = MediaValidator::from_config(&config);
        let registrar = Registrar::new(storage, repository, config.cleanup_on_record_failure);
        Self {
            config,
            validator,
            fetcher,
            registrar,
        }
    }

    pub fn config(&self) -> &ImporterConfig {
        &self.config
    }

    /// Normalize the request's URL. Performs no I/O.
    pub fn configure(&self, request: ImportRequest) -> ImporterHandle {
        ImporterHandle {
            url: url::normalize(request.url()),
            request,
        }
    }

    /// Run the import and return the new asset's identifier. Best-effort
    /// failures are logged.
    pub async fn run(&self, handle: &ImporterHandle) -> ImportResult<AssetId> {
        let report = self.run_detailed(handle).await?;
        for warning in &report.warnings {
            log_import_error(warning, handle.url());
        }
        Ok(report.asset_id)
    }

    /// Run the import and return the full report, warnings included.
    #[tracing::instrument(skip(self, handle), fields(url = %handle.url()))]
    pub async fn run_detailed(&self, handle: &ImporterHandle) -> ImportResult<ImportReport> {
        let start = std::time::Instant::now();

        let result = self.execute(handle).await;
        match &result {
            Ok(report) => tracing::info!(
                asset_id = %report.asset_id,
                filename = %report.filename,
                mime_type = %report.mime_type,
                warnings = report.warnings.len(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Import completed"
            ),
            Err(e) => log_import_error(e, handle.url()),
        }
        result
    }

    /// `configure` followed by `run`.
    pub async fn import(&self, request: ImportRequest) -> ImportResult<AssetId> {
        let handle = self.configure(request);
        self.run(&handle).await
    }

    async fn execute(&self, handle: &ImporterHandle) -> ImportResult<ImportReport> {
        let url = handle.url();
        url::parse_http_url(url).map_err(ImportError::InvalidUrl)?;

        let fetched = self.fetcher.fetch(url, self.config.fetch_timeout).await?;

        self.validator
            .validate_all(fetched.mime_type(), fetched.size_bytes())
            .map_err(validation_to_import_error)?;

        tracing::debug!(
            mime_type = %fetched.mime_type(),
            size_bytes = fetched.size_bytes(),
            "Fetched file accepted"
        );

        self.registrar
            .register(handle.request(), url, &fetched)
            .await
    }
}

fn validation_to_import_error(err: ValidationError) -> ImportError {
    match err {
        ValidationError::InvalidContentType { content_type, .. } => ImportError::UnsupportedType {
            mime_type: content_type,
        },
        other => ImportError::FetchFailed(other.to_string()),
    }
}

fn log_import_error(err: &ImportError, url: &str) {
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(
            error = %err,
            error_code = err.error_code(),
            url = %url,
            "Import rejected"
        ),
        LogLevel::Warn => tracing::warn!(
            error = %err,
            error_code = err.error_code(),
            url = %url,
            "Import step did not complete"
        ),
        LogLevel::Error => tracing::error!(
            error = %err,
            error_code = err.error_code(),
            url = %url,
            "Import failed"
        ),
    }
}
