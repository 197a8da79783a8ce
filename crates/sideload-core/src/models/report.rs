use crate::error::ImportError;
use crate::models::AssetId;

/// Outcome of a successful import.
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub asset_id: AssetId,
    /// Filename the file was stored under.
    pub filename: String,
    pub storage_url: String,
    pub mime_type: String,
    /// Best-effort steps that did not complete; the asset exists regardless.
    pub warnings: Vec<ImportError>,
}

impl ImportReport {
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}
