use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use uuid::Uuid;

/// Identifier of a persisted asset record.
///
/// Assigned by the repository; the nil UUID is never a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct AssetId(pub Uuid);

impl AssetId {
    pub fn new() -> Self {
        AssetId(Uuid::new_v4())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_nil()
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        self.0.fmt(f)
    }
}

impl From<Uuid> for AssetId {
    fn from(id: Uuid) -> Self {
        AssetId(id)
    }
}

/// Publication status of an asset record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "asset_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    /// Hidden; visibility follows whatever the asset is attached to.
    Inherit,
}

/// A persisted media asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub storage_key: String,
    pub storage_url: String,
    pub mime_type: String,
    pub title: String,
    pub caption: String,
    pub description: String,
    pub alt_text: Option<String>,
    pub status: AssetStatus,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub file_size: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values used to create a record for a freshly stored file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssetRecord {
    pub storage_key: String,
    pub storage_url: String,
    pub mime_type: String,
    pub provisional_title: String,
    pub status: AssetStatus,
}

/// Descriptive fields to overwrite. `None` leaves the record's value as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFieldsUpdate {
    pub title: Option<String>,
    /// Short text shown with the asset (excerpt).
    pub caption: Option<String>,
    /// Long-form body text.
    pub description: Option<String>,
}

impl AssetFieldsUpdate {
    /// Build an update carrying only the non-empty values.
    pub fn from_non_empty(title: &str, caption: &str, description: &str) -> Self {
        let keep = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            title: keep(title),
            caption: keep(caption),
            description: keep(description),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.caption.is_none() && self.description.is_none()
    }
}

/// Technical metadata derived from the stored file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub file_size: u64,
}
