use chrono::{DateTime, Utc};
use sideload_core::{
    Asset, AssetFieldsUpdate, AssetId, AssetStatus, AttachmentMetadata, NewAssetRecord,
};
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::setup::connect_pool;
use crate::RepositoryError;

/// Record-keeping operations the importer depends on.
#[async_trait::async_trait]
pub trait AssetRepository: Send + Sync {
    /// Insert a record for a stored file and return its identifier.
    async fn create_record(&self, record: NewAssetRecord) -> Result<AssetId, RepositoryError>;

    /// Overwrite the fields that are `Some`; `None` fields keep their value.
    async fn update_record_fields(
        &self,
        id: AssetId,
        fields: AssetFieldsUpdate,
    ) -> Result<(), RepositoryError>;

    async fn set_alt_text(&self, id: AssetId, alt_text: &str) -> Result<(), RepositoryError>;

    async fn update_attachment_metadata(
        &self,
        id: AssetId,
        metadata: AttachmentMetadata,
    ) -> Result<(), RepositoryError>;

    async fn get(&self, id: AssetId) -> Result<Option<Asset>, RepositoryError>;
}

/// Row shape of the `assets` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AssetRow {
    pub id: Uuid,
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

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Asset {
            id: AssetId(row.id),
            storage_key: row.storage_key,
            storage_url: row.storage_url,
            mime_type: row.mime_type,
            title: row.title,
            caption: row.caption,
            description: row.description,
            alt_text: row.alt_text,
            status: row.status,
            width: row.width,
            height: row.height,
            file_size: row.file_size,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn dimension_to_i32(
    field: &'static str,
    value: Option<u32>,
) -> Result<Option<i32>, RepositoryError> {
    value
        .map(|v| {
            i32::try_from(v).map_err(|_| RepositoryError::InvalidValue {
                field,
                message: format!("{} exceeds the column range", v),
            })
        })
        .transpose()
}

fn file_size_to_i64(value: u64) -> Result<i64, RepositoryError> {
    i64::try_from(value).map_err(|_| RepositoryError::InvalidValue {
        field: "file_size",
        message: format!("{} exceeds the column range", value),
    })
}

/// PostgreSQL-backed asset repository
#[derive(Clone)]
pub struct PgAssetRepository {
    pool: PgPool,
}

impl PgAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url` and wrap it.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, RepositoryError> {
        let pool = connect_pool(database_url, max_connections).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn ensure_updated(id: AssetId, rows_affected: u64) -> Result<(), RepositoryError> {
        if rows_affected == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl AssetRepository for PgAssetRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "assets", db.operation = "insert", storage_key = %record.storage_key))]
    async fn create_record(&self, record: NewAssetRecord) -> Result<AssetId, RepositoryError> {
        let id = AssetId::new();

        let inserted: Uuid = sqlx::query_scalar::<Postgres, Uuid>(
            r#"
            INSERT INTO assets (
                id, storage_key, storage_url, mime_type, title, caption, description,
                status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, '', '', $6, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&record.storage_key)
        .bind(&record.storage_url)
        .bind(&record.mime_type)
        .bind(&record.provisional_title)
        .bind(record.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(
                error = ?e,
                storage_key = %record.storage_key,
                "Failed to insert asset record"
            );
            e
        })?;

        tracing::debug!(asset_id = %inserted, "Asset record created");
        Ok(AssetId(inserted))
    }

    #[tracing::instrument(skip(self, fields), fields(db.table = "assets", db.operation = "update", db.record_id = %id))]
    async fn update_record_fields(
        &self,
        id: AssetId,
        fields: AssetFieldsUpdate,
    ) -> Result<(), RepositoryError> {
        if fields.is_empty() {
            return Ok(());
        }

        let result = sqlx::query(
            r#"
            UPDATE assets
            SET title = COALESCE($2, title),
                caption = COALESCE($3, caption),
                description = COALESCE($4, description),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(fields.title)
        .bind(fields.caption)
        .bind(fields.description)
        .execute(&self.pool)
        .await?;

        Self::ensure_updated(id, result.rows_affected())
    }

    #[tracing::instrument(skip(self, alt_text), fields(db.table = "assets", db.operation = "update", db.record_id = %id))]
    async fn set_alt_text(&self, id: AssetId, alt_text: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE assets
            SET alt_text = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(alt_text)
        .execute(&self.pool)
        .await?;

        Self::ensure_updated(id, result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "update", db.record_id = %id))]
    async fn update_attachment_metadata(
        &self,
        id: AssetId,
        metadata: AttachmentMetadata,
    ) -> Result<(), RepositoryError> {
        let width = dimension_to_i32("width", metadata.width)?;
        let height = dimension_to_i32("height", metadata.height)?;
        let file_size = file_size_to_i64(metadata.file_size)?;

        let result = sqlx::query(
            r#"
            UPDATE assets
            SET width = COALESCE($2, width),
                height = COALESCE($3, height),
                file_size = $4,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(width)
        .bind(height)
        .bind(file_size)
        .execute(&self.pool)
        .await?;

        Self::ensure_updated(id, result.rows_affected())
    }

    #[tracing::instrument(skip(self), fields(db.table = "assets", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: AssetId) -> Result<Option<Asset>, RepositoryError> {
        let row: Option<AssetRow> = sqlx::query_as::<Postgres, AssetRow>(
            r#"
            SELECT id, storage_key, storage_url, mime_type, title, caption, description,
                   alt_text, status, width, height, file_size, created_at, updated_at
            FROM assets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Asset::from))
    }
}
