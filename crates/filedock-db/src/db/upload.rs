use chrono::{DateTime, Utc};
use filedock_core::models::{UploadRecord, VariantRecord};
use filedock_core::AppError;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

use super::store::MetadataStore;

/// PostgreSQL-backed upload metadata repository
#[derive(Clone)]
pub struct PgUploadRepository {
    pool: PgPool,
}

impl PgUploadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UploadRecordRow {
    id: Uuid,
    name: String,
    owner_id: Option<String>,
    storage_name: String,
    mimetype: String,
    size: i64,
    variants: Json<Vec<VariantRecord>>,
    created_at: DateTime<Utc>,
}

impl From<UploadRecordRow> for UploadRecord {
    fn from(row: UploadRecordRow) -> Self {
        UploadRecord {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            storage_name: row.storage_name,
            mimetype: row.mimetype,
            size: u64::try_from(row.size).unwrap_or_default(),
            variants: row.variants.0,
            created_at: row.created_at,
        }
    }
}

#[async_trait::async_trait]
impl MetadataStore for PgUploadRepository {
    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "upload_records",
        db.operation = "select",
        db.record_id = %id
    ))]
    async fn read_one(&self, collection: &str, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, UploadRecordRow>(
            r#"
            SELECT id, name, owner_id, storage_name, mimetype, size, variants, created_at
            FROM upload_records
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UploadRecord::from))
    }

    #[tracing::instrument(skip(self, record), fields(
        db.system = "postgresql",
        db.table = "upload_records",
        db.operation = "insert",
        db.record_id = %record.id
    ))]
    async fn insert(&self, collection: &str, record: &UploadRecord) -> Result<(), AppError> {
        let size = i64::try_from(record.size)
            .map_err(|_| AppError::InvalidInput(format!("File size {} out of range", record.size)))?;

        sqlx::query(
            r#"
            INSERT INTO upload_records
                (id, collection, name, owner_id, storage_name, mimetype, size, variants, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id)
        .bind(collection)
        .bind(&record.name)
        .bind(&record.owner_id)
        .bind(&record.storage_name)
        .bind(&record.mimetype)
        .bind(size)
        .bind(Json(&record.variants))
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(
        db.system = "postgresql",
        db.table = "upload_records",
        db.operation = "delete",
        db.record_id = %id
    ))]
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM upload_records WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
