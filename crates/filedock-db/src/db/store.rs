use filedock_core::models::UploadRecord;
use filedock_core::AppError;
use uuid::Uuid;

/// Trait for upload metadata operations
/// This abstracts the database implementation (PostgreSQL or in-memory)
#[async_trait::async_trait]
pub trait MetadataStore: Send + Sync {
    /// Record `id` of `collection`, if present.
    async fn read_one(&self, collection: &str, id: Uuid) -> Result<Option<UploadRecord>, AppError>;

    async fn insert(&self, collection: &str, record: &UploadRecord) -> Result<(), AppError>;

    /// Returns whether a record was removed.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError>;
}
