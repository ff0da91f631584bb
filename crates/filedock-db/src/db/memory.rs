use filedock_core::models::UploadRecord;
use filedock_core::AppError;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::MetadataStore;

/// Process-local metadata store keyed by collection and record id.
#[derive(Debug, Default)]
pub struct InMemoryMetadataStore {
    records: RwLock<HashMap<(String, Uuid), UploadRecord>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl MetadataStore for InMemoryMetadataStore {
    async fn read_one(&self, collection: &str, id: Uuid) -> Result<Option<UploadRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records.get(&(collection.to_string(), id)).cloned())
    }

    async fn insert(&self, collection: &str, record: &UploadRecord) -> Result<(), AppError> {
        let mut records = self.records.write().await;
        let key = (collection.to_string(), record.id);
        if records.contains_key(&key) {
            return Err(AppError::Database(format!(
                "Record {} already exists in {}",
                record.id, collection
            )));
        }
        records.insert(key, record.clone());
        Ok(())
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        Ok(records.remove(&(collection.to_string(), id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filedock_core::models::StoredArtifact;

    fn record() -> UploadRecord {
        UploadRecord::from_artifacts(
            Some("account-1".to_string()),
            StoredArtifact {
                storage_name: "abc".to_string(),
                name: "doc.pdf".to_string(),
                mimetype: "application/pdf".to_string(),
                size: 12,
            },
            vec![],
        )
    }

    #[tokio::test]
    async fn test_insert_read_delete() {
        let store = InMemoryMetadataStore::new();
        let record = record();

        store.insert("uploads", &record).await.unwrap();
        assert_eq!(store.read_one("uploads", record.id).await.unwrap(), Some(record.clone()));

        assert!(store.delete("uploads", record.id).await.unwrap());
        assert!(!store.delete("uploads", record.id).await.unwrap());
        assert!(store.read_one("uploads", record.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let store = InMemoryMetadataStore::new();
        let record = record();

        store.insert("uploads", &record).await.unwrap();
        assert!(store.read_one("avatars", record.id).await.unwrap().is_none());
        assert!(!store.delete("avatars", record.id).await.unwrap());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryMetadataStore::new();
        let record = record();

        store.insert("uploads", &record).await.unwrap();
        let err = store.insert("uploads", &record).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
