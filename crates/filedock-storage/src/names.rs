//! Storage name generation shared by every backend.

use crate::traits::{StorageError, StorageResult};
use uuid::Uuid;

/// Generate a fresh opaque storage name.
pub fn generate_storage_name() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Reject names that could escape the storage root or container.
pub fn validate_storage_name(storage_name: &str) -> StorageResult<()> {
    if storage_name.is_empty()
        || storage_name.contains("..")
        || storage_name.contains('/')
        || storage_name.contains('\\')
    {
        return Err(StorageError::InvalidName(storage_name.to_string()));
    }
    Ok(())
}
