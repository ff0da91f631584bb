#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-swift")]
use crate::SwiftStorage;
use crate::{HandlerOptions, StorageBackend, StorageHandler, StorageResult};
#[cfg(not(all(feature = "storage-local", feature = "storage-swift")))]
use crate::StorageError;
use std::sync::Arc;

/// Create a storage handler for the selected backend
///
/// Missing backend settings do not fail here: each handler reports them
/// when an operation runs.
pub fn create_storage(
    backend: StorageBackend,
    options: &HandlerOptions,
) -> StorageResult<Arc<dyn StorageHandler>> {
    tracing::info!(backend = %backend, "Creating storage handler");

    match backend {
        #[cfg(feature = "storage-local")]
        StorageBackend::Local => Ok(Arc::new(LocalStorage::new(options.storage_path.clone()))),

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-swift")]
        StorageBackend::Swift => Ok(Arc::new(SwiftStorage::new(options.clone())?)),

        #[cfg(not(feature = "storage-swift"))]
        StorageBackend::Swift => Err(StorageError::ConfigError(
            "Swift storage backend not available (storage-swift feature not enabled)".to_string(),
        )),
    }
}
