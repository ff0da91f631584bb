use crate::names::{generate_storage_name, validate_storage_name};
use crate::traits::{StorageError, StorageHandler, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage handler
///
/// Artifacts are moved into the root directory under their storage name.
/// Deleting an unknown name succeeds.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    root: Option<PathBuf>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `root` - Directory artifacts are stored in (e.g., "/var/lib/filedock").
    ///   Without one, `store` falls back to the working directory and
    ///   `fetch`/`delete` fail with a configuration error.
    pub fn new(root: Option<PathBuf>) -> Self {
        LocalStorage { root }
    }

    fn configured_root(&self, operation: &str) -> StorageResult<&Path> {
        self.root.as_deref().ok_or_else(|| {
            tracing::error!(
                operation = operation,
                "Local storage folder not specified, set storagePath to your storage folder"
            );
            StorageError::ConfigError(
                "local storage folder not specified (storagePath)".to_string(),
            )
        })
    }

    fn artifact_path(root: &Path, storage_name: &str) -> StorageResult<PathBuf> {
        validate_storage_name(storage_name)?;
        Ok(root.join(storage_name))
    }
}

/// Rename, falling back to copy + remove when the source sits on another
/// filesystem.
async fn move_file(source: &Path, destination: &Path) -> StorageResult<()> {
    let rename_err = match fs::rename(source, destination).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    fs::copy(source, destination).await.map_err(|e| {
        StorageError::WriteFailed(format!(
            "Failed to move {} to {}: {} (rename: {})",
            source.display(),
            destination.display(),
            e,
            rename_err
        ))
    })?;

    if let Err(e) = fs::remove_file(source).await {
        tracing::warn!(
            error = %e,
            path = %source.display(),
            "Unable to remove source after copy"
        );
    }

    Ok(())
}

#[async_trait]
impl StorageHandler for LocalStorage {
    async fn store(&self, source: &Path) -> StorageResult<String> {
        let root = match &self.root {
            Some(root) => root.clone(),
            None => {
                tracing::warn!(
                    "Local storage folder not specified, using \"./\" instead. \
                     Set storagePath to your storage folder"
                );
                PathBuf::from(".")
            }
        };

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let storage_name = generate_storage_name();
        let destination = root.join(&storage_name);
        let start = std::time::Instant::now();

        move_file(source, &destination).await?;

        tracing::info!(
            path = %destination.display(),
            storage_name = %storage_name,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage store successful"
        );

        Ok(storage_name)
    }

    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes> {
        let root = self.configured_root("fetch")?;
        let path = Self::artifact_path(root, storage_name)?;
        let start = std::time::Instant::now();

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(storage_name.to_string()));
        }

        let data = fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            storage_name = %storage_name,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage fetch successful"
        );

        Ok(Bytes::from(data))
    }

    async fn delete(&self, storage_name: &str) -> StorageResult<()> {
        let root = self.configured_root("delete")?;
        let path = Self::artifact_path(root, storage_name)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            tracing::debug!(storage_name = %storage_name, "Local artifact already absent");
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            storage_name = %storage_name,
            "Local storage delete successful"
        );

        Ok(())
    }

    fn consumes_source(&self) -> bool {
        true
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
