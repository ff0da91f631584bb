//! Storage handler trait
//!
//! This module defines the capability set every storage backend implements:
//! store a transient file under a fresh opaque name, fetch it back, delete it.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage name: {0}")]
    InvalidName(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage handler trait
///
/// Handlers are built from their backend configuration once and shared
/// across requests. Each call is independent; a handler never retries on
/// its own behalf beyond what its client library does.
#[async_trait]
pub trait StorageHandler: Send + Sync {
    /// Durably store the bytes found at `source` and return the generated
    /// storage name.
    ///
    /// When [`consumes_source`](Self::consumes_source) is false the source
    /// is left in place and the caller removes it.
    async fn store(&self, source: &Path) -> StorageResult<String>;

    /// Return the complete contents stored under `storage_name`.
    async fn fetch(&self, storage_name: &str) -> StorageResult<Bytes>;

    /// Remove the artifact stored under `storage_name`.
    ///
    /// Whether removing an unknown name succeeds is backend-specific.
    async fn delete(&self, storage_name: &str) -> StorageResult<()>;

    /// Whether `store` takes ownership of the source file (move semantics).
    /// The upload pipeline removes the source itself when this is false.
    fn consumes_source(&self) -> bool;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
