//! Filedock Storage Library
//!
//! This crate provides the storage handler abstraction and its backends:
//! the local filesystem and OpenStack Swift object storage.
//!
//! # Storage names
//!
//! Every stored artifact gets a fresh opaque name generated by the handler
//! (see the `names` module). Names never contain `/` or `..`, so they can be
//! used verbatim as a file name or as an object name inside a container.

pub mod factory;
pub(crate) mod names;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-swift")]
pub mod swift;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use filedock_core::{HandlerOptions, StorageBackend};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-swift")]
pub use swift::SwiftStorage;
pub use traits::{StorageError, StorageHandler, StorageResult};
