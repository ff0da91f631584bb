//! Filedock Core Library
//!
//! This crate provides the domain models, error types, configuration and
//! selector enums shared by the storage handlers, variant generators, the
//! upload pipeline and the HTTP adapter.

pub mod config;
pub mod constants;
pub mod error;
pub mod generator_types;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AcceptList, Config, UploadOptions};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use generator_types::{Fit, GeneratorKind, GeneratorOptions, Position, SizeSpec};
pub use storage_types::{HandlerOptions, StorageBackend};
