//! Error types module
//!
//! `AppError` is the caller-visible error taxonomy of the upload pipeline.
//! Storage and generator crates keep their own error enums; the pipeline
//! translates them into `AppError` after logging the full detail.
//!
//! `From<sqlx::Error>` is gated behind the `sqlx` feature.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "STORAGE_WRITE_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the caller
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No file found: {0}")]
    MissingFile(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage configuration error: {0}")]
    StorageConfig(String),

    #[error("Storage write error: {0}")]
    StorageWrite(String),

    #[error("Storage read error: {0}")]
    StorageRead(String),

    #[error("Storage delete error: {0}")]
    StorageDelete(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::MissingFile(_) => (400, "FILE_MISSING", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::UnsupportedMediaType(_) => {
            (415, "UNSUPPORTED_MEDIA_TYPE", false, false, LogLevel::Debug)
        }
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::StorageConfig(_) => (500, "STORAGE_CONFIG_ERROR", false, true, LogLevel::Error),
        AppError::StorageWrite(_) => (400, "STORAGE_WRITE_ERROR", true, true, LogLevel::Error),
        AppError::StorageRead(_) => (400, "STORAGE_READ_ERROR", true, true, LogLevel::Error),
        AppError::StorageDelete(_) => (400, "STORAGE_DELETE_ERROR", true, true, LogLevel::Error),
        AppError::Database(_) => (500, "DATABASE_ERROR", true, true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", false, true, LogLevel::Error),
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn client_message(&self) -> String {
        match self {
            AppError::MissingFile(msg)
            | AppError::PayloadTooLarge(msg)
            | AppError::UnsupportedMediaType(msg)
            | AppError::InvalidInput(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::StorageConfig(_) => "Storage backend is not configured".to_string(),
            AppError::StorageWrite(_) => "Unable to store uploaded file".to_string(),
            AppError::StorageRead(_) => "Unable to read stored file".to_string(),
            AppError::StorageDelete(_) => "Unable to delete stored file".to_string(),
            AppError::Database(_) => "A database error occurred".to_string(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }
}

impl AppError {
    /// Variant name, used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MissingFile(_) => "MissingFile",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UnsupportedMediaType(_) => "UnsupportedMediaType",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageConfig(_) => "StorageConfig",
            AppError::StorageWrite(_) => "StorageWrite",
            AppError::StorageRead(_) => "StorageRead",
            AppError::StorageDelete(_) => "StorageDelete",
            AppError::Database(_) => "Database",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Full internal message, for logs and non-production responses
    pub fn detailed_message(&self) -> String {
        self.to_string()
    }
}
