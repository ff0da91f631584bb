//! Multipart spooling
//!
//! File parts are streamed chunk by chunk to uuid-named files in the
//! collection's transient directory, so an upload is never held whole in
//! memory. Plain form values are ignored. On any failure every file spooled
//! so far is removed before the error is returned.

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use filedock_core::models::{UploadRequest, UploadedFile};
use filedock_core::{AppError, UploadOptions};
use filedock_processing::remove_transient_file;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// MIME type assumed for a part that declares none.
const DEFAULT_MIMETYPE: &str = "application/octet-stream";

/// Spool every file part of `multipart` and key it by its form field.
pub async fn spool_multipart(
    mut multipart: Multipart,
    options: &UploadOptions,
    owner_id: Option<String>,
) -> Result<UploadRequest, AppError> {
    let dir = options.temp_file_dir();
    tokio::fs::create_dir_all(&dir).await.map_err(|e| {
        AppError::Internal(format!(
            "Unable to create transient directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let mut request = UploadRequest::new(owner_id);

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                discard(request).await;
                return Err(multipart_error(e, options));
            }
        };

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let field_name = field.name().unwrap_or_default().to_string();
        let mimetype = field
            .content_type()
            .unwrap_or(DEFAULT_MIMETYPE)
            .to_string();
        let path = dir.join(uuid::Uuid::new_v4().simple().to_string());

        match write_field(field, &path, options).await {
            Ok(size) => {
                tracing::debug!(
                    field = %field_name,
                    file_name = %file_name,
                    size_bytes = size,
                    path = %path.display(),
                    "Multipart file spooled"
                );
                let file = UploadedFile::new(file_name, mimetype, size, path);
                // Last part wins for a repeated field
                if let Some(previous) = request.insert_file(field_name, file) {
                    remove_transient_file(&previous.path).await;
                }
            }
            Err(e) => {
                remove_transient_file(&path).await;
                discard(request).await;
                return Err(e);
            }
        }
    }

    Ok(request)
}

async fn write_field(
    mut field: Field<'_>,
    path: &Path,
    options: &UploadOptions,
) -> Result<u64, AppError> {
    let io_error = |e: std::io::Error| {
        AppError::Internal(format!("Unable to spool upload to {}: {}", path.display(), e))
    };

    let mut file = tokio::fs::File::create(path).await.map_err(io_error)?;
    let mut size = 0u64;

    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| multipart_error(e, options))?
    {
        size += chunk.len() as u64;
        file.write_all(&chunk).await.map_err(io_error)?;
    }
    file.flush().await.map_err(io_error)?;

    Ok(size)
}

/// A body cut off by the request body limit is a size rejection, anything
/// else a malformed request.
fn multipart_error(err: MultipartError, options: &UploadOptions) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return match options.max_size {
            Some(max) => AppError::PayloadTooLarge(format!("Maximum allowed file size is {}", max)),
            None => AppError::PayloadTooLarge(err.body_text()),
        };
    }
    AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
}

async fn discard(request: UploadRequest) {
    for file in request.into_files() {
        remove_transient_file(&file.path).await;
    }
}
