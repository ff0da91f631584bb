//! Upload collection handlers
//!
//! Paths below use the `/uploads` placeholder; the router mounts them under
//! the configured api name and the served OpenAPI document is rewritten to
//! match (see `api_doc`).

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, Response, StatusCode},
    Extension, Json,
};
use filedock_core::models::{FetchedFile, UploadRecord};
use filedock_core::AppError;
use uuid::Uuid;

use super::identity::CallerIdentity;
use super::multipart::spool_multipart;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

/// Upload a file
///
/// Spools the multipart body, then runs the pipeline: the configured file
/// field is verified against the size and type policy, variants are
/// generated, every artifact is stored and the record is persisted.
#[utoipa::path(
    post,
    path = "/uploads",
    tag = "uploads",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File stored", body = UploadRecord),
        (status = 400, description = "No file under the configured field, or storage failure", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 415, description = "File type not accepted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, identity, multipart),
    fields(collection = %state.pipeline.options().collection, operation = "create_upload")
)]
pub async fn create_upload(
    State(state): State<Arc<AppState>>,
    identity: Option<Extension<CallerIdentity>>,
    multipart: Multipart,
) -> Result<Json<UploadRecord>, HttpAppError> {
    let owner_id = identity.map(|Extension(caller)| caller.id().to_string());
    let request = spool_multipart(multipart, state.pipeline.options(), owner_id).await?;

    let record = state.pipeline.create(request).await?;
    Ok(Json(record))
}

/// Get upload metadata
#[utoipa::path(
    get,
    path = "/uploads/{id}",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Upload record", body = UploadRecord),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "get_upload"))]
pub async fn get_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UploadRecord>, HttpAppError> {
    let id = parse_upload_id(&id)?;
    let record = state.pipeline.read(id).await?;
    Ok(Json(record))
}

/// Delete an upload
///
/// Removes the original and every variant from storage, then the record.
#[utoipa::path(
    delete,
    path = "/uploads/{id}",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Upload deleted", body = UploadRecord),
        (status = 400, description = "Storage failure", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "delete_upload"))]
pub async fn delete_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UploadRecord>, HttpAppError> {
    let id = parse_upload_id(&id)?;
    let record = state.pipeline.delete(id).await?;
    Ok(Json(record))
}

/// Download the original file
#[utoipa::path(
    get,
    path = "/uploads/{id}/binary",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Upload ID")
    ),
    responses(
        (status = 200, description = "Stored file", content_type = "application/octet-stream"),
        (status = 400, description = "Storage failure", body = ErrorResponse),
        (status = 404, description = "Upload not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_upload"))]
pub async fn download_upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, HttpAppError> {
    let id = parse_upload_id(&id)?;
    let fetched = state.pipeline.fetch(id, None).await?;
    binary_response(fetched)
}

/// Download a variant
#[utoipa::path(
    get,
    path = "/uploads/{id}/binary/{variant_id}",
    tag = "uploads",
    params(
        ("id" = Uuid, Path, description = "Upload ID"),
        ("variant_id" = String, Path, description = "Variant ID chosen by the generator configuration")
    ),
    responses(
        (status = 200, description = "Stored variant", content_type = "application/octet-stream"),
        (status = 400, description = "Storage failure", body = ErrorResponse),
        (status = 404, description = "Upload or variant not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "download_variant"))]
pub async fn download_variant(
    State(state): State<Arc<AppState>>,
    Path((id, variant_id)): Path<(String, String)>,
) -> Result<Response<Body>, HttpAppError> {
    let id = parse_upload_id(&id)?;
    let fetched = state.pipeline.fetch(id, Some(&variant_id)).await?;
    binary_response(fetched)
}

/// A malformed id cannot name a record.
fn parse_upload_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("Upload {} not found", raw)))
}

fn binary_response(fetched: FetchedFile) -> Result<Response<Body>, HttpAppError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, fetched.mimetype.as_str())
        .header(header::CONTENT_DISPOSITION, fetched.content_disposition())
        .header(header::CACHE_CONTROL, fetched.cache_control())
        .header(header::CONTENT_LENGTH, fetched.data.len())
        .body(Body::from(fetched.data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
