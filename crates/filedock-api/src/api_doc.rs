//! OpenAPI documentation.
//! Handler annotations use the `/uploads` placeholder (utoipa requires
//! compile-time literals); paths are rewritten to the configured api name
//! in the served document.

use utoipa::openapi::{RefOr, Schema};
use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use filedock_core::models;

/// Placeholder prefix used in handler path annotations.
const OPENAPI_PATH_PLACEHOLDER: &str = "/uploads";

/// Transforms path keys in the OpenAPI spec from placeholder to the mounted prefix.
fn transform_openapi_paths(spec: &mut utoipa::openapi::OpenApi, api_name: &str) {
    let replacement = format!("/{}", api_name);
    if OPENAPI_PATH_PLACEHOLDER == replacement {
        return;
    }
    let path_map = std::mem::take(&mut spec.paths.paths);
    for (key, item) in path_map {
        let new_key = key.replacen(OPENAPI_PATH_PLACEHOLDER, &replacement, 1);
        spec.paths.paths.insert(new_key, item);
    }
}

/// Names the collection `ownerId` refers to on the record schema.
fn describe_owner(spec: &mut utoipa::openapi::OpenApi, owner_collection: &str) {
    let Some(components) = spec.components.as_mut() else {
        return;
    };
    let Some(RefOr::T(Schema::Object(record))) = components.schemas.get_mut("UploadRecord") else {
        return;
    };
    if let Some(RefOr::T(Schema::Object(owner))) = record.properties.get_mut("ownerId") {
        owner.description = Some(format!(
            "Authenticated caller at store time, if any. Id of a `{}` record.",
            owner_collection
        ));
    }
}

/// Returns the OpenAPI spec with its paths mounted under `api_name`.
pub fn get_openapi_spec(api_name: &str, owner_collection: &str) -> utoipa::openapi::OpenApi {
    let mut spec = ApiDoc::openapi();
    transform_openapi_paths(&mut spec, api_name);
    describe_owner(&mut spec, owner_collection);
    spec
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filedock API",
        version = "0.1.0",
        description = "File upload API: stores an uploaded file and its generated variants in the configured storage backend and serves them back by id."
    ),
    paths(
        handlers::uploads::create_upload,
        handlers::uploads::get_upload,
        handlers::uploads::delete_upload,
        handlers::uploads::download_upload,
        handlers::uploads::download_variant,
    ),
    components(
        schemas(
            models::UploadRecord,
            models::VariantRecord,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "uploads", description = "Upload, fetch and delete files of the collection")
    )
)]
struct ApiDoc;
