//! Route configuration and setup.

use crate::api_doc::get_openapi_spec;
use crate::constants::{BINARY_SEGMENT, HEALTH_PATH, MULTIPART_OVERHEAD_BYTES, OPENAPI_PATH};
use crate::handlers::{health, uploads};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Setup all application routes
///
/// The collection is mounted under `/{api_name}`:
/// `POST /{api_name}`, `GET|DELETE /{api_name}/{id}`,
/// `GET /{api_name}/{id}/binary` and `GET /{api_name}/{id}/binary/{variant_id}`.
pub fn setup_routes(state: Arc<AppState>) -> Router {
    let base = format!("/{}", state.api_name);
    let body_limit = body_limit(state.pipeline.options().max_size);

    let upload_routes = Router::new()
        .route(&base, post(uploads::create_upload))
        .route(
            &format!("{}/{{id}}", base),
            get(uploads::get_upload).delete(uploads::delete_upload),
        )
        .route(
            &format!("{}/{{id}}/{}", base, BINARY_SEGMENT),
            get(uploads::download_upload),
        )
        .route(
            &format!("{}/{{id}}/{}/{{variant_id}}", base, BINARY_SEGMENT),
            get(uploads::download_variant),
        )
        .layer(body_limit);

    let owner_collection = &state.pipeline.options().owner_collection;
    let openapi = get_openapi_spec(&state.api_name, owner_collection);

    tracing::info!(
        base = %base,
        owner_collection = %owner_collection,
        "Upload routes mounted"
    );

    Router::new()
        .route(HEALTH_PATH, get(health::liveness_check))
        .route(
            OPENAPI_PATH,
            get(move || {
                let spec = openapi.clone();
                async move { Json(spec) }
            }),
        )
        .merge(upload_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// The configured maximum file size plus multipart framing; unlimited when
/// no maximum is configured.
fn body_limit(max_size: Option<u64>) -> DefaultBodyLimit {
    match max_size {
        Some(max) => {
            let max = usize::try_from(max).unwrap_or(usize::MAX);
            DefaultBodyLimit::max(max.saturating_add(MULTIPART_OVERHEAD_BYTES))
        }
        None => DefaultBodyLimit::disable(),
    }
}
