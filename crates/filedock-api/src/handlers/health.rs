//! Liveness probe.

use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
