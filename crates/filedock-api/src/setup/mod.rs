//! Application setup and initialization
//!
//! Telemetry, the metadata store, the upload pipeline and the router are
//! built here so that `main` stays a thin entry point and tests can build
//! the same router around their own pipeline.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::Result;
use filedock_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment,
        collection = %config.upload.collection,
        "Configuration loaded successfully"
    );

    // Setup metadata persistence
    let metadata = database::setup_metadata_store(&config).await?;

    // Initialize storage, generator and pipeline
    let state = services::initialize_services(&config, metadata)?;

    // Setup routes
    let router = routes::setup_routes(state.clone());

    Ok((state, router))
}
