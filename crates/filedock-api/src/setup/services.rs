//! Storage handler, variant generator and upload pipeline initialization

use crate::state::AppState;
use anyhow::Result;
use filedock_core::Config;
use filedock_db::MetadataStore;
use filedock_processing::{create_generator, UploadPipeline};
use filedock_storage::create_storage;
use std::sync::Arc;

/// Build the pipeline of the configured collection and wrap it in the app state.
pub fn initialize_services(
    config: &Config,
    metadata: Arc<dyn MetadataStore>,
) -> Result<Arc<AppState>> {
    let storage = create_storage(config.storage_backend, &config.handler_options)
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;

    let mut pipeline = UploadPipeline::new(config.upload.clone(), storage, metadata);

    if let Some(kind) = config.generator {
        let generator = create_generator(kind, &config.generator_options)
            .map_err(|e| anyhow::anyhow!("Failed to initialize variant generator: {}", e))?;
        pipeline = pipeline.with_generator(generator);
    }

    let state = Arc::new(AppState::new(pipeline));

    tracing::info!(
        collection = %config.upload.collection,
        api_name = %state.api_name,
        backend = %config.storage_backend,
        generator = ?config.generator,
        file_field = %config.upload.file_field,
        max_size = ?config.upload.max_size,
        accept = ?config.upload.accept.as_slice(),
        "Upload pipeline initialized"
    );

    Ok(state)
}
