//! Application state shared by the handlers.

use filedock_processing::UploadPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: UploadPipeline,
    /// Route prefix the collection is mounted under, without slashes.
    pub api_name: String,
}

impl AppState {
    pub fn new(pipeline: UploadPipeline) -> Self {
        let api_name = pipeline.options().api_name();
        Self { pipeline, api_name }
    }
}
