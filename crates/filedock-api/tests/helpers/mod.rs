//! Test helpers: build the router around a local-storage pipeline.
//!
//! Run from workspace root: `cargo test -p filedock-api`. No external
//! services are needed: records live in the in-memory metadata store and
//! artifacts under a temporary directory.

#![allow(dead_code)]

pub mod fixtures;

use axum::{Extension, Router};
use axum_test::TestServer;
use filedock_api::setup::routes;
use filedock_api::{AppState, CallerIdentity};
use filedock_core::UploadOptions;
use filedock_db::InMemoryMetadataStore;
use filedock_processing::{UploadPipeline, VariantGenerator};
use filedock_storage::LocalStorage;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the directories it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub metadata: Arc<InMemoryMetadataStore>,
    pub storage_dir: TempDir,
    pub incoming_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Files currently spooled and not yet cleaned up.
    pub fn pending_transient_files(&self) -> usize {
        count_files(self.incoming_dir.path())
    }

    pub fn stored_files(&self) -> usize {
        count_files(self.storage_dir.path())
    }
}

/// Builder for a test app around one collection.
pub struct TestAppBuilder {
    options: UploadOptions,
    generator: Option<Arc<dyn VariantGenerator>>,
    caller: Option<CallerIdentity>,
}

impl TestAppBuilder {
    pub fn new(options: UploadOptions) -> Self {
        Self {
            options,
            generator: None,
            caller: None,
        }
    }

    pub fn generator(mut self, generator: Arc<dyn VariantGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Authenticate every request as `id`.
    pub fn caller(mut self, id: &str) -> Self {
        self.caller = Some(CallerIdentity::new(id));
        self
    }

    pub fn build(self) -> TestApp {
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        let incoming_dir = TempDir::new().expect("Failed to create incoming dir");

        let mut options = self.options;
        options.temp_file_dir = Some(incoming_dir.path().to_path_buf());

        let storage = Arc::new(LocalStorage::new(Some(storage_dir.path().to_path_buf())));
        let metadata = Arc::new(InMemoryMetadataStore::new());

        let mut pipeline = UploadPipeline::new(options, storage, metadata.clone());
        if let Some(generator) = self.generator {
            pipeline = pipeline.with_generator(generator);
        }

        let mut app: Router = routes::setup_routes(Arc::new(AppState::new(pipeline)));
        if let Some(caller) = self.caller {
            app = app.layer(Extension(caller));
        }

        let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            metadata,
            storage_dir,
            incoming_dir,
        }
    }
}

/// Setup test app with local storage and no generator.
pub fn setup_test_app(options: UploadOptions) -> TestApp {
    TestAppBuilder::new(options).build()
}

fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}
