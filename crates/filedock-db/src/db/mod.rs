//! Metadata repositories
//
// Store abstraction shared by the pipeline
pub mod store;
//
// Implementations
pub mod memory;
pub mod upload;

pub use memory::InMemoryMetadataStore;
pub use store::MetadataStore;
pub use upload::PgUploadRepository;
