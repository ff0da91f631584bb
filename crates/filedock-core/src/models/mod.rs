//! Domain models of the upload pipeline.
//!
//! `UploadedFile` and `Variant` are request-scoped and point at transient
//! files; `UploadRecord` is what gets persisted once every artifact is stored.

mod fetch;
mod record;
mod upload;
mod variant;

pub use fetch::FetchedFile;
pub use record::{StoredArtifact, UploadRecord, VariantRecord};
pub use upload::{UploadRequest, UploadedFile};
pub use variant::Variant;
