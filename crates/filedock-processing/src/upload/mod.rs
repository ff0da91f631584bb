//! Upload pipeline: verify → generate variants → store → persist, plus
//! the fetch and delete flows over persisted records.

pub mod cleanup;
pub mod pipeline;
pub mod validator;

pub use cleanup::{remove_transient_file, run_generator_cleanup};
pub use pipeline::UploadPipeline;
pub use validator::{UploadValidator, ValidationError};
