//! Filedock API Library
//!
//! This crate provides the HTTP adapter of the upload pipeline: multipart
//! spooling, the route table, error responses and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use handlers::identity::CallerIdentity;
pub use state::AppState;
