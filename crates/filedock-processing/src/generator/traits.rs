//! Variant generator trait
//!
//! A generator derives zero or more variants from one uploaded file. It
//! never mutates the input and hands back a cleanup callback releasing
//! every scratch resource it created.

use async_trait::async_trait;
use filedock_core::models::{UploadedFile, Variant};
use filedock_core::GeneratorKind;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use thiserror::Error;

/// Variant generation errors
///
/// These are instance-level failures of a whole generation call. The
/// pipeline logs them and continues with zero variants.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Input file has unsupported format {format}. Allowed formats are: {allowed}")]
    UnsupportedInputFormat { format: String, allowed: String },

    #[error("Generator not available: {0}")]
    Unavailable(String),

    #[error("Generation task failed: {0}")]
    Task(String),

    #[cfg(feature = "image")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Releases the scratch resources of one generation call.
///
/// Running it is safe whatever number of variants were produced, and a
/// cleanup that is dropped without running releases nothing beyond what
/// its captured values release on drop.
pub struct VariantCleanup(Option<Box<dyn FnOnce() + Send>>);

impl VariantCleanup {
    pub fn new<F>(cleanup: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        VariantCleanup(Some(Box::new(cleanup)))
    }

    pub fn noop() -> Self {
        VariantCleanup(None)
    }

    pub fn run(mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

impl Debug for VariantCleanup {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_tuple("VariantCleanup")
            .field(&self.0.as_ref().map(|_| "pending"))
            .finish()
    }
}

/// Result of one generation call: the variants in the order they were
/// requested, plus the callback that removes their scratch files.
#[derive(Debug)]
pub struct GeneratedVariants {
    pub variants: Vec<Variant>,
    pub cleanup: VariantCleanup,
}

impl GeneratedVariants {
    pub fn new(variants: Vec<Variant>, cleanup: VariantCleanup) -> Self {
        Self { variants, cleanup }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), VariantCleanup::noop())
    }

    pub fn into_parts(self) -> (Vec<Variant>, VariantCleanup) {
        (self.variants, self.cleanup)
    }
}

/// Variant generator trait
///
/// Generator options are bound when the generator is built, so one
/// instance serves every request of a collection.
#[async_trait]
pub trait VariantGenerator: Send + Sync {
    async fn generate(&self, file: &UploadedFile) -> Result<GeneratedVariants, GeneratorError>;

    fn kind(&self) -> GeneratorKind;
}
