//! Filedock Processing Library
//!
//! This crate provides the variant generators (identity copies and the
//! image resizer) and the upload pipeline that verifies an uploaded file,
//! derives its variants, stores every artifact and persists the record.

pub mod generator;
#[cfg(feature = "image")]
pub mod image;
pub mod upload;

// Re-export commonly used types
pub use generator::{
    create_generator, GeneratedVariants, GeneratorError, IdentityGenerator, VariantCleanup,
    VariantGenerator,
};
#[cfg(feature = "image")]
pub use self::image::{ImageResize, ImageResizer, ResizeDimensions, VariantFormat};
pub use upload::{remove_transient_file, UploadPipeline, UploadValidator, ValidationError};
