#[cfg(feature = "image")]
use crate::image::ImageResizer;
use crate::generator::{GeneratorError, IdentityGenerator, VariantGenerator};
use filedock_core::{GeneratorKind, GeneratorOptions};
use std::sync::Arc;

/// Create the configured variant generator with its options bound
pub fn create_generator(
    kind: GeneratorKind,
    options: &GeneratorOptions,
) -> Result<Arc<dyn VariantGenerator>, GeneratorError> {
    tracing::info!(generator = %kind, "Creating variant generator");

    match kind {
        GeneratorKind::Identity => Ok(Arc::new(IdentityGenerator::new(options.variant_ids.clone()))),

        #[cfg(feature = "image")]
        GeneratorKind::ImageResizer => Ok(Arc::new(ImageResizer::new(options.sizes.clone()))),

        #[cfg(not(feature = "image"))]
        GeneratorKind::ImageResizer => Err(GeneratorError::Unavailable(
            "image resizer not available (image feature not enabled)".to_string(),
        )),
    }
}
