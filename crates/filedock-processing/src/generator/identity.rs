use super::scratch::{scratch_cleanup, scratch_dir, scratch_file_name};
use super::traits::{GeneratedVariants, GeneratorError, VariantGenerator};
use async_trait::async_trait;
use filedock_core::models::{UploadedFile, Variant};
use filedock_core::GeneratorKind;
use std::collections::HashSet;

/// Produces one byte-identical copy of the input per variant id.
///
/// Copies are named `{variant id}_{original name}`.
#[derive(Debug, Clone, Default)]
pub struct IdentityGenerator {
    variant_ids: Vec<String>,
}

impl IdentityGenerator {
    pub fn new(variant_ids: Vec<String>) -> Self {
        Self { variant_ids }
    }
}

#[async_trait]
impl VariantGenerator for IdentityGenerator {
    async fn generate(&self, file: &UploadedFile) -> Result<GeneratedVariants, GeneratorError> {
        if self.variant_ids.is_empty() {
            return Ok(GeneratedVariants::empty());
        }

        let dir = scratch_dir("filedock-identity-")?;
        let mut seen = HashSet::new();
        let mut variants = Vec::with_capacity(self.variant_ids.len());

        for variant_id in &self.variant_ids {
            if variant_id.is_empty() {
                tracing::warn!("Identity generator: empty variant id ignored");
                continue;
            }
            if !seen.insert(variant_id.as_str()) {
                tracing::warn!(variant_id = %variant_id, "Identity generator: duplicate variant id ignored");
                continue;
            }

            let path = dir.path().join(scratch_file_name());
            match tokio::fs::copy(&file.path, &path).await {
                Ok(size) => variants.push(Variant {
                    variant_id: variant_id.clone(),
                    name: format!("{}_{}", variant_id, file.name),
                    mimetype: file.mimetype.clone(),
                    size,
                    path,
                }),
                Err(e) => tracing::warn!(
                    error = %e,
                    variant_id = %variant_id,
                    "Identity generator: unable to copy input, variant skipped"
                ),
            }
        }

        tracing::debug!(
            file_name = %file.name,
            variant_count = variants.len(),
            "Identity variants generated"
        );

        Ok(GeneratedVariants::new(variants, scratch_cleanup(dir)))
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::Identity
    }
}
