//! Image resizer generator
//!
//! One resized and re-encoded variant per size specification, produced
//! sequentially so the variants keep the order of the specifications.

use super::format::{readable_format_names, VariantFormat};
use super::orientation::ImageOrientation;
use super::resize::{ImageResize, ResizeDimensions};
use crate::generator::naming::render_variant_name;
use crate::generator::scratch::{scratch_cleanup, scratch_dir, scratch_file_name};
use crate::generator::{GeneratedVariants, GeneratorError, VariantGenerator};
use async_trait::async_trait;
use filedock_core::models::{UploadedFile, Variant};
use filedock_core::{GeneratorKind, SizeSpec};
use image::DynamicImage;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ImageResizer {
    sizes: Vec<SizeSpec>,
}

impl ImageResizer {
    pub fn new(sizes: Vec<SizeSpec>) -> Self {
        Self { sizes }
    }
}

#[async_trait]
impl VariantGenerator for ImageResizer {
    async fn generate(&self, file: &UploadedFile) -> Result<GeneratedVariants, GeneratorError> {
        let data = tokio::fs::read(&file.path).await?;

        // The content decides, whatever MIME type the client declared
        let source_format = VariantFormat::detect(&data)
            .filter(|format| format.is_readable())
            .ok_or_else(|| GeneratorError::UnsupportedInputFormat {
                format: file.mimetype.clone(),
                allowed: readable_format_names(),
            })?;

        if self.sizes.is_empty() {
            return Ok(GeneratedVariants::empty());
        }

        let start = std::time::Instant::now();
        let dir = scratch_dir("filedock-resizer-")?;

        let sizes = self.sizes.clone();
        let file_name = file.name.clone();
        let dir_path = dir.path().to_path_buf();

        let variants = tokio::task::spawn_blocking(move || {
            render_variants(&data, &sizes, source_format, &file_name, &dir_path)
        })
        .await
        .map_err(|e| GeneratorError::Task(e.to_string()))??;

        tracing::info!(
            file_name = %file.name,
            source_format = source_format.name(),
            variant_count = variants.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image variants generated"
        );

        Ok(GeneratedVariants::new(variants, scratch_cleanup(dir)))
    }

    fn kind(&self) -> GeneratorKind {
        GeneratorKind::ImageResizer
    }
}

/// Decode once, then render every size specification in order. A size
/// without id, with a repeated id or failing to render is skipped.
fn render_variants(
    data: &[u8],
    sizes: &[SizeSpec],
    source_format: VariantFormat,
    file_name: &str,
    dir: &Path,
) -> Result<Vec<Variant>, GeneratorError> {
    let img = ImageOrientation::decode_upright(data)?;
    let mut seen = HashSet::new();
    let mut variants = Vec::with_capacity(sizes.len());

    for spec in sizes {
        let Some(variant_id) = spec.id.as_deref().filter(|id| !id.is_empty()) else {
            tracing::warn!("Image resizer: each size specification shall provide an 'id' field, size ignored");
            continue;
        };
        if !seen.insert(variant_id) {
            tracing::warn!(variant_id = %variant_id, "Image resizer: duplicate variant id, size ignored");
            continue;
        }

        match render_variant(&img, spec, variant_id, source_format, file_name, dir) {
            Ok(variant) => variants.push(variant),
            Err(e) => tracing::warn!(
                error = %e,
                variant_id = %variant_id,
                "Image resizer: unable to render size, size ignored"
            ),
        }
    }

    Ok(variants)
}

fn render_variant(
    img: &DynamicImage,
    spec: &SizeSpec,
    variant_id: &str,
    source_format: VariantFormat,
    file_name: &str,
    dir: &Path,
) -> Result<Variant, GeneratorError> {
    let format = VariantFormat::resolve_output(spec.format.as_deref(), source_format);
    let resized = ImageResize::apply(
        img,
        ResizeDimensions::new(spec.width, spec.height),
        spec.fit,
        spec.position,
    );

    let path: PathBuf = dir.join(scratch_file_name());
    let mut writer = BufWriter::new(File::create(&path)?);
    format.encode(&resized, spec.quality, &mut writer)?;
    writer.flush()?;
    drop(writer);

    let size = std::fs::metadata(&path)?.len();

    Ok(Variant {
        variant_id: variant_id.to_string(),
        name: render_variant_name(&spec.name_format, file_name),
        mimetype: format.mime_type(),
        size,
        path,
    })
}
