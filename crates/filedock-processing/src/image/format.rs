use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::error::{ImageFormatHint, UnsupportedError};
use image::{DynamicImage, ImageError, ImageFormat, ImageResult};
use std::io::Write;

/// Formats the resizer can decode.
pub const READABLE_FORMATS: [VariantFormat; 5] = [
    VariantFormat::Jpeg,
    VariantFormat::Png,
    VariantFormat::WebP,
    VariantFormat::Tiff,
    VariantFormat::Gif,
];

/// Formats the resizer can encode.
pub const WRITABLE_FORMATS: [VariantFormat; 3] =
    [VariantFormat::Jpeg, VariantFormat::Png, VariantFormat::WebP];

/// Output format used when the requested or source format is not writable.
pub const DEFAULT_OUTPUT_FORMAT: VariantFormat = VariantFormat::Jpeg;

const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Image formats known to the resizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Gif,
}

impl VariantFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "jpeg" | "jpg" | "pjpeg" => Some(VariantFormat::Jpeg),
            "png" => Some(VariantFormat::Png),
            "webp" => Some(VariantFormat::WebP),
            "tiff" | "tif" => Some(VariantFormat::Tiff),
            "gif" => Some(VariantFormat::Gif),
            _ => None,
        }
    }

    /// Format detected from the leading bytes of an encoded image.
    pub fn detect(data: &[u8]) -> Option<Self> {
        image::guess_format(data).ok().and_then(Self::from_image_format)
    }

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(VariantFormat::Jpeg),
            ImageFormat::Png => Some(VariantFormat::Png),
            ImageFormat::WebP => Some(VariantFormat::WebP),
            ImageFormat::Tiff => Some(VariantFormat::Tiff),
            ImageFormat::Gif => Some(VariantFormat::Gif),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VariantFormat::Jpeg => "jpeg",
            VariantFormat::Png => "png",
            VariantFormat::WebP => "webp",
            VariantFormat::Tiff => "tiff",
            VariantFormat::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> String {
        format!("image/{}", self.name())
    }

    pub fn is_readable(self) -> bool {
        READABLE_FORMATS.contains(&self)
    }

    pub fn is_writable(self) -> bool {
        WRITABLE_FORMATS.contains(&self)
    }

    pub fn to_image_format(self) -> ImageFormat {
        match self {
            VariantFormat::Jpeg => ImageFormat::Jpeg,
            VariantFormat::Png => ImageFormat::Png,
            VariantFormat::WebP => ImageFormat::WebP,
            VariantFormat::Tiff => ImageFormat::Tiff,
            VariantFormat::Gif => ImageFormat::Gif,
        }
    }

    /// Output format of one size: the requested format, else the source
    /// format, replaced by the default when not writable.
    pub fn resolve_output(requested: Option<&str>, source: VariantFormat) -> VariantFormat {
        let candidate = match requested {
            Some(name) => Self::parse(name),
            None => Some(source),
        };

        match candidate {
            Some(format) if format.is_writable() => format,
            _ => {
                tracing::debug!(
                    requested = ?requested,
                    source = source.name(),
                    fallback = DEFAULT_OUTPUT_FORMAT.name(),
                    "Output format not writable, using default"
                );
                DEFAULT_OUTPUT_FORMAT
            }
        }
    }

    /// Encode `img` in this format. `quality` applies to JPEG only; WebP
    /// is written lossless.
    pub fn encode<W: Write>(self, img: &DynamicImage, quality: Option<u8>, writer: W) -> ImageResult<()> {
        match self {
            VariantFormat::Jpeg => {
                let quality = quality.unwrap_or(DEFAULT_JPEG_QUALITY).clamp(1, 100);
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(writer, quality))
            }
            VariantFormat::Png => img.write_with_encoder(PngEncoder::new(writer)),
            VariantFormat::WebP => {
                let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
                rgba.write_with_encoder(WebPEncoder::new_lossless(writer))
            }
            VariantFormat::Tiff | VariantFormat::Gif => Err(ImageError::Unsupported(
                UnsupportedError::from(ImageFormatHint::Exact(self.to_image_format())),
            )),
        }
    }
}

pub fn readable_format_names() -> String {
    READABLE_FORMATS
        .iter()
        .map(|f| f.name())
        .collect::<Vec<_>>()
        .join(", ")
}
