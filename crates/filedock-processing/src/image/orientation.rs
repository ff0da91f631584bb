use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader, ImageResult};
use std::io::Cursor;

/// Image orientation handling
pub struct ImageOrientation;

impl ImageOrientation {
    /// Decode `data` and rotate or flip it upright according to its EXIF
    /// orientation. Unreadable orientation metadata is ignored.
    pub fn decode_upright(data: &[u8]) -> ImageResult<DynamicImage> {
        let mut decoder = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .into_decoder()?;

        let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
        let mut img = DynamicImage::from_decoder(decoder)?;

        if orientation != Orientation::NoTransforms {
            tracing::debug!(orientation = ?orientation, "Applying EXIF orientation");
            img.apply_orientation(orientation);
        }

        Ok(img)
    }
}
