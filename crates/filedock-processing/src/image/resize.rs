use filedock_core::{Fit, Position};
use image::{imageops, DynamicImage, GenericImageView, Rgba, RgbaImage};

/// Requested bounding box; a missing side follows the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResizeDimensions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ResizeDimensions {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        // A zero side is treated as unspecified
        Self {
            width: width.filter(|w| *w > 0),
            height: height.filter(|h| *h > 0),
        }
    }
}

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Scale the image so that it relates to the box as `fit` demands,
    /// cropping or letterboxing around `position` where needed.
    pub fn apply(
        img: &DynamicImage,
        dimensions: ResizeDimensions,
        fit: Fit,
        position: Position,
    ) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();

        let (box_width, box_height) = match (dimensions.width, dimensions.height) {
            (None, None) => return img.clone(),
            (Some(w), Some(h)) => (w, h),
            // One side only: every fit reduces to an aspect-preserving scale
            (Some(_), None) | (None, Some(_)) => {
                let (w, h) = Self::calculate_dimensions(orig_width, orig_height, dimensions);
                return Self::resize_image(img, w, h);
            }
        };

        match fit {
            Fit::Fill => Self::resize_image(img, box_width, box_height),
            Fit::Inside => {
                let (w, h) = Self::scaled(orig_width, orig_height, box_width, box_height, f64::min);
                Self::resize_image(img, w, h)
            }
            Fit::Outside => {
                let (w, h) = Self::scaled(orig_width, orig_height, box_width, box_height, f64::max);
                Self::resize_image(img, w, h)
            }
            Fit::Cover => {
                let (w, h) = Self::scaled(orig_width, orig_height, box_width, box_height, f64::max);
                let resized = Self::resize_image(img, w, h);
                let (x, y) = Self::anchor(position, w.saturating_sub(box_width), h.saturating_sub(box_height));
                resized.crop_imm(x, y, box_width.min(w), box_height.min(h))
            }
            Fit::Contain => {
                let (w, h) = Self::scaled(orig_width, orig_height, box_width, box_height, f64::min);
                let resized = Self::resize_image(img, w, h);
                Self::letterbox(&resized, box_width, box_height, position)
            }
        }
    }

    /// Box for a single requested side, the other following the aspect ratio.
    pub fn calculate_dimensions(
        orig_width: u32,
        orig_height: u32,
        dimensions: ResizeDimensions,
    ) -> (u32, u32) {
        match (dimensions.width, dimensions.height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => {
                let aspect_ratio = orig_height as f64 / orig_width as f64;
                let h = (w as f64 * aspect_ratio).round() as u32;
                (w, h.max(1))
            }
            (None, Some(h)) => {
                let aspect_ratio = orig_width as f64 / orig_height as f64;
                let w = (h as f64 * aspect_ratio).round() as u32;
                (w.max(1), h)
            }
            (None, None) => (orig_width, orig_height),
        }
    }

    fn scaled(
        orig_width: u32,
        orig_height: u32,
        box_width: u32,
        box_height: u32,
        pick: fn(f64, f64) -> f64,
    ) -> (u32, u32) {
        let scale = pick(
            box_width as f64 / orig_width as f64,
            box_height as f64 / orig_height as f64,
        );
        let w = (orig_width as f64 * scale).round() as u32;
        let h = (orig_height as f64 * scale).round() as u32;
        (w.max(1), h.max(1))
    }

    /// Offset of the kept region inside `free_width` x `free_height` of slack.
    pub fn anchor(position: Position, free_width: u32, free_height: u32) -> (u32, u32) {
        let x = match position {
            Position::West | Position::NorthWest | Position::SouthWest => 0,
            Position::East | Position::NorthEast | Position::SouthEast => free_width,
            _ => free_width / 2,
        };
        let y = match position {
            Position::North | Position::NorthWest | Position::NorthEast => 0,
            Position::South | Position::SouthWest | Position::SouthEast => free_height,
            _ => free_height / 2,
        };
        (x, y)
    }

    /// Place the image on an opaque black canvas of the box size.
    fn letterbox(
        img: &DynamicImage,
        box_width: u32,
        box_height: u32,
        position: Position,
    ) -> DynamicImage {
        let (width, height) = img.dimensions();
        let canvas_img = RgbaImage::from_pixel(box_width, box_height, Rgba([0, 0, 0, 255]));
        let mut canvas = DynamicImage::ImageRgba8(canvas_img);

        let (x, y) = Self::anchor(
            position,
            box_width.saturating_sub(width),
            box_height.saturating_sub(height),
        );
        imageops::overlay(&mut canvas, img, x as i64, y as i64);

        canvas
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            imageops::FilterType::CatmullRom
        } else {
            imageops::FilterType::Lanczos3
        }
    }

    /// Resize image to exact dimensions
    pub fn resize_image(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        if (orig_width, orig_height) == (width, height) {
            return img.clone();
        }
        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}
