//! Test fixtures: small in-memory files.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Ten bytes starting with the PDF magic.
pub const MINIMAL_PDF: &[u8] = b"%PDF-1.4\n\n";

/// JPEG of the given size, solid colour.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([30, 120, 200])));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Jpeg)
        .expect("Failed to encode test JPEG");
    buffer.into_inner()
}

/// Form with one file part.
pub fn file_form(field: &str, data: &[u8], file_name: &str, mime_type: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(file_name.to_string())
        .mime_type(mime_type.to_string());
    MultipartForm::new().add_part(field.to_string(), part)
}
