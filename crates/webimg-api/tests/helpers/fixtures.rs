//! Test fixtures: small encoded images and multipart parts.

use axum_test::multipart::Part;
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;

fn encode(img: image::DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).expect("encode fixture");
    buffer.into_inner()
}

/// Opaque 8x8 JPEG.
pub fn create_test_jpeg() -> Vec<u8> {
    encode(
        RgbImage::from_pixel(8, 8, Rgb([40, 120, 200])).into(),
        ImageFormat::Jpeg,
    )
}

/// Fully transparent 4x4 PNG.
pub fn create_transparent_png() -> Vec<u8> {
    encode(
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])).into(),
        ImageFormat::Png,
    )
}

pub fn image_part(bytes: Vec<u8>, file_name: &str, mime: &str) -> Part {
    Part::bytes(bytes::Bytes::from(bytes))
        .file_name(file_name.to_string())
        .mime_type(mime.to_string())
}

pub fn csv_part(content: &str, file_name: &str) -> Part {
    Part::bytes(bytes::Bytes::from(content.to_string()))
        .file_name(file_name.to_string())
        .mime_type("text/csv")
}
