use crate::error::ProcessingError;
use image::RgbImage;
use std::panic::{catch_unwind, AssertUnwindSafe};
use webimg_core::Quality;

/// Encode an RGB image to JPEG with mozjpeg, Huffman tables optimized.
///
/// libjpeg errors surface as panics inside mozjpeg; they are caught here and
/// returned as [`ProcessingError::Encode`].
pub fn encode_jpeg(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, ProcessingError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ProcessingError::Encode("image has no pixels".to_string()));
    }

    let result = catch_unwind(AssertUnwindSafe(|| -> std::io::Result<Vec<u8>> {
        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality.value() as f32);
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(img.as_raw())?;
        comp.finish()
    }));

    match result {
        Ok(Ok(data)) => Ok(data),
        Ok(Err(e)) => Err(ProcessingError::Encode(e.to_string())),
        Err(_) => Err(ProcessingError::Encode("mozjpeg aborted".to_string())),
    }
}
