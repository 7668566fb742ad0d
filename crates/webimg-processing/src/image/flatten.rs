use image::{DynamicImage, Rgb, RgbImage};

/// Produce an opaque RGB image.
///
/// Images with an alpha channel (RGBA, luma+alpha, and palettes with a tRNS
/// chunk once decoded) are blended against white; everything else is converted
/// directly.
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([blend(r, a), blend(g, a), blend(b, a)])
    })
}

#[inline]
fn blend(channel: u8, alpha: u8) -> u8 {
    let c = channel as u32;
    let a = alpha as u32;
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}
