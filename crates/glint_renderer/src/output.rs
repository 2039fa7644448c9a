//! Film export helpers.
//!
//! The film itself stores linear radiance; display and file formats want
//! sRGB. These helpers convert a [`FilmView`] without touching the
//! accumulation state, so they can run between progressive passes.

use image::RgbaImage;

use crate::accum::FilmView;

/// Convert the film to 8-bit sRGB, row-major RGBA bytes.
pub fn to_srgb8(view: &FilmView<'_>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(view.as_slice().len() * 4);
    for texel in view.as_slice() {
        bytes.extend_from_slice(&texel.to_srgb8());
    }
    bytes
}

/// Write the film to a PNG file.
pub fn save_png(view: &FilmView<'_>, path: impl AsRef<std::path::Path>) -> image::ImageResult<()> {
    let img = RgbaImage::from_fn(view.width(), view.height(), |x, y| {
        image::Rgba(view.pixel(x, y).to_srgb8())
    });
    img.save(path)
}
