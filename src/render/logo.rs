//! Logo mark loading and recolouring.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;

use crate::error::{PreviewError, Result};
use crate::types::Colour;

/// Load the logo mark. Only its alpha channel matters.
pub fn load_logo(path: &Path) -> Result<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| PreviewError::image_load(path.display().to_string(), e))
}

/// Scale the logo to `width` x `height` and paint every visible pixel
/// `colour`, keeping its alpha.
pub fn recolour_logo(logo: &RgbaImage, width: u32, height: u32, colour: Colour) -> RgbaImage {
    let mut scaled = imageops::resize(logo, width.max(1), height.max(1), FilterType::Triangle);
    let [r, g, b] = colour.to_array();
    for pixel in scaled.pixels_mut() {
        if pixel.0[3] > 0 {
            pixel.0[0] = r;
            pixel.0[1] = g;
            pixel.0[2] = b;
        }
    }
    scaled
}
