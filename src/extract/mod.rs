//! Palette extraction from cover art.
//!
//! Two passes: the image is quantized into a handful of weighted clusters,
//! then each swatch slot picks the cluster closest to its lightness and
//! saturation targets.

mod quantize;
mod vibrant;

pub use quantize::{quantize, Cluster};
pub use vibrant::select_swatches;

use image::DynamicImage;

use crate::error::{PreviewError, Result};
use crate::types::Palette;

/// Number of clusters the quantizer reduces an image to.
pub const CLUSTER_COUNT: usize = 16;

/// Extract the swatch palette of a decoded image.
///
/// Never fails; solid or near-monochrome images simply leave slots empty.
pub fn extract_palette(image: &DynamicImage) -> Palette {
    let clusters = quantize(image, CLUSTER_COUNT);
    tracing::debug!(clusters = clusters.len(), "quantized cover image");
    select_swatches(&clusters)
}

/// Decode image bytes, tagging failures with `source_ref`.
pub fn decode_image(bytes: &[u8], source_ref: &str) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| PreviewError::image_load(source_ref, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Colour, Swatch};
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_blue_cover_yields_blue_vibrant() {
        let img = RgbaImage::from_pixel(500, 500, Rgba([0x33, 0x66, 0xCC, 255]));
        let palette = extract_palette(&DynamicImage::ImageRgba8(img));

        let vibrant = palette.get(Swatch::Vibrant).unwrap();
        assert_eq!(vibrant, Colour::rgb(0x33, 0x66, 0xCC));
        let hue = vibrant.to_hsl().hue.into_positive_degrees();
        assert!((200.0..240.0).contains(&hue), "hue {}", hue);
    }

    #[test]
    fn test_blank_image_yields_empty_palette() {
        let img = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));
        assert!(extract_palette(&DynamicImage::ImageRgba8(img)).is_empty());
    }

    #[test]
    fn test_decode_garbage_is_image_load_error() {
        let err = decode_image(b"not an image", "cover.jpg").unwrap_err();
        assert!(matches!(err, PreviewError::ImageLoad { ref source_ref, .. } if source_ref == "cover.jpg"));
    }
}
