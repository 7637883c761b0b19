//! Radial vignette.

use image::RgbaImage;

use crate::types::Colour;

/// Fade the image towards `tint` with distance from its centre.
///
/// The radius is half the longer side. At distance `d` each pixel keeps
/// `1 - (d / radius) * (strength / 100)` of its colour, clamped to [0, 1],
/// and takes the rest from the tint. `strength` is a percentage.
pub fn apply_vignette(image: &mut RgbaImage, tint: Colour, strength: f32) {
    let (width, height) = image.dimensions();
    let centre_x = width as f32 / 2.0;
    let centre_y = height as f32 / 2.0;
    let radius = centre_x.max(centre_y);
    if radius <= 0.0 {
        return;
    }
    let strength = strength.clamp(0.0, 100.0) / 100.0;
    let tint = tint.to_array();

    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let distance = (x as f32 - centre_x).hypot(y as f32 - centre_y);
        let opacity = (1.0 - distance / radius * strength).clamp(0.0, 1.0);
        for c in 0..3 {
            let v = f32::from(pixel.0[c]) * opacity + f32::from(tint[c]) * (1.0 - opacity);
            pixel.0[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}
