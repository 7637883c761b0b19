//! Separable Gaussian blur over single-channel coverage masks.
//!
//! Weights are fixed point (Q16) so results are bit-stable across runs.

use image::GrayImage;

/// Fixed-point one.
const Q16_ONE: u32 = 1 << 16;

/// Blur `mask` with a Gaussian of standard deviation `sigma`.
///
/// The kernel extends to three sigma. Samples past the edge repeat the
/// edge pixel, so callers pad their masks when the edge must stay clear.
pub fn blur_mask(mask: &GrayImage, sigma: f32) -> GrayImage {
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return mask.clone();
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let (width, height) = mask.dimensions();
    let mut tmp = GrayImage::new(width, height);
    let mut out = GrayImage::new(width, height);

    horizontal_pass(mask, &mut tmp, &kernel);
    vertical_pass(&tmp, &mut out, &kernel);
    out
}

/// Kernel half-width for `sigma`, zero when blurring is a no-op.
pub fn kernel_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|w| ((w / sum) * f64::from(Q16_ONE)).round() as u32)
        .collect();

    // Rounding drift goes to the centre tap so the kernel sums to one.
    let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let mid = weights.len() / 2;
    let corrected = i64::from(weights[mid]) + i64::from(Q16_ONE) - total;
    weights[mid] = corrected.clamp(0, i64::from(Q16_ONE)) as u32;
    weights
}

fn horizontal_pass(src: &GrayImage, dst: &mut GrayImage, kernel: &[u32]) {
    let radius = (kernel.len() / 2) as i64;
    let (width, height) = src.dimensions();
    let max_x = i64::from(width) - 1;
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u64;
            for (ki, &weight) in kernel.iter().enumerate() {
                let sx = (i64::from(x) + ki as i64 - radius).clamp(0, max_x) as u32;
                acc += u64::from(weight) * u64::from(src.get_pixel(sx, y).0[0]);
            }
            dst.get_pixel_mut(x, y).0[0] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &GrayImage, dst: &mut GrayImage, kernel: &[u32]) {
    let radius = (kernel.len() / 2) as i64;
    let (width, height) = src.dimensions();
    let max_y = i64::from(height) - 1;
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0u64;
            for (ki, &weight) in kernel.iter().enumerate() {
                let sy = (i64::from(y) + ki as i64 - radius).clamp(0, max_y) as u32;
                acc += u64::from(weight) * u64::from(src.get_pixel(x, sy).0[0]);
            }
            dst.get_pixel_mut(x, y).0[0] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + u64::from(Q16_ONE / 2)) >> 16).min(255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_zero_sigma_is_identity() {
        let mask = GrayImage::from_fn(3, 3, |x, y| Luma([(x * 40 + y) as u8]));
        assert_eq!(blur_mask(&mask, 0.0), mask);
    }

    #[test]
    fn test_constant_mask_is_unchanged() {
        let mask = GrayImage::from_pixel(6, 4, Luma([180]));
        assert_eq!(blur_mask(&mask, 1.5), mask);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        for sigma in [0.5, 1.0, 3.3, 12.0] {
            let kernel = gaussian_kernel_q16(kernel_radius(sigma), sigma);
            assert_eq!(kernel.iter().sum::<u32>(), Q16_ONE);
        }
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut mask = GrayImage::new(9, 9);
        mask.put_pixel(4, 4, Luma([255]));

        let out = blur_mask(&mask, 1.0);

        let lit = out.pixels().filter(|p| p.0[0] > 0).count();
        assert!(lit > 1);
        assert!(out.get_pixel(4, 4).0[0] < 255);
        assert_eq!(out.get_pixel(3, 4), out.get_pixel(5, 4));
        assert_eq!(out.get_pixel(4, 3), out.get_pixel(4, 5));
    }
}
