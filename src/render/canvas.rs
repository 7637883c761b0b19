//! RGBA drawing surface.
//!
//! The canvas is always opaque: it starts black and every operation blends
//! onto it, so pixel alpha stays at 255 throughout.

use image::imageops::{self, FilterType};
use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::types::Colour;

use super::blur::{blur_mask, kernel_radius};
use super::layout::Rect;

pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// A square opaque black canvas.
    pub fn new(size: u32) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Raw pixel access for per-pixel passes.
    pub fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.pixels
    }

    /// Fill the whole canvas with a top-to-bottom gradient, sampled at pixel
    /// centres.
    pub fn fill_vertical_gradient(&mut self, top: Colour, bottom: Colour) {
        let height = self.height() as f32;
        let (from, to) = (top.to_array(), bottom.to_array());
        for (y, row) in self.pixels.enumerate_rows_mut() {
            let t = (y as f32 + 0.5) / height;
            let mut rgba = [0, 0, 0, 255];
            for c in 0..3 {
                let v = f32::from(from[c]) + (f32::from(to[c]) - f32::from(from[c])) * t;
                rgba[c] = v.round().clamp(0.0, 255.0) as u8;
            }
            for (_, _, pixel) in row {
                *pixel = Rgba(rgba);
            }
        }
    }

    /// Blend `colour` over one pixel. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, colour: Colour, alpha: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.width()) || y >= i64::from(self.height()) {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        *dst = Rgba(over(dst.0, colour.to_array(), alpha));
    }

    /// Fill a rectangle, anti-aliasing partially covered edge pixels.
    pub fn fill_rect(&mut self, rect: Rect, colour: Colour, alpha: f32) {
        let x0 = rect.x.floor().max(0.0) as i64;
        let y0 = rect.y.floor().max(0.0) as i64;
        let x1 = rect.right().ceil().min(self.width() as f32) as i64;
        let y1 = rect.bottom().ceil().min(self.height() as f32) as i64;

        for y in y0..y1 {
            let cover_y = coverage(y as f32, rect.y, rect.bottom());
            for x in x0..x1 {
                let cover_x = coverage(x as f32, rect.x, rect.right());
                self.blend_pixel(x, y, colour, alpha * cover_x * cover_y);
            }
        }
    }

    /// Stroke a rectangle's outline. The stroke is centred on the path.
    pub fn stroke_rect(&mut self, path: Rect, line_width: f32, colour: Colour) {
        if line_width <= 0.0 {
            return;
        }
        let outer = path.outset(line_width / 2.0);
        let inner = path.outset(-line_width / 2.0);
        // Four non-overlapping bands: top and bottom span the full width.
        let bands = [
            Rect::new(outer.x, outer.y, outer.width, inner.y - outer.y),
            Rect::new(outer.x, inner.bottom(), outer.width, outer.bottom() - inner.bottom()),
            Rect::new(outer.x, inner.y, inner.x - outer.x, inner.height),
            Rect::new(inner.right(), inner.y, outer.right() - inner.right(), inner.height),
        ];
        for band in bands {
            self.fill_rect(band, colour, 1.0);
        }
    }

    /// Paint a blurred silhouette of `rect`, as a zero-offset drop shadow.
    pub fn draw_shadow(&mut self, rect: Rect, sigma: f32, colour: Colour, alpha: f32) {
        let pad = kernel_radius(sigma) as f32 + 1.0;
        let origin_x = (rect.x - pad).floor();
        let origin_y = (rect.y - pad).floor();
        let width = (rect.right() + pad).ceil() - origin_x;
        let height = (rect.bottom() + pad).ceil() - origin_y;

        let local = Rect::new(rect.x - origin_x, rect.y - origin_y, rect.width, rect.height);
        let mask = GrayImage::from_fn(width as u32, height as u32, |x, y| {
            let cover = coverage(x as f32, local.x, local.right())
                * coverage(y as f32, local.y, local.bottom());
            Luma([(cover * 255.0).round() as u8])
        });
        let mask = blur_mask(&mask, sigma);

        for (x, y, value) in mask.enumerate_pixels() {
            if value.0[0] == 0 {
                continue;
            }
            self.blend_pixel(
                origin_x as i64 + i64::from(x),
                origin_y as i64 + i64::from(y),
                colour,
                alpha * f32::from(value.0[0]) / 255.0,
            );
        }
    }

    /// Draw `image` scaled into `rect`, snapped to whole pixels and
    /// composited by its own alpha.
    pub fn draw_image(&mut self, image: &RgbaImage, rect: Rect) {
        let width = rect.width.round().max(1.0) as u32;
        let height = rect.height.round().max(1.0) as u32;
        let scaled;
        let image = if image.dimensions() == (width, height) {
            image
        } else {
            scaled = imageops::resize(image, width, height, FilterType::Lanczos3);
            &scaled
        };

        let (left, top) = (rect.x.round() as i64, rect.y.round() as i64);
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            if a == 0 {
                continue;
            }
            self.blend_pixel(
                left + i64::from(x),
                top + i64::from(y),
                Colour::rgb(r, g, b),
                f32::from(a) / 255.0,
            );
        }
    }
}

/// Fraction of the unit pixel span starting at `p` that lies in `lo..hi`.
fn coverage(p: f32, lo: f32, hi: f32) -> f32 {
    (hi.min(p + 1.0) - lo.max(p)).clamp(0.0, 1.0)
}

/// Straight-alpha source over an opaque destination.
fn over(dst: [u8; 4], src: [u8; 3], alpha: f32) -> [u8; 4] {
    let alpha = alpha.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return dst;
    }
    let mut out = [0, 0, 0, 255];
    for c in 0..3 {
        let v = f32::from(src[c]) * alpha + f32::from(dst[c]) * (1.0 - alpha);
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}
