//! Text measurement, fitting and drawing.

use std::path::Path;

use rusttype::{point, Font, Scale};

use crate::error::{PreviewError, Result};
use crate::types::Colour;

use super::canvas::Canvas;

/// A font the preview can measure and rasterize text with.
pub trait Typeface: Send + Sync {
    /// Horizontal advance of `text` at `size` pixels, kerning included.
    fn advance_width(&self, text: &str, size: f32) -> f32;

    /// Distance from the top of the line box to the baseline.
    fn ascent(&self, size: f32) -> f32;

    /// Rasterize `text` with its line box's top-left corner at the origin.
    /// `plot` receives pixel coordinates and coverage in 0..=1.
    fn rasterize(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, f32));
}

/// A TrueType/OpenType face backed by rusttype.
pub struct RustTypeFace {
    font: Font<'static>,
}

impl RustTypeFace {
    pub fn from_bytes(bytes: Vec<u8>, path: &Path) -> Result<Self> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| PreviewError::FontLoad {
            path: path.to_path_buf(),
            message: "not a TrueType or OpenType font".to_string(),
        })?;
        Ok(Self { font })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| PreviewError::FontLoad {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_bytes(bytes, path)
    }
}

impl Typeface for RustTypeFace {
    fn advance_width(&self, text: &str, size: f32) -> f32 {
        let scale = Scale::uniform(size);
        self.font
            .layout(text, scale, point(0.0, 0.0))
            .last()
            .map_or(0.0, |g| g.position().x + g.unpositioned().h_metrics().advance_width)
    }

    fn ascent(&self, size: f32) -> f32 {
        self.font.v_metrics(Scale::uniform(size)).ascent
    }

    fn rasterize(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let scale = Scale::uniform(size);
        let baseline = self.ascent(size);
        for glyph in self.font.layout(text, scale, point(0.0, baseline)) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| plot(gx as i32 + bb.min.x, gy as i32 + bb.min.y, v));
            }
        }
    }
}

/// Largest size in `min..=max`, stepping down by one pixel, at which `text`
/// fits within `max_width`. Returns `min` when nothing fits.
pub fn fit_font_size(text: &str, max_width: f32, face: &dyn Typeface, min: f32, max: f32) -> f32 {
    let mut size = max;
    while size >= min {
        if face.advance_width(text, size) <= max_width {
            return size;
        }
        size -= 1.0;
    }
    min
}

/// Draw one line of text with its line box's top-left at (`x`, `y`).
pub fn draw_text(
    canvas: &mut Canvas,
    face: &dyn Typeface,
    text: &str,
    size: f32,
    x: f32,
    y: f32,
    colour: Colour,
) {
    let (ox, oy) = (x.round() as i64, y.round() as i64);
    face.rasterize(text, size, &mut |px, py, coverage| {
        canvas.blend_pixel(ox + i64::from(px), oy + i64::from(py), colour, coverage);
    });
}

/// A face with fixed-width square glyphs.
#[cfg(test)]
pub(crate) struct BlockFace;

#[cfg(test)]
impl BlockFace {
    /// Glyph advance as a fraction of the size.
    pub const ADVANCE: f32 = 0.6;
}

#[cfg(test)]
impl Typeface for BlockFace {
    fn advance_width(&self, text: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * Self::ADVANCE
    }

    fn ascent(&self, size: f32) -> f32 {
        size * 0.8
    }

    fn rasterize(&self, text: &str, size: f32, plot: &mut dyn FnMut(i32, i32, f32)) {
        let advance = size * Self::ADVANCE;
        let side = (advance * 0.8).floor() as i32;
        let top = (size * 0.1).round() as i32;
        for (i, ch) in text.chars().enumerate() {
            if ch.is_whitespace() {
                continue;
            }
            let left = (i as f32 * advance).round() as i32;
            for gy in 0..side {
                for gx in 0..side {
                    plot(left + gx, top + gy, 1.0);
                }
            }
        }
    }
}
