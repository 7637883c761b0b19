//! Preview geometry.
//!
//! Every position and size is a fraction of the canvas side length, so a
//! preview renders the same at any resolution.

use crate::config::RenderOptions;

/// Cover image side, fraction of the canvas.
const COVER_FRACTION: f32 = 0.6;
/// Logo box width, fraction of the canvas.
const LOGO_WIDTH: f32 = 0.514;
/// Logo box height, fraction of the canvas.
const LOGO_HEIGHT: f32 = 0.088;
/// Gap below the logo, fraction of the canvas.
const BOTTOM_MARGIN: f32 = 0.04;
/// Artist line size, fraction of the canvas.
const BODY_FRACTION: f32 = 0.034;
/// Largest release title size, fraction of the canvas.
const TITLE_MAX_FRACTION: f32 = 0.06;
/// Upper edge of the artist band, measured with a fixed 6% padding.
const ARTIST_BAND_PADDING: f32 = 0.06;

/// An axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Grow by `d` on every side. Negative `d` shrinks.
    pub fn outset(&self, d: f32) -> Self {
        Self {
            x: self.x - d,
            y: self.y - d,
            width: self.width + 2.0 * d,
            height: self.height + 2.0 * d,
        }
    }
}

/// Pixel geometry of one preview.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    size: f32,
    top_padding: f32,
    frame_stroke: f32,
    shadow_blur: f32,
}

impl Geometry {
    pub fn new(options: &RenderOptions) -> Self {
        let size = options.canvas_size as f32;
        Self {
            size,
            top_padding: size * options.top_padding / 100.0,
            frame_stroke: size * options.frame_stroke / 100.0,
            shadow_blur: size * options.shadow_size / 100.0,
        }
    }

    /// The cover image box: a centred square below the top padding.
    pub fn cover(&self) -> Rect {
        let side = self.size * COVER_FRACTION;
        Rect::new((self.size - side) / 2.0, self.top_padding, side, side)
    }

    pub fn frame_stroke(&self) -> f32 {
        self.frame_stroke
    }

    /// The path the frame is stroked along. Half the stroke width out from
    /// the cover, so the stroke hugs the image without covering it.
    pub fn frame_path(&self) -> Rect {
        self.cover().outset(self.frame_stroke / 2.0)
    }

    /// Shadow blur extent in pixels.
    pub fn shadow_blur(&self) -> f32 {
        self.shadow_blur
    }

    /// Logo box, centred and anchored to the bottom margin.
    pub fn logo(&self) -> Rect {
        let width = self.size * LOGO_WIDTH;
        let height = self.size * LOGO_HEIGHT;
        Rect::new(
            (self.size - width) / 2.0,
            self.size - height - self.size * BOTTOM_MARGIN,
            width,
            height,
        )
    }

    /// Width the release title is fitted to.
    pub fn title_max_width(&self) -> f32 {
        self.size * COVER_FRACTION
    }

    pub fn title_max_size(&self) -> f32 {
        self.size * TITLE_MAX_FRACTION
    }

    /// Artist line size.
    pub fn body_size(&self) -> f32 {
        self.size * BODY_FRACTION
    }

    fn band_end(&self) -> f32 {
        self.size - self.size * BOTTOM_MARGIN - self.size * LOGO_HEIGHT
    }

    /// Top of the release title for a title of `title_size`.
    pub fn title_top(&self, title_size: f32) -> f32 {
        let start = self.top_padding + self.frame_stroke + self.size * COVER_FRACTION;
        let free = self.band_end() - start - title_size - self.body_size();
        start + (1.2 * free / 3.2).trunc()
    }

    /// Top of the artist line, given the title size it shares the band with.
    pub fn artist_top(&self, title_size: f32) -> f32 {
        let start =
            self.size * ARTIST_BAND_PADDING + self.frame_stroke + self.size * COVER_FRACTION;
        let end = self.band_end();
        let free = end - start - title_size - self.body_size();
        end - self.body_size() - (free / 3.2).trunc()
    }

    /// Left edge that centres a run of `width` pixels.
    pub fn centred_x(&self, width: f32) -> f32 {
        (self.size - width) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(size: u32) -> Geometry {
        Geometry::new(&RenderOptions {
            canvas_size: size,
            ..Default::default()
        })
    }

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 1e-3,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_cover_box() {
        let cover = geometry(1000).cover();
        assert_close(cover.x, 200.0);
        assert_close(cover.y, 60.0);
        assert_close(cover.width, 600.0);
        assert_close(cover.height, 600.0);
    }

    #[test]
    fn test_frame_stroke_sits_outside_cover() {
        let g = geometry(1000);
        let path = g.frame_path();
        assert_close(g.frame_stroke(), 10.0);
        // inner edge of the stroke is the cover edge
        assert_close(path.x + g.frame_stroke() / 2.0, g.cover().x);
        assert_close(path.bottom() - g.frame_stroke() / 2.0, g.cover().bottom());
    }

    #[test]
    fn test_logo_box() {
        let logo = geometry(1000).logo();
        assert_close(logo.width, 514.0);
        assert_close(logo.height, 88.0);
        assert_close(logo.x, 243.0);
        assert_close(logo.bottom(), 960.0);
    }

    #[test]
    fn test_text_rows() {
        let g = geometry(1000);
        // start = 60 + 10 + 600 = 670, end = 1000 - 40 - 88 = 872, body = 34
        // free = 872 - 670 - 60 - 34 = 108, 1.2 * 108 / 3.2 = 40.5
        assert_close(g.title_top(60.0), 710.0);
        // artist start = 60 + 10 + 600 = 670, free = 108, 108 / 3.2 = 33.75
        assert_close(g.artist_top(60.0), 872.0 - 34.0 - 33.0);
    }

    #[test]
    fn test_text_rows_keep_order() {
        for size in [512, 1024, 1080, 2048] {
            let g = geometry(size);
            let title = g.title_max_size();
            let title_bottom = g.title_top(title) + title;
            assert!(g.title_top(title) >= g.cover().bottom());
            assert!(title_bottom <= g.artist_top(title));
            assert!(g.artist_top(title) + g.body_size() <= g.logo().y);
        }
    }

    #[test]
    fn test_rect_outset() {
        let r = Rect::new(10.0, 10.0, 20.0, 5.0).outset(2.0);
        assert_eq!(r, Rect::new(8.0, 8.0, 24.0, 9.0));
        assert_close(r.right(), 32.0);
    }
}
