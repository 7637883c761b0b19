//! Preview composition.
//!
//! A render runs in a fixed order: background gradient, vignette, logo,
//! cover image (frame, shadow, image), release title, artist line. Each
//! stage draws over what the previous ones left.

use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;

use crate::config::{FontPaths, RenderOptions};
use crate::error::Result;
use crate::extract::{decode_image, extract_palette};
use crate::resolve::resolve_all;
use crate::source::SourceLoader;
use crate::types::{Palette, Role, RoleColours};

use super::canvas::Canvas;
use super::layout::Geometry;
use super::logo::{load_logo, recolour_logo};
use super::png::encode_png;
use super::text::{draw_text, fit_font_size, RustTypeFace, Typeface};
use super::vignette::apply_vignette;

/// Opacity of the cover drop shadow.
const SHADOW_ALPHA: f32 = 0.5;

/// Read-only assets shared by every render: the two faces and the logo.
#[derive(Clone)]
pub struct Assets {
    regular: Arc<dyn Typeface>,
    bold: Arc<dyn Typeface>,
    logo: Arc<RgbaImage>,
}

impl Assets {
    pub fn new(regular: Arc<dyn Typeface>, bold: Arc<dyn Typeface>, logo: RgbaImage) -> Self {
        Self {
            regular,
            bold,
            logo: Arc::new(logo),
        }
    }

    /// Load fonts and logo from disk.
    pub fn load(fonts: &FontPaths, logo: &Path) -> Result<Self> {
        let regular = RustTypeFace::load(&fonts.regular)?;
        let bold = RustTypeFace::load(&fonts.bold)?;
        let logo = load_logo(logo)?;
        tracing::debug!(
            regular = %fonts.regular.display(),
            bold = %fonts.bold.display(),
            "loaded assets"
        );
        Ok(Self::new(Arc::new(regular), Arc::new(bold), logo))
    }
}

/// One preview to render.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Cover image URL or path.
    pub cover: String,
    pub artist: String,
    pub release: String,
    pub options: RenderOptions,
}

/// A rendered preview and the palette it was coloured from.
#[derive(Debug, Clone)]
pub struct RenderResult {
    /// PNG bytes.
    pub image: Vec<u8>,
    pub palette: Palette,
}

pub struct Renderer {
    assets: Assets,
    loader: SourceLoader,
}

impl Renderer {
    pub fn new(assets: Assets, loader: SourceLoader) -> Self {
        Self { assets, loader }
    }

    /// Render a preview. Fails as a whole; nothing partial is returned.
    pub fn render(&self, request: &RenderRequest) -> Result<RenderResult> {
        let options = &request.options;
        options.validate()?;

        let bytes = self.loader.load(&request.cover)?;
        let cover = decode_image(&bytes, &request.cover)?;
        let palette = extract_palette(&cover);
        for (swatch, colour) in palette.iter() {
            tracing::info!(%swatch, %colour, "extracted swatch");
        }

        let roles = resolve_all(&palette, &options.colours, &options.defaults)?;
        let canvas = compose(
            &self.assets,
            &cover.to_rgba8(),
            &request.artist,
            &request.release,
            &roles,
            options,
        );

        tracing::debug!(stage = "encode", "encoding preview");
        let image = encode_png(canvas.image())?;
        Ok(RenderResult { image, palette })
    }
}

/// Draw every layer of a preview onto a fresh canvas.
pub fn compose(
    assets: &Assets,
    cover: &RgbaImage,
    artist: &str,
    release: &str,
    roles: &RoleColours,
    options: &RenderOptions,
) -> Canvas {
    let geometry = Geometry::new(options);
    let mut canvas = Canvas::new(options.canvas_size);

    tracing::debug!(stage = "gradient", size = options.canvas_size);
    canvas.fill_vertical_gradient(roles.colour(Role::Start), roles.colour(Role::End));

    if options.vignette {
        tracing::debug!(stage = "vignette", strength = options.vignette_strength);
        apply_vignette(
            canvas.image_mut(),
            roles.colour(Role::Vignette),
            options.vignette_strength,
        );
    }

    tracing::debug!(stage = "logo");
    let logo_box = geometry.logo();
    let logo = recolour_logo(
        &assets.logo,
        logo_box.width.round() as u32,
        logo_box.height.round() as u32,
        roles.colour(Role::Logo),
    );
    canvas.draw_image(&logo, logo_box);

    tracing::debug!(stage = "cover", frame = options.frame, shadow = options.shadow);
    draw_cover(&mut canvas, &geometry, cover, roles, options);

    tracing::debug!(stage = "text");
    draw_titles(&mut canvas, &geometry, assets, artist, release, roles);

    canvas
}

fn draw_cover(
    canvas: &mut Canvas,
    geometry: &Geometry,
    cover: &RgbaImage,
    roles: &RoleColours,
    options: &RenderOptions,
) {
    if options.frame {
        canvas.stroke_rect(
            geometry.frame_path(),
            geometry.frame_stroke(),
            roles.colour(Role::Frame),
        );
    }
    if options.shadow {
        canvas.draw_shadow(
            geometry.cover(),
            geometry.shadow_blur() / 2.0,
            roles.colour(Role::Shadow),
            SHADOW_ALPHA,
        );
    }
    canvas.draw_image(cover, geometry.cover());
}

fn draw_titles(
    canvas: &mut Canvas,
    geometry: &Geometry,
    assets: &Assets,
    artist: &str,
    release: &str,
    roles: &RoleColours,
) {
    let colour = roles.colour(Role::Text);

    let release = release.to_uppercase();
    let bold = assets.bold.as_ref();
    let size = fit_font_size(
        &release,
        geometry.title_max_width(),
        bold,
        0.0,
        geometry.title_max_size(),
    );
    let x = geometry.centred_x(bold.advance_width(&release, size));
    draw_text(canvas, bold, &release, size, x, geometry.title_top(size), colour);

    let artist = artist.to_uppercase();
    let regular = assets.regular.as_ref();
    let body = geometry.body_size();
    let x = geometry.centred_x(regular.advance_width(&artist, body));
    draw_text(canvas, regular, &artist, body, x, geometry.artist_top(size), colour);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PreviewError;
    use crate::render::text::BlockFace;
    use crate::resolve::ColourSpec;
    use crate::types::{Colour, Swatch};
    use image::Rgba;
    use tempfile::{tempdir, TempDir};

    const RELEASE: &str = "Life Is But a Dream";
    const ARTIST: &str = "Avenged Sevenfold";

    fn assets() -> Assets {
        let logo = RgbaImage::from_pixel(64, 11, Rgba([255, 255, 255, 255]));
        Assets::new(Arc::new(BlockFace), Arc::new(BlockFace), logo)
    }

    fn blue_cover() -> (TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.png");
        RgbaImage::from_pixel(500, 500, Rgba([0x33, 0x66, 0xCC, 255]))
            .save(&path)
            .unwrap();
        let path = path.to_str().unwrap().to_string();
        (dir, path)
    }

    fn request(cover: &str, options: RenderOptions) -> RenderRequest {
        RenderRequest {
            cover: cover.to_string(),
            artist: ARTIST.to_string(),
            release: RELEASE.to_string(),
            options,
        }
    }

    fn options(size: u32) -> RenderOptions {
        RenderOptions {
            canvas_size: size,
            ..Default::default()
        }
    }

    fn render(request: &RenderRequest) -> (RgbaImage, Palette) {
        let renderer = Renderer::new(assets(), SourceLoader::default());
        let result = renderer.render(request).unwrap();
        let image = image::load_from_memory(&result.image).unwrap().to_rgba8();
        (image, result.palette)
    }

    fn count_colour(image: &RgbaImage, colour: Colour) -> usize {
        let rgba = colour.to_rgba();
        image.pixels().filter(|p| p.0 == rgba).count()
    }

    #[test]
    fn test_render_blue_cover() {
        let (_dir, cover) = blue_cover();
        let (image, palette) = render(&request(&cover, options(1024)));

        assert_eq!(image.dimensions(), (1024, 1024));
        assert_eq!(palette.get(Swatch::Vibrant), Some(Colour::rgb(0x33, 0x66, 0xCC)));
    }

    #[test]
    fn test_toggles_leave_cover_region_alone() {
        let (_dir, cover) = blue_cover();
        let (all_on, _) = render(&request(&cover, options(512)));

        let mut bare = options(512);
        bare.frame = false;
        bare.shadow = false;
        bare.vignette = false;
        let (all_off, _) = render(&request(&cover, bare.clone()));

        let region = Geometry::new(&bare).cover();
        let (x0, y0) = (region.x.round() as u32, region.y.round() as u32);
        let side = region.width.round() as u32;
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                assert_eq!(all_on.get_pixel(x, y), all_off.get_pixel(x, y), "({}, {})", x, y);
            }
        }

        // the frame is visible just outside the cover
        assert_ne!(all_on.get_pixel(x0 - 1, y0 + side / 2), all_off.get_pixel(x0 - 1, y0 + side / 2));
    }

    #[test]
    fn test_each_toggle_is_independent() {
        let (_dir, cover) = blue_cover();
        let base = {
            let mut o = options(256);
            o.frame = false;
            o.shadow = false;
            o.vignette = false;
            o
        };
        let (plain, _) = render(&request(&cover, base.clone()));

        let corner = (2, 2);
        let beside_cover = {
            let g = Geometry::new(&base).cover();
            (g.x.round() as u32 - 1, (g.y + g.height / 2.0) as u32)
        };

        let mut vignette_only = base.clone();
        vignette_only.vignette = true;
        let (image, _) = render(&request(&cover, vignette_only));
        assert_ne!(image.get_pixel(corner.0, corner.1), plain.get_pixel(corner.0, corner.1));

        let mut frame_only = base.clone();
        frame_only.frame = true;
        let (image, _) = render(&request(&cover, frame_only));
        assert_eq!(image.get_pixel(corner.0, corner.1), plain.get_pixel(corner.0, corner.1));
        assert_ne!(
            image.get_pixel(beside_cover.0, beside_cover.1),
            plain.get_pixel(beside_cover.0, beside_cover.1)
        );
    }

    #[test]
    fn test_shadow_toggle_only_touches_the_halo() {
        let (_dir, cover) = blue_cover();
        let mut base = options(256);
        base.frame = false;
        base.shadow = false;
        base.vignette = false;
        let (plain, _) = render(&request(&cover, base.clone()));

        let mut shadow_only = base.clone();
        shadow_only.shadow = true;
        let (image, _) = render(&request(&cover, shadow_only));

        let region = Geometry::new(&base).cover();
        let (x0, y0) = (region.x.round() as u32, region.y.round() as u32);
        let side = region.width.round() as u32;
        let mid = y0 + side / 2;

        // halo darkens the background beside the cover
        let (halo, bare) = (image.get_pixel(x0 - 1, mid).0, plain.get_pixel(x0 - 1, mid).0);
        assert!(halo[..3].iter().zip(&bare[..3]).all(|(h, b)| h <= b));
        assert_ne!(halo, bare);

        assert_eq!(image.get_pixel(2, 2), plain.get_pixel(2, 2));
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                assert_eq!(image.get_pixel(x, y), plain.get_pixel(x, y), "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_text_override_forces_red() {
        let (_dir, cover) = blue_cover();
        let red = Colour::rgb(255, 0, 0);

        let (image, _) = render(&request(&cover, options(512)));
        assert_eq!(count_colour(&image, red), 0);

        let mut opts = options(512);
        opts.role_mut(Role::Text).colour = Some(ColourSpec::from("#FF0000"));
        let (image, _) = render(&request(&cover, opts.clone()));

        let geometry = Geometry::new(&opts);
        let band_top = geometry.cover().bottom().ceil() as u32 + 1;
        let band = image::imageops::crop_imm(&image, 0, band_top, 512, geometry.logo().y as u32 - band_top)
            .to_image();
        assert!(count_colour(&band, red) > 100);
        assert_eq!(count_colour(&image, red), count_colour(&band, red));
    }

    #[test]
    fn test_compose_draws_logo_in_accent_by_default() {
        let roles = RoleColours::new(
            [(Role::Accent, Colour::rgb(250, 10, 10)), (Role::Start, Colour::BLACK), (Role::End, Colour::BLACK)]
                .into_iter()
                .collect(),
        )
        .unwrap();
        let mut opts = options(256);
        opts.vignette = false;
        let cover = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 255]));

        let canvas = compose(&assets(), &cover, "", "", &roles, &opts);

        let logo = Geometry::new(&opts).logo();
        let centre = canvas.image().get_pixel(
            (logo.x + logo.width / 2.0) as u32,
            (logo.y + logo.height / 2.0) as u32,
        );
        assert_eq!(centre.0, [250, 10, 10, 255]);
    }

    #[test]
    fn test_missing_cover_aborts() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.png");
        let renderer = Renderer::new(assets(), SourceLoader::default());

        let err = renderer
            .render(&request(missing.to_str().unwrap(), options(256)))
            .unwrap_err();
        assert!(matches!(err, PreviewError::ImageLoad { .. }));
    }

    #[test]
    fn test_invalid_options_abort_before_loading() {
        let renderer = Renderer::new(assets(), SourceLoader::default());
        let err = renderer
            .render(&request("does-not-matter.png", options(1)))
            .unwrap_err();
        assert!(matches!(err, PreviewError::Parse { .. }));
    }
}
