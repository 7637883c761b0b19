//! Rendering module for muzovano.
//!
//! This module composes preview cards: drawing primitives over an RGBA
//! canvas, the fixed card geometry, text fitting and the render pipeline.

mod blur;
mod canvas;
mod layout;
mod logo;
mod pipeline;
mod png;
pub(crate) mod text;
mod vignette;

pub use blur::blur_mask;
pub use canvas::Canvas;
pub use layout::{Geometry, Rect};
pub use logo::{load_logo, recolour_logo};
pub use pipeline::{compose, Assets, RenderRequest, RenderResult, Renderer};
pub use png::encode_png;
pub use text::{draw_text, fit_font_size, RustTypeFace, Typeface};
pub use vignette::apply_vignette;
