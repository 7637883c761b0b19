//! Core domain types for muzovano.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `Colour` - RGB colour values
//! - `Palette` - Swatches extracted from a cover image
//! - `Role` / `RoleColours` - Semantic colour roles and their resolved values

mod colour;
mod palette;
mod role;

pub use colour::Colour;
pub use palette::{Palette, Swatch};
pub use role::{Role, RoleColours};
