//! muzovano - Release preview card generator
//!
//! Renders square social-media preview cards for music releases: the cover
//! art on a background gradient coloured from the cover's own palette, with
//! the release title and artist underneath.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod render;
pub mod resolve;
pub mod source;
pub mod types;

pub use catalog::{find_album, Album, AlbumCache, LookupOptions, ReleaseType, SpotifyClient};
pub use config::{Config, RenderOptions};
pub use error::{PreviewError, Result};
pub use extract::extract_palette;
pub use render::{compose, Assets, RenderRequest, RenderResult, Renderer};
pub use resolve::{resolve_all, resolve_roles, ColourSpec, RoleOptions};
pub use source::SourceLoader;
pub use types::{Colour, Palette, Role, RoleColours, Swatch};
