//! Render options and the project config file (muzovano.yaml).
//!
//! The config file holds asset paths, catalog settings and default render
//! options. Command-line flags override what the file says.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::ReleaseType;
use crate::error::{PreviewError, Result};
use crate::resolve::{default_references, ColourSpec, RoleOptions};
use crate::types::Role;

/// Name of the project config file.
pub const CONFIG_FILE: &str = "muzovano.yaml";

/// Everything that shapes one render besides its inputs.
///
/// Geometry percentages are relative to `canvas_size`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Side length of the square output, in pixels.
    pub canvas_size: u32,

    /// Gap above the cover image, percent of the canvas.
    pub top_padding: f32,

    /// Frame stroke width, percent of the canvas.
    pub frame_stroke: f32,

    /// Shadow blur size, percent of the canvas.
    pub shadow_size: f32,

    pub frame: bool,
    pub shadow: bool,
    pub vignette: bool,

    /// Vignette strength, 0-100.
    pub vignette_strength: f32,

    /// Per-role overrides.
    pub colours: BTreeMap<Role, RoleOptions>,

    /// Per-role default references.
    pub defaults: BTreeMap<Role, ColourSpec>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            canvas_size: 1080,
            top_padding: 6.0,
            frame_stroke: 1.0,
            shadow_size: 3.0,
            frame: true,
            shadow: true,
            vignette: true,
            vignette_strength: 50.0,
            colours: BTreeMap::new(),
            defaults: default_references(),
        }
    }
}

const MIN_CANVAS: u32 = 64;
const MAX_CANVAS: u32 = 8192;

impl RenderOptions {
    /// Check ranges. Called before every render.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_CANVAS..=MAX_CANVAS).contains(&self.canvas_size) {
            return Err(invalid(
                format!("canvas size {} is out of range", self.canvas_size),
                format!("Use a size between {} and {}", MIN_CANVAS, MAX_CANVAS),
            ));
        }

        let percentages = [
            ("top_padding", self.top_padding),
            ("frame_stroke", self.frame_stroke),
            ("shadow_size", self.shadow_size),
            ("vignette_strength", self.vignette_strength),
        ];
        for (name, value) in percentages {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(invalid(
                    format!("{} must be a percentage, got {}", name, value),
                    "Percentages range from 0 to 100".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Mutable access to a role's overrides, creating them if absent.
    pub fn role_mut(&mut self, role: Role) -> &mut RoleOptions {
        self.colours.entry(role).or_default()
    }
}

fn invalid(message: String, help: String) -> PreviewError {
    PreviewError::Parse {
        message,
        help: Some(help),
    }
}

/// Regular and bold typeface files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontPaths {
    pub regular: PathBuf,
    pub bold: PathBuf,
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            regular: PathBuf::from("assets/fonts/regular.ttf"),
            bold: PathBuf::from("assets/fonts/bold.ttf"),
        }
    }
}

/// Catalog search settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Market code passed to the search endpoint.
    pub market: String,

    /// Maximum number of search results.
    pub limit: u32,

    /// Only consider releases of this type.
    pub release_type: Option<ReleaseType>,

    /// Network timeout in seconds, for catalog calls and cover downloads.
    pub timeout_secs: u64,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            market: "UA".to_string(),
            limit: 3,
            release_type: None,
            timeout_secs: 30,
        }
    }
}

/// Project config loaded from muzovano.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory rendered previews are written to.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Directory catalog lookups are cached in.
    #[serde(default = "default_cache")]
    pub cache: PathBuf,

    pub fonts: FontPaths,

    /// Monochrome logo mark, recoloured at render time.
    #[serde(default = "default_logo")]
    pub logo: PathBuf,

    pub catalog: CatalogSettings,

    pub render: RenderOptions,
}

fn default_output() -> PathBuf {
    PathBuf::from("previews")
}

fn default_cache() -> PathBuf {
    PathBuf::from("spotify")
}

fn default_logo() -> PathBuf {
    PathBuf::from("assets/logo.png")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: default_output(),
            cache: default_cache(),
            fonts: FontPaths::default(),
            logo: default_logo(),
            catalog: CatalogSettings::default(),
            render: RenderOptions::default(),
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PreviewError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load config if the file exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes as null, not as an empty mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PreviewError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILE)),
        })
    }
}
