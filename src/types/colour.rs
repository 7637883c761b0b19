//! Colour type and parsing.

use std::fmt;
use std::str::FromStr;

use palette::{FromColor, Hsl, IntoColor, Lab, Srgb};
use serde::{Serialize, Serializer};

use crate::error::{PreviewError, Result};

/// An opaque RGB colour value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse a colour from its textual notation.
    ///
    /// Supports formats:
    /// - `#RGB` (3 digits, expanded to 6)
    /// - `#RRGGBB` (6 digits)
    /// - `rgb(r, g, b)` and `rgba(r, g, b, a)` (alpha is ignored)
    /// - CSS colour keywords (`rebeccapurple`, `teal`, ...)
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return Self::from_hex_digits(hex).ok_or_else(|| invalid(input));
        }

        if let Some(args) = strip_call(s, "rgba").or_else(|| strip_call(s, "rgb")) {
            return parse_rgb_args(args).ok_or_else(|| invalid(input));
        }

        palette::named::from_str(&s.to_ascii_lowercase())
            .map(|srgb| Self::rgb(srgb.red, srgb.green, srgb.blue))
            .ok_or_else(|| invalid(input))
    }

    /// Build a colour from a literal `[r, g, b]` channel list.
    pub fn from_channels(channels: &[i64]) -> Result<Self> {
        let value = || PreviewError::InvalidColour {
            value: format!("{:?}", channels),
        };
        let [r, g, b] = channels else {
            return Err(value());
        };
        let channel = |c: i64| u8::try_from(c).map_err(|_| value());
        Ok(Self::rgb(channel(*r)?, channel(*g)?, channel(*b)?))
    }

    /// Check whether `input` is an explicit colour rather than a palette reference.
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Lighten (positive) or darken (negative) by a percentage in [-100, 100].
    ///
    /// Shifts HSL lightness at constant hue and saturation, which stays in
    /// gamut for every colour, so the opposite shift restores the original.
    pub fn adjust(self, percentage: f32) -> Self {
        let percentage = percentage.clamp(-100.0, 100.0);
        if percentage == 0.0 {
            return self;
        }

        let mut hsl = self.to_hsl();
        hsl.lightness = (hsl.lightness + percentage / 100.0).clamp(0.0, 1.0);
        Self::from_hsl(hsl)
    }

    /// Convert to RGB array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to an opaque RGBA array.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Serialize to CSS `rgb(r, g, b)` notation.
    pub fn to_css_rgb(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }

    fn to_srgb_f32(self) -> Srgb<f32> {
        Srgb::new(self.r, self.g, self.b).into_format()
    }

    /// Convert to CIELAB (for clustering).
    pub fn to_lab(self) -> Lab {
        self.to_srgb_f32().into_color()
    }

    /// Create from CIELAB.
    pub fn from_lab(lab: Lab) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(lab))
    }

    /// Convert to HSL.
    pub fn to_hsl(self) -> Hsl {
        self.to_srgb_f32().into_color()
    }

    /// Create from HSL.
    pub fn from_hsl(hsl: Hsl) -> Self {
        Self::from_srgb_f32_clamped(Srgb::from_color(hsl))
    }

    /// Clamp an Srgb<f32> to [0, 1] and round to 8-bit channels.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgb(channel(srgb.red), channel(srgb.green), channel(srgb.blue))
    }
}

impl FromStr for Colour {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn invalid(input: &str) -> PreviewError {
    PreviewError::InvalidColour {
        value: input.to_string(),
    }
}

impl Colour {
    fn from_hex_digits(hex: &str) -> Option<Self> {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
                let (r, g, b) = (digit(0)?, digit(1)?, digit(2)?);
                Some(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?))
            }
            _ => None,
        }
    }
}

/// Return the argument list of `name(...)`, if `s` is such a call.
fn strip_call<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    s.strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Parse `r, g, b` or `r, g, b, a` with integer channels.
fn parse_rgb_args(args: &str) -> Option<Colour> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |p: &str| -> Option<u8> {
        if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        p.parse::<u8>().ok()
    };

    if let Some(alpha) = parts.get(3) {
        alpha.parse::<f32>().ok().filter(|a| *a >= 0.0)?;
    }

    Some(Colour::rgb(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}
