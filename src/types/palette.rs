//! Palette type for swatches extracted from cover art.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::Colour;

/// A named swatch slot.
///
/// Declaration order is the canonical ordering used for 1-based ordinal
/// references (`1` is `Vibrant`, `6` is `LightMuted`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Swatch {
    Vibrant,
    DarkVibrant,
    LightVibrant,
    Muted,
    DarkMuted,
    LightMuted,
}

impl Swatch {
    /// All slots in canonical order.
    pub const ORDER: [Swatch; 6] = [
        Swatch::Vibrant,
        Swatch::DarkVibrant,
        Swatch::LightVibrant,
        Swatch::Muted,
        Swatch::DarkMuted,
        Swatch::LightMuted,
    ];

    /// Look up a slot by 1-based ordinal.
    pub fn from_ordinal(ordinal: usize) -> Option<Self> {
        ordinal
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i))
            .copied()
    }

    /// The canonical slot name.
    pub fn name(self) -> &'static str {
        match self {
            Swatch::Vibrant => "Vibrant",
            Swatch::DarkVibrant => "DarkVibrant",
            Swatch::LightVibrant => "LightVibrant",
            Swatch::Muted => "Muted",
            Swatch::DarkMuted => "DarkMuted",
            Swatch::LightMuted => "LightMuted",
        }
    }
}

impl FromStr for Swatch {
    type Err = ();

    /// Slot names match case-insensitively.
    fn from_str(s: &str) -> Result<Self, ()> {
        let s = s.trim();
        Self::ORDER
            .into_iter()
            .find(|slot| slot.name().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representative colours of a source image, keyed by swatch slot.
///
/// Slots the image has no tone for are simply absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    swatches: BTreeMap<Swatch, Colour>,
}

impl Palette {
    /// Create an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the colour of a slot, if present.
    pub fn get(&self, swatch: Swatch) -> Option<Colour> {
        self.swatches.get(&swatch).copied()
    }

    /// Check if a slot is present.
    pub fn contains(&self, swatch: Swatch) -> bool {
        self.swatches.contains_key(&swatch)
    }

    /// Iterate present slots in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Swatch, Colour)> + '_ {
        self.swatches.iter().map(|(s, c)| (*s, *c))
    }

    /// Number of present slots.
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// Check if the palette has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub(crate) fn insert(&mut self, swatch: Swatch, colour: Colour) {
        self.swatches.insert(swatch, colour);
    }
}

impl FromIterator<(Swatch, Colour)> for Palette {
    fn from_iter<I: IntoIterator<Item = (Swatch, Colour)>>(iter: I) -> Self {
        Self {
            swatches: iter.into_iter().collect(),
        }
    }
}
