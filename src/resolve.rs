//! Role colour resolution.
//!
//! Each role's colour comes from a user override or a configured default.
//! A reference is one of:
//! - a 1-based ordinal into the canonical swatch order (`2` is `DarkVibrant`)
//! - a swatch name (`LightMuted`)
//! - an explicit colour (`#FF0000`, `rgb(1, 2, 3)`, `teal`, `[1, 2, 3]`)
//!
//! References that point at a slot the palette lacks resolve to nothing; the
//! role is then left out and drawing falls back to the accent.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Colour, Palette, Role, RoleColours, Swatch};

/// A colour reference as written in config or on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColourSpec {
    Ordinal(i64),
    Text(String),
    Channels(Vec<i64>),
}

impl ColourSpec {
    /// Resolve against a palette. `None` when the reference names an absent
    /// slot or is not a valid colour.
    pub fn resolve(&self, palette: &Palette) -> Option<Colour> {
        match self {
            ColourSpec::Ordinal(n) => resolve_ordinal(*n, palette),
            ColourSpec::Channels(channels) => Colour::from_channels(channels).ok(),
            ColourSpec::Text(text) => {
                let text = text.trim();
                if let Ok(n) = text.parse::<i64>() {
                    return resolve_ordinal(n, palette);
                }
                if let Ok(swatch) = text.parse::<Swatch>() {
                    return palette.get(swatch);
                }
                Colour::parse(text).ok()
            }
        }
    }
}

fn resolve_ordinal(n: i64, palette: &Palette) -> Option<Colour> {
    let ordinal = usize::try_from(n).ok()?;
    Swatch::from_ordinal(ordinal).and_then(|swatch| palette.get(swatch))
}

impl From<&str> for ColourSpec {
    fn from(s: &str) -> Self {
        ColourSpec::Text(s.to_string())
    }
}

impl fmt::Display for ColourSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColourSpec::Ordinal(n) => write!(f, "{}", n),
            ColourSpec::Text(s) => f.write_str(s),
            ColourSpec::Channels(c) => write!(f, "{:?}", c),
        }
    }
}

/// Per-role user controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleOptions {
    /// Colour reference overriding the role's default.
    pub colour: Option<ColourSpec>,

    /// Darken by this percentage (0-100).
    pub darken: Option<f32>,

    /// Lighten by this percentage (0-100).
    pub lighten: Option<f32>,
}

impl RoleOptions {
    /// Net signed adjustment: `+lighten - darken`, each clamped to [0, 100].
    pub fn adjustment(&self) -> f32 {
        let clamp = |p: Option<f32>| p.filter(|p| p.is_finite()).map_or(0.0, |p| p.clamp(0.0, 100.0));
        clamp(self.lighten) - clamp(self.darken)
    }
}

/// Default reference for each role when the user gives none.
pub fn default_references() -> BTreeMap<Role, ColourSpec> {
    BTreeMap::from([
        (Role::Start, ColourSpec::from("DarkVibrant")),
        (Role::End, ColourSpec::from("DarkMuted")),
        (Role::Frame, ColourSpec::from("LightVibrant")),
        (Role::Shadow, ColourSpec::from("black")),
        (Role::Text, ColourSpec::from("LightMuted")),
        (Role::Accent, ColourSpec::from("Vibrant")),
        (Role::Vignette, ColourSpec::from("black")),
    ])
}

/// Resolve `roles` in order against `palette`.
///
/// Roles whose override and default both fail are omitted from the result.
pub fn resolve_roles(
    roles: &[Role],
    palette: &Palette,
    overrides: &BTreeMap<Role, RoleOptions>,
    defaults: &BTreeMap<Role, ColourSpec>,
) -> BTreeMap<Role, Colour> {
    let mut resolved = BTreeMap::new();

    for &role in roles {
        let options = overrides.get(&role);
        let default = defaults.get(&role);

        let colour = options
            .and_then(|o| o.colour.as_ref())
            .and_then(|spec| spec.resolve(palette))
            .or_else(|| default.and_then(|spec| spec.resolve(palette)));

        let Some(mut colour) = colour else {
            tracing::debug!(role = %role, "role left unresolved");
            continue;
        };

        let percentage = options.map_or(0.0, RoleOptions::adjustment);
        if percentage != 0.0 {
            colour = colour.adjust(percentage);
        }

        resolved.insert(role, colour);
    }

    resolved
}

/// Resolve every role and build the render's colour assignment.
pub fn resolve_all(
    palette: &Palette,
    overrides: &BTreeMap<Role, RoleOptions>,
    defaults: &BTreeMap<Role, ColourSpec>,
) -> Result<RoleColours> {
    let resolved = resolve_roles(&Role::ALL, palette, overrides, defaults);
    for role in Role::ALL {
        if !resolved.contains_key(&role) && role != Role::Accent {
            tracing::warn!(role = %role, "falling back to accent colour");
        }
    }
    RoleColours::new(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blue_palette() -> Palette {
        [
            (Swatch::Vibrant, Colour::rgb(51, 102, 204)),
            (Swatch::DarkVibrant, Colour::rgb(20, 40, 90)),
            (Swatch::Muted, Colour::rgb(90, 100, 120)),
        ]
        .into_iter()
        .collect()
    }

    fn overrides(role: Role, options: RoleOptions) -> BTreeMap<Role, RoleOptions> {
        BTreeMap::from([(role, options)])
    }

    fn colour_override(spec: ColourSpec) -> RoleOptions {
        RoleOptions {
            colour: Some(spec),
            ..Default::default()
        }
    }

    #[test]
    fn test_spec_resolution_forms() {
        let palette = blue_palette();
        assert_eq!(
            ColourSpec::Ordinal(2).resolve(&palette),
            Some(Colour::rgb(20, 40, 90))
        );
        assert_eq!(
            ColourSpec::from("1").resolve(&palette),
            Some(Colour::rgb(51, 102, 204))
        );
        assert_eq!(
            ColourSpec::from("Muted").resolve(&palette),
            Some(Colour::rgb(90, 100, 120))
        );
        assert_eq!(
            ColourSpec::from("#ff0000").resolve(&palette),
            Some(Colour::rgb(255, 0, 0))
        );
        assert_eq!(
            ColourSpec::Channels(vec![1, 2, 3]).resolve(&palette),
            Some(Colour::rgb(1, 2, 3))
        );
    }

    #[test]
    fn test_spec_unresolvable_forms() {
        let palette = blue_palette();
        // absent slot, by ordinal and by name
        assert_eq!(ColourSpec::Ordinal(6).resolve(&palette), None);
        assert_eq!(ColourSpec::from("LightMuted").resolve(&palette), None);
        // out of range ordinals
        assert_eq!(ColourSpec::Ordinal(0).resolve(&palette), None);
        assert_eq!(ColourSpec::Ordinal(7).resolve(&palette), None);
        assert_eq!(ColourSpec::from("-1").resolve(&palette), None);
        assert_eq!(ColourSpec::from("nonsense").resolve(&palette), None);
    }

    #[test]
    fn test_override_wins_over_default() {
        let palette = blue_palette();
        let defaults = default_references();
        let roles = resolve_roles(
            &[Role::Text],
            &palette,
            &overrides(Role::Text, colour_override("#FF0000".into())),
            &defaults,
        );
        assert_eq!(roles.get(&Role::Text), Some(&Colour::rgb(255, 0, 0)));
    }

    #[test]
    fn test_unresolvable_override_uses_default() {
        let palette = blue_palette();
        let roles = resolve_roles(
            &[Role::Start],
            &palette,
            &overrides(Role::Start, colour_override("LightMuted".into())),
            &default_references(),
        );
        assert_eq!(roles.get(&Role::Start), Some(&Colour::rgb(20, 40, 90)));
    }

    #[test]
    fn test_role_omitted_when_nothing_resolves() {
        let palette = blue_palette();
        let roles = resolve_roles(
            &[Role::Text, Role::Logo],
            &palette,
            &BTreeMap::new(),
            &default_references(),
        );
        // text defaults to LightMuted which is absent; logo has no default
        assert!(roles.is_empty());
    }

    #[test]
    fn test_adjustment_combines_and_clamps() {
        let options = RoleOptions {
            colour: None,
            darken: Some(30.0),
            lighten: Some(10.0),
        };
        assert_eq!(options.adjustment(), -20.0);

        let options = RoleOptions {
            colour: None,
            darken: Some(250.0),
            lighten: Some(-5.0),
        };
        assert_eq!(options.adjustment(), -100.0);
    }

    #[test]
    fn test_adjustment_applied_after_resolution() {
        let palette = blue_palette();
        let options = RoleOptions {
            colour: Some("grey".into()),
            darken: Some(100.0),
            lighten: None,
        };
        let roles = resolve_roles(
            &[Role::Frame],
            &palette,
            &overrides(Role::Frame, options),
            &BTreeMap::new(),
        );
        assert_eq!(roles.get(&Role::Frame), Some(&Colour::BLACK));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let palette = blue_palette();
        let overrides = overrides(
            Role::End,
            RoleOptions {
                colour: Some(ColourSpec::Ordinal(3)),
                darken: Some(10.0),
                lighten: None,
            },
        );
        let defaults = default_references();

        let first = resolve_all(&palette, &overrides, &defaults).unwrap();
        for _ in 0..5 {
            assert_eq!(resolve_all(&palette, &overrides, &defaults).unwrap(), first);
        }
    }

    #[test]
    fn test_unresolvable_accent_is_fatal() {
        let err = resolve_all(&Palette::new(), &BTreeMap::new(), &default_references());
        assert!(err.is_err());
    }

    #[test]
    fn test_colour_spec_deserializes_untagged() {
        let specs: Vec<ColourSpec> =
            serde_yaml::from_str("[2, Vibrant, '#fff', [1, 2, 3]]").unwrap();
        assert_eq!(
            specs,
            vec![
                ColourSpec::Ordinal(2),
                ColourSpec::Text("Vibrant".to_string()),
                ColourSpec::Text("#fff".to_string()),
                ColourSpec::Channels(vec![1, 2, 3]),
            ]
        );
    }
}
