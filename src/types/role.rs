//! Semantic colour roles and their resolved assignment.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PreviewError, Result};

use super::Colour;

/// The purpose a colour serves in the preview composition.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Top of the background gradient.
    Start,
    /// Bottom of the background gradient.
    End,
    Frame,
    Shadow,
    Text,
    Logo,
    /// Fallback for every role that did not resolve.
    Accent,
    /// Tint the vignette fades towards.
    Vignette,
}

impl Role {
    /// All roles, in resolution order.
    pub const ALL: [Role; 8] = [
        Role::Start,
        Role::End,
        Role::Frame,
        Role::Shadow,
        Role::Text,
        Role::Logo,
        Role::Accent,
        Role::Vignette,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Start => "start",
            Role::End => "end",
            Role::Frame => "frame",
            Role::Shadow => "shadow",
            Role::Text => "text",
            Role::Logo => "logo",
            Role::Accent => "accent",
            Role::Vignette => "vignette",
        }
    }
}

impl FromStr for Role {
    type Err = PreviewError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|role| role.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PreviewError::Parse {
                message: format!("Unknown colour role: {}", s),
                help: Some(
                    "Available roles: start, end, frame, shadow, text, logo, accent, vignette"
                        .to_string(),
                ),
            })
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved colours for one render.
///
/// Roles that could not be resolved are absent; drawing code asks for a role
/// through [`RoleColours::colour`], which falls back to the accent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleColours {
    colours: BTreeMap<Role, Colour>,
    accent: Colour,
}

impl RoleColours {
    /// Build an assignment. Fails when the accent itself is missing.
    pub fn new(colours: BTreeMap<Role, Colour>) -> Result<Self> {
        let accent = colours
            .get(&Role::Accent)
            .copied()
            .ok_or_else(|| PreviewError::PaletteResolution {
                message: "the accent role resolved to nothing".to_string(),
            })?;
        Ok(Self { colours, accent })
    }

    /// The resolved colour of a role, if it resolved on its own.
    pub fn get(&self, role: Role) -> Option<Colour> {
        self.colours.get(&role).copied()
    }

    /// The colour to draw a role with: its own colour or the accent.
    pub fn colour(&self, role: Role) -> Colour {
        self.get(role).unwrap_or(self.accent)
    }

    /// Iterate resolved roles.
    pub fn iter(&self) -> impl Iterator<Item = (Role, Colour)> + '_ {
        self.colours.iter().map(|(r, c)| (*r, *c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("start".parse::<Role>().unwrap(), Role::Start);
        assert_eq!("Vignette".parse::<Role>().unwrap(), Role::Vignette);
        assert!("background".parse::<Role>().is_err());
    }

    #[test]
    fn test_missing_roles_fall_back_to_accent() {
        let accent = Colour::rgb(51, 102, 204);
        let colours = BTreeMap::from([(Role::Accent, accent), (Role::Text, Colour::WHITE)]);
        let roles = RoleColours::new(colours).unwrap();

        assert_eq!(roles.colour(Role::Text), Colour::WHITE);
        assert_eq!(roles.colour(Role::Frame), accent);
        assert_eq!(roles.get(Role::Frame), None);
    }

    #[test]
    fn test_missing_accent_is_an_error() {
        let colours = BTreeMap::from([(Role::Text, Colour::WHITE)]);
        let err = RoleColours::new(colours).unwrap_err();
        assert!(matches!(err, PreviewError::PaletteResolution { .. }));
    }
}
