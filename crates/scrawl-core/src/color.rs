//! Color values and themes.
//!
//! Colors arrive from the shell as CSS strings (`#FF0000`, `rgb(0 128 0)`,
//! `rebeccapurple`) and are kept as straight-alpha RGBA8 from then on.

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("Invalid color '{input}': {reason}")]
    Invalid { input: String, reason: String },
}

/// Serializable color representation (RGBA8, straight alpha).
///
/// Serializes as a CSS hex string so session files stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse any CSS color string.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let parsed = parse_color(input.trim()).map_err(|e| ColorParseError::Invalid {
            input: input.to_string(),
            reason: e.to_string(),
        })?;
        Ok(parsed.to_alpha_color::<Srgb>().into())
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Lowercase hex form, `#rrggbb` or `#rrggbbaa` when translucent.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rgba {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Rgba> for String {
    fn from(color: Rgba) -> Self {
        color.to_hex()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// Named theme selectable by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    #[default]
    Dark,
}

impl ThemeKind {
    pub fn theme(self) -> Theme {
        match self {
            ThemeKind::Light => Theme::light(),
            ThemeKind::Dark => Theme::dark(),
        }
    }
}

/// Surface colors: the background used for clears and the eraser, and the
/// primary color used for overlays (image frame, table, ruler).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub background: Rgba,
    pub primary: Rgba,
}

impl Theme {
    pub const fn light() -> Self {
        Self {
            background: Rgba::white(),
            primary: Rgba::rgb(24, 24, 27),
        }
    }

    pub const fn dark() -> Self {
        Self {
            background: Rgba::black(),
            primary: Rgba::rgb(250, 250, 250),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        ThemeKind::default().theme()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Rgba::parse("#FF0000").unwrap(), Rgba::rgb(255, 0, 0));
        assert_eq!(Rgba::parse("#00ff0080").unwrap(), Rgba::new(0, 255, 0, 128));
    }

    #[test]
    fn test_parse_named_and_functional() {
        assert_eq!(Rgba::parse("white").unwrap(), Rgba::white());
        assert_eq!(Rgba::parse(" rgb(0, 0, 255) ").unwrap(), Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Rgba::parse("not-a-color").is_err());
        assert!("".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(Rgba::rgb(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(Rgba::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Rgba::rgb(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");
        let back: Rgba = serde_json::from_str("\"#FF0000\"").unwrap();
        assert_eq!(back, Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn test_themes() {
        assert_eq!(Theme::light().background, Rgba::white());
        assert_eq!(Theme::dark().background, Rgba::black());
        assert_eq!(Theme::default(), Theme::dark());
    }
}
