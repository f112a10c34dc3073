//! Shared protocol crate for pixelwar.
//!
//! This crate contains:
//! - Player action definitions (the sole state import)
//! - Snapshot definitions (the sole state export)
//! - Shared types (Color, Position)

mod actions;
mod error;
mod state;

pub use actions::{GameAction, SelectedEntity};
pub use error::ProtocolError;
pub use state::{PixelGroupState, PixelState, PlayerState, ServerState};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents a 2D position using glam's Vec2.
pub type Position = glam::Vec2;

/// RGB color used for players and pixels.
///
/// Serialized as a CSS hex string (`"#ff4d4d"`), matching the palette
/// format the clients consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ProtocolError::InvalidColor(s.to_string()))?;
        if hex.len() != 6 {
            return Err(ProtocolError::InvalidColor(s.to_string()));
        }
        let parse = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| ProtocolError::InvalidColor(s.to_string()))
        };
        Ok(Self {
            r: parse(0..2)?,
            g: parse(2..4)?,
            b: parse(4..6)?,
        })
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl TryFrom<String> for Color {
    type Error = ProtocolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_roundtrip() {
        let color: Color = "#ff4d4d".parse().unwrap();
        assert_eq!(color, Color::new(255, 77, 77));
        assert_eq!(color.to_string(), "#ff4d4d");
    }

    #[test]
    fn test_color_rejects_bad_hex() {
        assert!("ff4d4d".parse::<Color>().is_err());
        assert!("#ff4d".parse::<Color>().is_err());
        assert!("#zzzzzz".parse::<Color>().is_err());
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::new(0, 230, 230)).unwrap();
        assert_eq!(json, "\"#00e6e6\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::new(0, 230, 230));
    }
}
