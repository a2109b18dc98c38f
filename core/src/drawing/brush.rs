use alloc::{format, string::String};
use serde::{Deserialize, Serialize};

use super::Rgba8;

/// Opaque stroke color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Self = Self::rgb(0xef, 0x44, 0x44);
    pub const ORANGE: Self = Self::rgb(0xf9, 0x73, 0x16);
    pub const YELLOW: Self = Self::rgb(0xea, 0xb3, 0x08);
    pub const GREEN: Self = Self::rgb(0x22, 0xc5, 0x5e);
    pub const BLUE: Self = Self::rgb(0x3b, 0x82, 0xf6);
    pub const PURPLE: Self = Self::rgb(0xa8, 0x55, 0xf7);
    pub const PINK: Self = Self::rgb(0xec, 0x48, 0x99);
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgba(self) -> Rgba8 {
        [self.r, self.g, self.b, 0xff]
    }

    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// CSS notation, `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLUE
    }
}

pub const PALETTE: [Color; 8] = [
    Color::RED,
    Color::ORANGE,
    Color::YELLOW,
    Color::GREEN,
    Color::BLUE,
    Color::PURPLE,
    Color::PINK,
    Color::BLACK,
];

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BrushSize {
    #[default]
    Thin,
    Medium,
    Thick,
}

impl BrushSize {
    pub const ALL: [BrushSize; 3] = [BrushSize::Thin, BrushSize::Medium, BrushSize::Thick];

    /// Line width in pixels.
    pub const fn width(self) -> u8 {
        use BrushSize::*;
        match self {
            Thin => 5,
            Medium => 10,
            Thick => 20,
        }
    }

    pub(crate) fn radius(self) -> f32 {
        f32::from(self.width()) / 2.0
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brush {
    pub color: Color,
    pub size: BrushSize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trips_palette() {
        for color in PALETTE {
            assert_eq!(Color::from_hex(&color.to_hex()), Some(color));
        }
        assert_eq!(Color::BLUE.to_hex(), "#3b82f6");
    }

    #[test]
    fn from_hex_rejects_malformed_input() {
        assert_eq!(Color::from_hex("3b82f6"), None);
        assert_eq!(Color::from_hex("#3b82f"), None);
        assert_eq!(Color::from_hex("#3b82fg"), None);
        assert_eq!(Color::from_hex("#ab🐱"), None);
    }

    #[test]
    fn default_brush_is_thin_blue() {
        let brush = Brush::default();
        assert_eq!(brush.color, Color::BLUE);
        assert_eq!(brush.size.width(), 5);
        assert_eq!(BrushSize::Thick.width(), 20);
    }
}
