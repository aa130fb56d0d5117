//! Opaque RGB fill colors.

use std::fmt;
use std::str::FromStr;

use image::Rgb;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Returned when a string is neither a hex triplet nor a known color name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}': use a hex color (e.g. #FF5733) or a basic color name")]
pub struct ParseColorError(pub String);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Parse `#RRGGBB`, `#RGB` or a CSS basic color name (case-insensitive).
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let trimmed = input.trim();
        let err = || ParseColorError(input.to_string());

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(err());
            }
            return match hex.len() {
                6 => u32::from_str_radix(hex, 16)
                    .map(Self::from_hex)
                    .map_err(|_| err()),
                3 => {
                    // #abc expands to #aabbcc
                    let mut channels = hex.chars().map(|c| {
                        let v = c.to_digit(16).unwrap_or(0) as u8;
                        v * 17
                    });
                    match (channels.next(), channels.next(), channels.next()) {
                        (Some(r), Some(g), Some(b)) => Ok(Self::rgb(r, g, b)),
                        _ => Err(err()),
                    }
                }
                _ => Err(err()),
            };
        }

        named_color(&trimmed.to_ascii_lowercase()).ok_or_else(err)
    }

    pub fn to_cosmic(self) -> cosmic_text::Color {
        cosmic_text::Color::rgb(self.r, self.g, self.b)
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The strict form accepted from requests: `#` followed by six hex digits.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn named_color(name: &str) -> Option<Color> {
    let hex = match name {
        "black" => 0x000000,
        "white" => 0xFFFFFF,
        "red" => 0xFF0000,
        "green" => 0x008000,
        "lime" => 0x00FF00,
        "blue" => 0x0000FF,
        "yellow" => 0xFFFF00,
        "cyan" | "aqua" => 0x00FFFF,
        "magenta" | "fuchsia" => 0xFF00FF,
        "gray" | "grey" => 0x808080,
        "silver" => 0xC0C0C0,
        "maroon" => 0x800000,
        "olive" => 0x808000,
        "navy" => 0x000080,
        "purple" => 0x800080,
        "teal" => 0x008080,
        "orange" => 0xFFA500,
        _ => return None,
    };
    Some(Color::from_hex(hex))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#FF0000"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("#1a2B3c"), Ok(Color::rgb(0x1a, 0x2b, 0x3c)));
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Color::parse("#f80"), Ok(Color::rgb(0xff, 0x88, 0x00)));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(Color::parse("Red"), Ok(Color::rgb(255, 0, 0)));
        assert_eq!(Color::parse("grey"), Color::parse("gray"));
        assert_eq!(Color::parse("white"), Ok(Color::WHITE));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "#", "#12345", "#1234567", "#GGGGGG", "FF0000", "notacolor"] {
            assert!(Color::parse(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        let color: Color = "#AbCdEf".parse().unwrap();
        assert_eq!(color.to_string(), "#abcdef");
        assert_eq!(Color::parse(&color.to_string()), Ok(color));
    }

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#000000"));
        assert!(is_hex_color("#FF5733"));
        assert!(!is_hex_color("#FFF"));
        assert!(!is_hex_color("red"));
        assert!(!is_hex_color("#FF573Z"));
        assert!(!is_hex_color("FF57331"));
    }

    #[test]
    fn test_conversions() {
        let color = Color::from_hex(0x102030);
        assert_eq!(color.to_rgb(), Rgb([0x10, 0x20, 0x30]));
        let cosmic = color.to_cosmic();
        assert_eq!((cosmic.r(), cosmic.g(), cosmic.b(), cosmic.a()), (0x10, 0x20, 0x30, 255));
    }
}
