//! 24-bit panel colours and the grey-out transforms.
//!
//! Colours are plain RGB triples. The panel driver converts to its native
//! pixel format; nothing above the [`DisplaySurface`](super::DisplaySurface)
//! boundary cares about 565 packing or byte order.

use std::str::FromStr;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GREY: Color = Color::rgb(100, 100, 100);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const LIGHTGREEN: Color = Color::rgb(0, 80, 0);
    pub const DARKGREEN: Color = Color::rgb(0, 40, 0);
    pub const LIGHTBLUE: Color = Color::rgb(0, 0, 80);

    /// Create a colour from its components.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Divide every channel by `factor`.
    #[inline]
    pub const fn dim(self, factor: u8) -> Self {
        if factor == 0 {
            return self;
        }
        Self { r: self.r / factor, g: self.g / factor, b: self.b / factor }
    }

    /// Grey level of the brightest channel, divided by `factor`.
    #[inline]
    pub fn desaturate(self, factor: u8) -> Self {
        let level = self.r.max(self.g).max(self.b) / factor.max(1);
        Self { r: level, g: level, b: level }
    }
}

/// Parse a hex (`#rrggbb`, `#rgb`) or named colour.
///
/// Names are case-insensitive and cover the constants on [`Color`].
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| format!("invalid hex colour: #{hex}"));
        }
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Color::WHITE),
            "black" => Ok(Color::BLACK),
            "red" => Ok(Color::RED),
            "green" => Ok(Color::GREEN),
            "blue" => Ok(Color::BLUE),
            "yellow" => Ok(Color::YELLOW),
            "grey" | "gray" => Ok(Color::GREY),
            "magenta" => Ok(Color::MAGENTA),
            "cyan" => Ok(Color::CYAN),
            "lightgreen" | "light_green" => Ok(Color::LIGHTGREEN),
            "darkgreen" | "dark_green" => Ok(Color::DARKGREEN),
            "lightblue" | "light_blue" => Ok(Color::LIGHTBLUE),
            other => Err(format!("unknown colour name: {other}")),
        }
    }
}

/// Parse a hex colour string (without the leading `#`).
fn parse_hex(hex: &str) -> Option<Color> {
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            // Expand: 0xA -> 0xAA
            Some(Color::rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dim_divides_channels() {
        assert_eq!(Color::rgb(200, 100, 51).dim(2), Color::rgb(100, 50, 25));
        assert_eq!(Color::WHITE.dim(0), Color::WHITE);
    }

    #[test]
    fn desaturate_uses_brightest_channel() {
        assert_eq!(Color::rgb(10, 200, 30).desaturate(2), Color::rgb(100, 100, 100));
        assert_eq!(Color::RED.desaturate(1), Color::rgb(255, 255, 255));
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!("#ff8800".parse::<Color>(), Ok(Color::rgb(255, 136, 0)));
        assert_eq!("#FFF".parse::<Color>(), Ok(Color::WHITE));
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gg0000".parse::<Color>().is_err());
    }

    #[test]
    fn parse_named_colours() {
        assert_eq!("Red".parse::<Color>(), Ok(Color::RED));
        assert_eq!(" gray ".parse::<Color>(), Ok(Color::GREY));
        assert_eq!("dark_green".parse::<Color>(), Ok(Color::DARKGREEN));
        assert!("chartreuse".parse::<Color>().is_err());
    }
}
