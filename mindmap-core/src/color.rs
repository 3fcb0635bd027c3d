//! `#RRGGBB` colors and the outline darkening used by the render pass.

use crate::error::{MindmapError, Result};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn parse_hex(color: &str) -> Result<Self> {
        let digits = color.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MindmapError::InvalidColor(color.to_string()));
        }
        let packed = u32::from_str_radix(digits, 16)
            .map_err(|_| MindmapError::InvalidColor(color.to_string()))?;
        Ok(Self {
            r: (packed >> 16) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        })
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Subtract `round(2.55 * percent)` from every channel, clamped to 0..=255.
    /// A negative percent lightens.
    pub fn darken(self, percent: f64) -> Self {
        let amount = (2.55 * percent).round() as i32;
        let shift = |channel: u8| (i32::from(channel) - amount).clamp(0, 255) as u8;
        Self {
            r: shift(self.r),
            g: shift(self.g),
            b: shift(self.b),
        }
    }
}

pub fn darken_color(color: &str, percent: f64) -> Result<String> {
    Ok(Rgb::parse_hex(color)?.darken(percent).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_darken_by_twenty_percent() {
        // 2.55 * 20 = 51
        assert_eq!(darken_color("#86EFAC", 20.0).unwrap(), "#53bc79");
        assert_eq!(darken_color("#FFFFFF", 20.0).unwrap(), "#cccccc");
    }

    #[test]
    fn test_darken_clamps_at_zero() {
        assert_eq!(darken_color("#102030", 20.0).unwrap(), "#000000");
        assert_eq!(darken_color("#400000", 20.0).unwrap(), "#0d0000");
    }

    #[test]
    fn test_negative_percent_lightens_and_clamps() {
        assert_eq!(darken_color("#f0f0f0", -20.0).unwrap(), "#ffffff");
    }

    #[test]
    fn test_rounding_of_amount() {
        // 2.55 * 10 = 25.5 -> 26
        assert_eq!(darken_color("#646464", 10.0).unwrap(), "#4a4a4a");
    }

    #[test]
    fn test_invalid_colors() {
        for bad in ["", "#fff", "red", "#12345g", "#1234567"] {
            assert_eq!(
                darken_color(bad, 20.0),
                Err(MindmapError::InvalidColor(bad.to_string())),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_without_hash() {
        assert_eq!(Rgb::parse_hex("0a0B0c").unwrap(), Rgb { r: 10, g: 11, b: 12 });
    }
}
