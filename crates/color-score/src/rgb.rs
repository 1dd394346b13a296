//! 24-bit RGB color type
//!
//! Colors travel through the game as `#RRGGBB` strings. [`Rgb`] is the parsed
//! form used for arithmetic; its [`Display`](std::fmt::Display) output is the
//! canonical uppercase hex string.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseColorError;

/// A color in 8-bit-per-channel device RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Pure black, `#000000`.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Pure white, `#FFFFFF`.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from its three channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canonical `#RRGGBB` form, uppercase.
    ///
    /// # Example
    /// ```
    /// use color_score::Rgb;
    /// assert_eq!(Rgb::new(255, 128, 0).to_hex(), "#FF8000");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Euclidean distance to `other` in RGB space.
    pub fn distance(self, other: Rgb) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB` or `RRGGBB`, case-insensitive. Whitespace and
    /// shorthand forms are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);

        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ParseColorError::InvalidHex(bad));
        }
        if digits.len() != 6 {
            return Err(ParseColorError::InvalidLength(digits.len()));
        }

        // All six bytes are ASCII hex digits, so the slices and radix parses cannot fail.
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or(0);
        Ok(Self::new(channel(0), channel(2), channel(4)))
    }
}
