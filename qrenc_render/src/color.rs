use std::fmt;
use std::str::FromStr;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Get the color without its alpha channel as six lowercase hex digits.
    /// # Example
    /// ```
    /// use qrenc_render::Color;
    /// assert_eq!(Color::rgba(0x12, 0xab, 0xff, 0x80).hex_rgb(), "12abff");
    /// ```
    pub fn hex_rgb(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Get the red, green and blue channels scaled to `0.0..=1.0`.
    pub(crate) fn ratios(&self) -> [f64; 3] {
        [self.r, self.g, self.b].map(|channel| f64::from(channel) / 255.0)
    }

    pub(crate) fn opacity(&self) -> f64 {
        f64::from(self.a) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:02x}", self.hex_rgb(), self.a)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color '{0}', expected RRGGBB or RRGGBBAA in hexadecimal")]
pub struct ColorError(pub String);

impl FromStr for Color {
    type Err = ColorError;

    /// Parse a color written as `RRGGBB` or `RRGGBBAA`. Without an alpha channel the color is
    /// opaque.
    /// # Example
    /// ```
    /// use qrenc_render::Color;
    /// assert_eq!("ff0000".parse(), Ok(Color::rgb(255, 0, 0)));
    /// assert_eq!("00FF0080".parse(), Ok(Color::rgba(0, 255, 0, 128)));
    /// assert!("fff".parse::<Color>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = || ColorError(s.to_string());
        if !(s.len() == 6 || s.len() == 8) || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(error());
        }
        let channel = |i: usize| u8::from_str_radix(&s[2 * i..2 * i + 2], 16).map_err(|_| error());
        let alpha = if s.len() == 8 { channel(3)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, alpha))
    }
}
