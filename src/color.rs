//! 32-bit ARGB colors and the two channel operations the theme needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A packed `0xAARRGGBB` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Argb(pub u32);

impl Argb {
    pub const fn new(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Argb((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Same RGB, alpha replaced.
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Argb((self.0 & 0x00FF_FFFF) | (alpha as u32) << 24)
    }

    /// Scale the alpha channel by `ratio`, rounding half up. RGB is untouched.
    pub fn scale_alpha(self, ratio: AlphaRatio) -> Self {
        let permille = u32::from(ratio.0);
        let scaled = (u32::from(self.alpha()) * permille + 500) / 1000;
        self.with_alpha(scaled.min(255) as u8)
    }

    /// RGB from `self`, alpha from `alpha_source`.
    pub const fn apply_alpha_of(self, alpha_source: Argb) -> Self {
        self.with_alpha(alpha_source.alpha())
    }
}

/// An alpha multiplier in thousandths, so that rounding stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlphaRatio(u16);

impl AlphaRatio {
    pub const FULL: AlphaRatio = AlphaRatio(1000);
    pub const NINE_TENTHS: AlphaRatio = AlphaRatio(900);
    pub const SEVEN_TENTHS: AlphaRatio = AlphaRatio(700);
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Argb {
    type Err = Error;

    /// Accepts `#AARRGGBB` or `#RRGGBB` (opaque). The leading `#` is optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidColor(s.to_string()))?;
        match hex.len() {
            8 => Ok(Argb(value)),
            6 => Ok(Argb(0xFF00_0000 | value)),
            _ => Err(Error::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Argb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Argb> for String {
    fn from(color: Argb) -> Self {
        color.to_string()
    }
}
