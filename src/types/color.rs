// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type for LED control.
//!
//! The hub encodes LED colors as six-digit uppercase hex strings in the
//! `DA` payload field; [`RgbColor`] is the typed form of that encoding.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use hubpulse::types::RgbColor;
///
/// // Create from RGB values
/// let orange = RgbColor::new(255, 128, 0);
/// assert_eq!(orange.red(), 255);
///
/// // Parse from hex string
/// let red = RgbColor::from_hex("#FF0000").unwrap();
/// assert_eq!(red.red(), 255);
/// assert_eq!(red.green(), 0);
///
/// // The wire form is a six-digit uppercase hex string
/// assert_eq!(red.to_string(), "FF0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Full white, the fallback color when an LED is turned on with no
    /// remembered color.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Black, the off color.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts formats: `#RRGGBB`, `RRGGBB`, `#RGB`, `RGB`
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidHexColor`] if the hex string is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hubpulse::types::RgbColor;
    ///
    /// let color = RgbColor::from_hex("00FF00").unwrap();
    /// assert_eq!(color.green(), 255);
    ///
    /// // Short format
    /// let color = RgbColor::from_hex("#F00").unwrap();
    /// assert_eq!(color.red(), 255);
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let stripped = hex.trim_start_matches('#');

        match stripped.len() {
            3 => {
                // Short format: RGB -> RRGGBB
                let chars: Vec<char> = stripped.chars().collect();
                let r = parse_hex_char(chars[0], hex)?;
                let g = parse_hex_char(chars[1], hex)?;
                let b = parse_hex_char(chars[2], hex)?;
                // Expand 0-F to 0-255
                Ok(Self::new(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = parse_hex_pair(&stripped[0..2], hex)?;
                let g = parse_hex_pair(&stripped[2..4], hex)?;
                let b = parse_hex_pair(&stripped[4..6], hex)?;
                Ok(Self::new(r, g, b))
            }
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as a six-digit uppercase hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Parses a single hex digit.
fn parse_hex_char(c: char, original: &str) -> Result<u8, ValueError> {
    c.to_digit(16)
        .map(|d| u8::try_from(d).unwrap_or(0))
        .ok_or_else(|| ValueError::InvalidHexColor(original.to_string()))
}

/// Parses a two-digit hex pair.
fn parse_hex_pair(pair: &str, original: &str) -> Result<u8, ValueError> {
    u8::from_str_radix(pair, 16).map_err(|_| ValueError::InvalidHexColor(original.to_string()))
}
