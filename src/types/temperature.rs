// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Absolute temperature type with multi-unit ergonomics.
//!
//! This module provides a type-safe representation of an absolute
//! temperature. The value is stored canonically in Kelvin; Celsius,
//! Fahrenheit, and Rankine views are always recomputed from the stored
//! Kelvin value through an affine transform table, so derived units can
//! never drift out of sync.
//!
//! Temperatures below 0 K are unrepresentable: every constructor and
//! mutator validates the resulting Kelvin value before committing, and a
//! rejected operation leaves the prior value untouched.
//!
//! # Examples
//!
//! ```
//! use hubpulse::types::{Temperature, TemperatureUnit};
//!
//! let t = Temperature::from_fahrenheit(212.0).unwrap();
//! assert!((t.kelvin() - 373.15).abs() < 1e-9);
//! assert!((t.celsius() - 100.0).abs() < 1e-9);
//!
//! // Arithmetic operates on the Kelvin magnitude and re-validates.
//! let t1 = Temperature::new(40.0).unwrap();
//! let diff = (t - t1).unwrap();
//! assert!((diff.kelvin() - 333.15).abs() < 1e-9);
//! assert!((t1 - t).is_err()); // would be -333.15 K
//!
//! // Writing a derived unit mutates the canonical Kelvin store.
//! let mut t = Temperature::default();
//! t.set(TemperatureUnit::Fahrenheit, 100.0).unwrap();
//! assert!((t.kelvin() - 310.927_777).abs() < 1e-3);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use crate::error::ValueError;

/// A temperature unit understood by [`Temperature`].
///
/// Kelvin is the canonical stored unit; the other three are derived views
/// defined by an affine transform (see [`Temperature::get`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemperatureUnit {
    /// Kelvin, the canonical unit. Always non-negative.
    Kelvin,
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
    /// Degrees Rankine.
    Rankine,
}

impl TemperatureUnit {
    /// Returns the display symbol for this unit.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Kelvin => "K",
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
            Self::Rankine => "°R",
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TemperatureUnit {
    type Err = ValueError;

    /// Parses the one-letter unit tags used by the hub: `k`, `c`, `f`, `r`
    /// (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "k" | "K" => Ok(Self::Kelvin),
            "c" | "C" => Ok(Self::Celsius),
            "f" | "F" => Ok(Self::Fahrenheit),
            "r" | "R" => Ok(Self::Rankine),
            other => Err(ValueError::InvalidUnit(other.to_string())),
        }
    }
}

/// One row of the unit conversion table.
///
/// A derived value is `(kelvin + shift_in) * scale + shift_out`.
#[derive(Debug, Clone, Copy)]
struct UnitEquation {
    scale: f64,
    shift_in: f64,
    shift_out: f64,
}

/// Conversion table indexed by `TemperatureUnit as usize`.
///
/// Kelvin carries the identity row so reads and writes go through the same
/// path for every unit.
const EQUATIONS: [UnitEquation; 4] = [
    // Kelvin
    UnitEquation {
        scale: 1.0,
        shift_in: 0.0,
        shift_out: 0.0,
    },
    // Celsius
    UnitEquation {
        scale: 1.0,
        shift_in: 0.0,
        shift_out: -273.15,
    },
    // Fahrenheit
    UnitEquation {
        scale: 1.8,
        shift_in: -273.15,
        shift_out: 32.0,
    },
    // Rankine
    UnitEquation {
        scale: 1.8,
        shift_in: 0.0,
        shift_out: 0.0,
    },
];

/// An absolute temperature, stored canonically in Kelvin.
///
/// `Temperature` behaves like a number: it supports comparison and the four
/// basic arithmetic operators against another `Temperature` or a bare
/// numeric value (interpreted as Kelvin). Arithmetic returns
/// `Result<Temperature, ValueError>` because any result below 0 K is
/// rejected.
///
/// # Examples
///
/// ```
/// use hubpulse::types::Temperature;
///
/// let t = Temperature::new(1.0).unwrap();
/// assert_eq!(t.to_string(), "1 K");
/// assert!((t.celsius() + 272.15).abs() < 1e-9);
///
/// let doubled = (t * 2.0).unwrap();
/// assert!(doubled > t);
/// assert!(doubled == 2.0); // bare numbers compare as Kelvin
///
/// assert!(Temperature::new(-5.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Temperature {
    kelvin: f64,
}

impl Temperature {
    /// Absolute zero (0 K).
    pub const ZERO: Self = Self { kelvin: 0.0 };

    /// Creates a temperature from a Kelvin value.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if `kelvin` is negative
    /// or not a number.
    pub fn new(kelvin: f64) -> Result<Self, ValueError> {
        Self::validated(kelvin)
    }

    /// Creates a temperature from a value in the given unit.
    ///
    /// The tagged-unit constructor replaces keyword-style construction: a
    /// temperature is built from exactly one unit, never an ambiguous mix.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the equivalent Kelvin
    /// value would be negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use hubpulse::types::{Temperature, TemperatureUnit};
    ///
    /// let t = Temperature::from_unit(TemperatureUnit::Celsius, 0.0).unwrap();
    /// assert!((t.kelvin() - 273.15).abs() < 1e-9);
    /// ```
    pub fn from_unit(unit: TemperatureUnit, value: f64) -> Result<Self, ValueError> {
        Self::validated(invert(unit, value))
    }

    /// Creates a temperature from degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] below -273.15 °C.
    pub fn from_celsius(value: f64) -> Result<Self, ValueError> {
        Self::from_unit(TemperatureUnit::Celsius, value)
    }

    /// Creates a temperature from degrees Fahrenheit.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] below -459.67 °F.
    pub fn from_fahrenheit(value: f64) -> Result<Self, ValueError> {
        Self::from_unit(TemperatureUnit::Fahrenheit, value)
    }

    /// Creates a temperature from degrees Rankine.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] below 0 °R.
    pub fn from_rankine(value: f64) -> Result<Self, ValueError> {
        Self::from_unit(TemperatureUnit::Rankine, value)
    }

    /// Returns the value in the given unit.
    ///
    /// Kelvin is read directly; every other unit is recomputed from the
    /// stored Kelvin value on each call.
    #[must_use]
    pub fn get(&self, unit: TemperatureUnit) -> f64 {
        let eq = EQUATIONS[unit as usize];
        (self.kelvin + eq.shift_in) * eq.scale + eq.shift_out
    }

    /// Returns the Kelvin value.
    #[must_use]
    pub fn kelvin(&self) -> f64 {
        self.kelvin
    }

    /// Returns the value in degrees Celsius.
    #[must_use]
    pub fn celsius(&self) -> f64 {
        self.get(TemperatureUnit::Celsius)
    }

    /// Returns the value in degrees Fahrenheit.
    #[must_use]
    pub fn fahrenheit(&self) -> f64 {
        self.get(TemperatureUnit::Fahrenheit)
    }

    /// Returns the value in degrees Rankine.
    #[must_use]
    pub fn rankine(&self) -> f64 {
        self.get(TemperatureUnit::Rankine)
    }

    /// Sets the temperature from a value in the given unit.
    ///
    /// Writing any derived unit mutates the canonical Kelvin store by
    /// inverting the transform. The write is atomic: validation happens
    /// before the commit, and on error the previous value is kept.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the equivalent Kelvin
    /// value would be negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use hubpulse::types::{Temperature, TemperatureUnit};
    ///
    /// let mut t = Temperature::new(300.0).unwrap();
    /// t.set(TemperatureUnit::Celsius, 0.0).unwrap();
    /// assert!((t.kelvin() - 273.15).abs() < 1e-9);
    ///
    /// // A rejected write leaves the value untouched.
    /// assert!(t.set(TemperatureUnit::Celsius, -300.0).is_err());
    /// assert!((t.kelvin() - 273.15).abs() < 1e-9);
    /// ```
    pub fn set(&mut self, unit: TemperatureUnit, value: f64) -> Result<(), ValueError> {
        self.kelvin = Self::validated(invert(unit, value))?.kelvin;
        Ok(())
    }

    /// Adds a Kelvin magnitude in place.
    ///
    /// The right-hand side may be another `Temperature` or a bare number.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the result would drop
    /// below 0 K; the value is left unchanged in that case.
    pub fn add_assign(&mut self, rhs: impl Into<f64>) -> Result<(), ValueError> {
        self.kelvin = Self::validated(self.kelvin + rhs.into())?.kelvin;
        Ok(())
    }

    /// Subtracts a Kelvin magnitude in place.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the result would drop
    /// below 0 K; the value is left unchanged in that case.
    pub fn sub_assign(&mut self, rhs: impl Into<f64>) -> Result<(), ValueError> {
        self.kelvin = Self::validated(self.kelvin - rhs.into())?.kelvin;
        Ok(())
    }

    /// Multiplies the Kelvin magnitude in place.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the result would drop
    /// below 0 K; the value is left unchanged in that case.
    pub fn mul_assign(&mut self, rhs: impl Into<f64>) -> Result<(), ValueError> {
        self.kelvin = Self::validated(self.kelvin * rhs.into())?.kelvin;
        Ok(())
    }

    /// Divides the Kelvin magnitude in place.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError::InvalidTemperature`] if the result would drop
    /// below 0 K or is not a number; the value is left unchanged in that
    /// case.
    pub fn div_assign(&mut self, rhs: impl Into<f64>) -> Result<(), ValueError> {
        self.kelvin = Self::validated(self.kelvin / rhs.into())?.kelvin;
        Ok(())
    }

    /// Returns the Kelvin value truncated to an integer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn truncated(&self) -> i64 {
        self.kelvin as i64
    }

    /// Validates a candidate Kelvin value.
    fn validated(kelvin: f64) -> Result<Self, ValueError> {
        if kelvin.is_nan() || kelvin < 0.0 {
            return Err(ValueError::InvalidTemperature { kelvin });
        }
        Ok(Self { kelvin })
    }
}

/// Inverts the affine transform: unit value back to Kelvin.
fn invert(unit: TemperatureUnit, value: f64) -> f64 {
    let eq = EQUATIONS[unit as usize];
    (value - eq.shift_out) / eq.scale - eq.shift_in
}

impl Default for Temperature {
    /// Absolute zero, matching construction with no value.
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} K", self.kelvin)
    }
}

impl fmt::Debug for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temperature({})", self.kelvin)
    }
}

impl From<Temperature> for f64 {
    /// Returns the Kelvin magnitude.
    fn from(value: Temperature) -> Self {
        value.kelvin
    }
}

impl TryFrom<f64> for Temperature {
    type Error = ValueError;

    fn try_from(kelvin: f64) -> Result<Self, Self::Error> {
        Self::new(kelvin)
    }
}

impl PartialEq<f64> for Temperature {
    /// Compares the Kelvin magnitude against a bare number.
    fn eq(&self, other: &f64) -> bool {
        self.kelvin == *other
    }
}

impl PartialEq<Temperature> for f64 {
    fn eq(&self, other: &Temperature) -> bool {
        *self == other.kelvin
    }
}

impl PartialOrd<f64> for Temperature {
    fn partial_cmp(&self, other: &f64) -> Option<std::cmp::Ordering> {
        self.kelvin.partial_cmp(other)
    }
}

impl PartialOrd<Temperature> for f64 {
    fn partial_cmp(&self, other: &Temperature) -> Option<std::cmp::Ordering> {
        self.partial_cmp(&other.kelvin)
    }
}

impl<R: Into<f64>> Add<R> for Temperature {
    type Output = Result<Temperature, ValueError>;

    fn add(self, rhs: R) -> Self::Output {
        Temperature::new(self.kelvin + rhs.into())
    }
}

impl<R: Into<f64>> Sub<R> for Temperature {
    type Output = Result<Temperature, ValueError>;

    fn sub(self, rhs: R) -> Self::Output {
        Temperature::new(self.kelvin - rhs.into())
    }
}

impl<R: Into<f64>> Mul<R> for Temperature {
    type Output = Result<Temperature, ValueError>;

    fn mul(self, rhs: R) -> Self::Output {
        Temperature::new(self.kelvin * rhs.into())
    }
}

impl<R: Into<f64>> Div<R> for Temperature {
    type Output = Result<Temperature, ValueError>;

    fn div(self, rhs: R) -> Self::Output {
        Temperature::new(self.kelvin / rhs.into())
    }
}
