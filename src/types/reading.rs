// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parsed device readings.
//!
//! A [`Reading`] is the typed form of the raw `DA` value a heartbeat
//! carries. Most device kinds pass the raw value through; temperature
//! sensors parse it into a [`Temperature`](super::Temperature). Change
//! detection compares readings by value.

use serde_json::Value;

use super::{RgbColor, Temperature};

/// A device's parsed data value.
///
/// Equality is value equality, which is what drives `Change` event
/// detection between consecutive heartbeats.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Reading {
    /// A parsed temperature (temperature sensors).
    Temperature(Temperature),
    /// A bare numeric value (humidity, light level, button state, ...).
    Number(f64),
    /// A string value (LED color strings, ...).
    Text(String),
    /// Anything else, kept as raw JSON.
    Raw(Value),
}

impl Reading {
    /// Builds a pass-through reading from a raw payload value.
    ///
    /// Numbers and strings get their typed variants; other JSON shapes are
    /// kept raw.
    #[must_use]
    pub fn from_raw(raw: &Value) -> Self {
        if let Some(n) = raw.as_f64() {
            Self::Number(n)
        } else if let Some(s) = raw.as_str() {
            Self::Text(s.to_string())
        } else {
            Self::Raw(raw.clone())
        }
    }

    /// Returns the reading as raw JSON.
    ///
    /// Temperatures render as their Kelvin magnitude, which is the
    /// JSON-safe external form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Temperature(t) => json_number(t.kelvin()),
            Self::Number(n) => json_number(*n),
            Self::Text(s) => Value::String(s.clone()),
            Self::Raw(v) => v.clone(),
        }
    }

    /// Returns the numeric magnitude, if this reading has one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Temperature(t) => Some(t.kelvin()),
            Self::Number(n) => Some(*n),
            Self::Raw(v) => v.as_f64(),
            Self::Text(_) => None,
        }
    }

    /// Interprets the reading as an LED color string, if possible.
    #[must_use]
    pub fn as_color(&self) -> Option<RgbColor> {
        match self {
            Self::Text(s) => RgbColor::from_hex(s).ok(),
            _ => None,
        }
    }
}

fn json_number(n: f64) -> Value {
    serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
}
