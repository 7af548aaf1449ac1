// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device kinds and the type-string registry.
//!
//! Instead of one subclass per device type, the library uses a closed
//! variant set with two capability hooks: [`DeviceKind::parse`] turns a
//! raw heartbeat value into a typed [`Reading`], and
//! [`DeviceKind::externalize`] renders a reading in JSON-safe form. Most
//! kinds pass values straight through; temperature sensors are the one
//! kind with real parsing.

use std::fmt;

use serde_json::Value;

use crate::error::{ParseError, Result};
use crate::types::{Reading, Temperature};

/// The kind of a hub device.
///
/// Resolved from the hub's device-type string at construction time via
/// [`DeviceKind::from_type_str`]. Unrecognized type strings fall back to
/// [`DeviceKind::Generic`], which treats readings as opaque pass-through
/// values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Any device without a registered specialization.
    #[default]
    Generic,
    /// Reports temperature in degrees Celsius; readings parse into
    /// [`Temperature`] values.
    TemperatureSensor,
    /// Reports relative humidity as a bare number.
    HumiditySensor,
    /// Reports light level as a bare number.
    LightSensor,
    /// Reports orientation data.
    Accelerometer,
    /// A push button; reading `0` means pushed.
    Button,
    /// An RGB LED actuator controlled through color writes.
    RgbLed,
}

impl DeviceKind {
    /// Resolves a hub device-type string to a kind.
    ///
    /// Returns `None` for unrecognized strings; the factory decides the
    /// fallback (normally [`DeviceKind::Generic`]).
    ///
    /// # Examples
    ///
    /// ```
    /// use hubpulse::DeviceKind;
    ///
    /// assert_eq!(DeviceKind::from_type_str("rgbled"), Some(DeviceKind::RgbLed));
    /// assert_eq!(DeviceKind::from_type_str("sandwich"), None);
    /// ```
    #[must_use]
    pub fn from_type_str(device_type: &str) -> Option<Self> {
        match device_type {
            "button" => Some(Self::Button),
            "rgbled" => Some(Self::RgbLed),
            "orientation" => Some(Self::Accelerometer),
            "temperature" => Some(Self::TemperatureSensor),
            "humidity" => Some(Self::HumiditySensor),
            "light" => Some(Self::LightSensor),
            _ => None,
        }
    }

    /// Parses a raw heartbeat value into a typed reading.
    ///
    /// The default is a pass-through; temperature sensors interpret the
    /// raw value as degrees Celsius.
    ///
    /// # Errors
    ///
    /// Returns an error if a temperature value is not numeric or lies
    /// below absolute zero.
    pub fn parse(&self, raw: &Value) -> Result<Reading> {
        match self {
            Self::TemperatureSensor => {
                let celsius = raw.as_f64().ok_or_else(|| {
                    ParseError::UnexpectedFormat(format!(
                        "temperature reading must be numeric, got {raw}"
                    ))
                })?;
                Ok(Reading::Temperature(Temperature::from_celsius(celsius)?))
            }
            _ => Ok(Reading::from_raw(raw)),
        }
    }

    /// Renders a reading in JSON-safe form.
    ///
    /// The default is the reading's raw JSON; temperature readings render
    /// as their bare Kelvin magnitude rather than a structured value.
    #[must_use]
    pub fn externalize(&self, reading: &Reading) -> Value {
        match (self, reading) {
            (Self::TemperatureSensor, Reading::Temperature(t)) => {
                serde_json::Number::from_f64(t.kelvin()).map_or(Value::Null, Value::Number)
            }
            _ => reading.to_json(),
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generic => "Device",
            Self::TemperatureSensor => "TemperatureSensor",
            Self::HumiditySensor => "HumiditySensor",
            Self::LightSensor => "LightSensor",
            Self::Accelerometer => "Accelerometer",
            Self::Button => "Button",
            Self::RgbLed => "RgbLed",
        };
        f.write_str(name)
    }
}
