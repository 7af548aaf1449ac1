// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device descriptor records.

use serde::Deserialize;

/// The descriptor record the hub reports for a discovered device.
///
/// Field names follow the hub's wire format; the sensor/actuator flags
/// arrive as `0`/`1` integers.
///
/// # Examples
///
/// ```
/// use hubpulse::DeviceDescriptor;
///
/// let json = r#"{"device_type":"temperature","shortName":"Greenhouse","is_sensor":1,"is_actuator":0}"#;
/// let descriptor: DeviceDescriptor = serde_json::from_str(json).unwrap();
///
/// assert_eq!(descriptor.device_type.as_deref(), Some("temperature"));
/// assert!(descriptor.sensor());
/// assert!(!descriptor.actuator());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeviceDescriptor {
    /// The hub's device-type string (e.g. `"temperature"`, `"rgbled"`).
    #[serde(default)]
    pub device_type: Option<String>,
    /// Human-readable device name.
    #[serde(rename = "shortName", default)]
    pub short_name: Option<String>,
    /// `1` if the device reports readings.
    #[serde(default)]
    pub is_sensor: u8,
    /// `1` if the device accepts writes.
    #[serde(default)]
    pub is_actuator: u8,
}

impl DeviceDescriptor {
    /// Creates a descriptor with the given device-type string.
    #[must_use]
    pub fn new(device_type: impl Into<String>) -> Self {
        Self {
            device_type: Some(device_type.into()),
            ..Self::default()
        }
    }

    /// Sets the device name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.short_name = Some(name.into());
        self
    }

    /// Marks the device as a sensor.
    #[must_use]
    pub fn as_sensor(mut self) -> Self {
        self.is_sensor = 1;
        self
    }

    /// Marks the device as an actuator.
    #[must_use]
    pub fn as_actuator(mut self) -> Self {
        self.is_actuator = 1;
        self
    }

    /// Returns `true` if the sensor flag is set.
    #[must_use]
    pub fn sensor(&self) -> bool {
        self.is_sensor == 1
    }

    /// Returns `true` if the actuator flag is set.
    #[must_use]
    pub fn actuator(&self) -> bool {
        self.is_actuator == 1
    }
}
