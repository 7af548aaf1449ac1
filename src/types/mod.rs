// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for hub device readings and control.
//!
//! This module provides the typed values that flow through the device
//! model. Constrained types validate at construction time, preventing
//! runtime errors deeper in the library.
//!
//! # Types
//!
//! - [`Temperature`] - Absolute temperature stored in Kelvin, invariant `k >= 0`
//! - [`TemperatureUnit`] - Kelvin/Celsius/Fahrenheit/Rankine unit tags
//! - [`RgbColor`] - RGB color in the hub's hex wire encoding
//! - [`Reading`] - A device's parsed data value

mod color;
mod reading;
mod temperature;

pub use color::RgbColor;
pub use reading::Reading;
pub use temperature::{Temperature, TemperatureUnit};
