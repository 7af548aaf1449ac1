// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `hubpulse` - A Rust client library for smart-hub devices.
//!
//! This library polls a home-automation hub's REST API and exposes the
//! connected devices (sensors and actuators) as typed objects with change
//! notification.
//!
//! # Supported Features
//!
//! - **Heartbeat polling**: Fetch a device's current reading on demand or
//!   on a periodic pulse with an explicit stop signal
//! - **Change notification**: Subscribe to heartbeat and value-change
//!   events, dispatched in registration order
//! - **Typed readings**: Temperature readings parse into a multi-unit
//!   [`Temperature`] value; other kinds pass through as numbers, strings,
//!   or raw JSON
//! - **Actuator control**: RGB LED color writes with on/off color restore
//!
//! # Quick Start
//!
//! ## Polling a sensor
//!
//! ```no_run
//! use hubpulse::{Device, DeviceDescriptor, HubClient};
//!
//! #[tokio::main]
//! async fn main() -> hubpulse::Result<()> {
//!     let client = HubClient::new("hub.local")?.with_token("0a1b2c3d");
//!
//!     let descriptor = DeviceDescriptor::new("temperature")
//!         .with_name("Greenhouse")
//!         .as_sensor();
//!     let device = Device::new(client, "1012BB013302", &descriptor);
//!
//!     // Subscribe to value changes
//!     device.on_change(|reading, previous| {
//!         println!("reading changed: {reading:?} (was {previous:?})");
//!     });
//!
//!     let (last_read, data) = device.heartbeat().await?;
//!     println!("read at {last_read:?}: {data:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Periodic polling with a stop signal
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use hubpulse::{Device, DeviceDescriptor, HubClient};
//! use tokio::sync::watch;
//!
//! #[tokio::main]
//! async fn main() -> hubpulse::Result<()> {
//!     let client = HubClient::new("hub.local")?;
//!     let device = Device::new(client, "1012BB013302", &DeviceDescriptor::new("humidity"));
//!
//!     let (stop, stop_rx) = watch::channel(false);
//!     tokio::spawn(async move {
//!         tokio::time::sleep(Duration::from_secs(60)).await;
//!         let _ = stop.send(true);
//!     });
//!
//!     device.pulse(Duration::from_secs(10), stop_rx).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Working with temperatures
//!
//! ```
//! use hubpulse::types::Temperature;
//!
//! let t1 = Temperature::new(40.0)?;
//! let t2 = Temperature::from_fahrenheit(212.0)?;
//!
//! let diff = (t2 - t1)?;
//! assert!((diff.fahrenheit() - 140.0).abs() < 1e-6);
//!
//! // Temperatures below absolute zero are rejected.
//! assert!((t1 - t2).is_err());
//! # Ok::<(), hubpulse::ValueError>(())
//! ```

mod device;
pub mod error;
pub mod protocol;
pub mod subscription;
pub mod types;

pub use device::{Device, DeviceDescriptor, DeviceKind, DeviceSnapshot};
pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::{HubClient, HubConfig};
pub use protocol::{HeartbeatPayload, HeartbeatResponse, Transport, WritePayload};
pub use subscription::{CallbackRegistry, EventKind, SubscriptionId};
pub use types::{Reading, RgbColor, Temperature, TemperatureUnit};
