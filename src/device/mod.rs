// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The device model: polling, state, and change notification.
//!
//! A [`Device`] represents one physical device behind the hub. It holds
//! the device's latest known reading, fetches fresh readings through a
//! [`Transport`], and notifies subscribed listeners of heartbeats and
//! value changes.
//!
//! # Polling contract
//!
//! [`Device::heartbeat`] performs one poll. On success the parsed reading
//! and the server-side read timestamp commit together; on a "no new data"
//! response nothing changes and the previous state is returned. Events
//! fire synchronously, in registration order, before the call returns.
//!
//! # Examples
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
//!     device.on_change(|reading, previous| {
//!         println!("{reading:?} (was {previous:?})");
//!     });
//!
//!     let (last_read, data) = device.heartbeat().await?;
//!     println!("read at {last_read:?}: {data:?}");
//!     Ok(())
//! }
//! ```

mod descriptor;
mod kind;

pub use descriptor::DeviceDescriptor;
pub use kind::DeviceKind;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::error::{DeviceError, Error, ParseError, Result};
use crate::protocol::{Transport, WritePayload};
use crate::subscription::{CallbackRegistry, SubscriptionId};
use crate::types::{Reading, RgbColor};

/// Mutable poll state, committed as a unit under one lock.
#[derive(Debug, Clone, Default)]
struct PollState {
    data: Option<Reading>,
    last_heartbeat: Option<DateTime<Utc>>,
    last_read: Option<DateTime<Utc>>,
}

/// One hub device: identity, latest reading, and subscriptions.
///
/// The device is generic over its [`Transport`] so the polling logic can
/// be exercised against scripted transports in tests. Metadata (`guid`,
/// kind, name, sensor/actuator flags) is fixed at construction; only the
/// poll state mutates, and only through [`Device::heartbeat`].
///
/// Access from multiple threads is possible (all methods take `&self`)
/// but polls are not internally coordinated: callers who poll one device
/// from several tasks are responsible for serializing those polls.
#[derive(Debug)]
pub struct Device<T: Transport> {
    transport: Arc<T>,
    guid: String,
    kind: DeviceKind,
    device_type: Option<String>,
    name: Option<String>,
    is_sensor: bool,
    is_actuator: bool,
    state: RwLock<PollState>,
    callbacks: CallbackRegistry,
    /// Last color an RGB LED showed before `turn_off`, restored by `turn_on`.
    last_color: RwLock<Option<RgbColor>>,
}

/// Point-in-time copy of a device's identity and poll state.
///
/// Produced by [`Device::snapshot`]. The `data` field keeps its typed
/// form; use [`Device::snapshot_json`] when a JSON-safe rendering is
/// needed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    /// The device GUID.
    pub guid: String,
    /// The hub's device-type string.
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    /// Human-readable device name.
    pub name: Option<String>,
    /// Whether the device reports readings.
    pub is_sensor: bool,
    /// Whether the device accepts writes.
    pub is_actuator: bool,
    /// The latest parsed reading, if any poll has succeeded.
    pub data: Option<Reading>,
    /// Wall-clock time of the last successful poll.
    pub last_heartbeat: Option<DateTime<Utc>>,
    /// Server-side timestamp of the last reading.
    pub last_read: Option<DateTime<Utc>>,
}

impl<T: Transport> Device<T> {
    /// Default polling period for [`Device::pulse`].
    pub const DEFAULT_PULSE_PERIOD: Duration = Duration::from_secs(10);

    /// Creates a device from its hub descriptor.
    ///
    /// The device kind is resolved from the descriptor's type string
    /// through the registry; unrecognized type strings construct a
    /// [`DeviceKind::Generic`] device.
    #[must_use]
    pub fn new(transport: T, guid: impl Into<String>, descriptor: &DeviceDescriptor) -> Self {
        let kind = descriptor
            .device_type
            .as_deref()
            .and_then(DeviceKind::from_type_str)
            .unwrap_or_default();

        Self {
            transport: Arc::new(transport),
            guid: guid.into(),
            kind,
            device_type: descriptor.device_type.clone(),
            name: descriptor.short_name.clone(),
            is_sensor: descriptor.sensor(),
            is_actuator: descriptor.actuator(),
            state: RwLock::new(PollState::default()),
            callbacks: CallbackRegistry::new(),
            last_color: RwLock::new(None),
        }
    }

    // ========== Identity & state accessors ==========

    /// Returns the device GUID.
    #[must_use]
    pub fn guid(&self) -> &str {
        &self.guid
    }

    /// Returns the resolved device kind.
    #[must_use]
    pub fn kind(&self) -> DeviceKind {
        self.kind
    }

    /// Returns the hub's device-type string.
    #[must_use]
    pub fn device_type(&self) -> Option<&str> {
        self.device_type.as_deref()
    }

    /// Returns the device name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns `true` if the device reports readings.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    /// Returns `true` if the device accepts writes.
    #[must_use]
    pub fn is_actuator(&self) -> bool {
        self.is_actuator
    }

    /// Returns the latest parsed reading, if any poll has succeeded.
    #[must_use]
    pub fn data(&self) -> Option<Reading> {
        self.state.read().data.clone()
    }

    /// Returns the wall-clock time of the last successful poll.
    #[must_use]
    pub fn last_heartbeat(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_heartbeat
    }

    /// Returns the server-side timestamp of the last reading.
    #[must_use]
    pub fn last_read(&self) -> Option<DateTime<Utc>> {
        self.state.read().last_read
    }

    // ========== Polling ==========

    /// Polls the device once and fires events.
    ///
    /// On a successful response the reading and the server timestamp are
    /// committed together, then `Heartbeat` fires with the new reading
    /// and, if the reading differs from the previous one by value,
    /// `Change` fires with both. On a "no new data" response (non-zero
    /// status id) nothing changes, nothing fires, and the previous state
    /// is returned.
    ///
    /// Returns the `(last_read, data)` pair reflecting the state after
    /// the call.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the payload cannot be
    /// parsed for this device kind. Neither case changes device state.
    pub async fn heartbeat(&self) -> Result<(Option<DateTime<Utc>>, Option<Reading>)> {
        self.poll(false).await
    }

    /// Polls the device once without firing any events.
    ///
    /// State updates exactly as in [`Device::heartbeat`].
    ///
    /// # Errors
    ///
    /// Same as [`Device::heartbeat`].
    pub async fn heartbeat_silent(&self) -> Result<(Option<DateTime<Utc>>, Option<Reading>)> {
        self.poll(true).await
    }

    async fn poll(&self, silent: bool) -> Result<(Option<DateTime<Utc>>, Option<Reading>)> {
        let response = self.transport.device_heartbeat(&self.guid).await?;

        if !response.is_success() {
            tracing::debug!(guid = %self.guid, id = response.id, "heartbeat reported no new data");
            let state = self.state.read();
            return Ok((state.last_read, state.data.clone()));
        }

        let payload = response
            .data
            .ok_or_else(|| ParseError::MissingField("data".to_string()))?;

        // Parse before touching state: a failed parse must leave the
        // previous reading and timestamps intact.
        let data = self.kind.parse(&payload.value)?;
        let last_read = DateTime::from_timestamp_millis(payload.timestamp).ok_or_else(|| {
            ParseError::UnexpectedFormat(format!("timestamp {} out of range", payload.timestamp))
        })?;

        let previous = {
            let mut state = self.state.write();
            let previous = state.data.replace(data.clone());
            state.last_heartbeat = Some(Utc::now());
            state.last_read = Some(last_read);
            previous
        };

        tracing::debug!(guid = %self.guid, data = ?data, "heartbeat");

        if !silent {
            self.callbacks.dispatch_heartbeat(&data);
            if previous.as_ref() != Some(&data) {
                self.callbacks.dispatch_change(&data, previous.as_ref());
            }
        }

        Ok((Some(last_read), Some(data)))
    }

    /// Polls the device on a fixed period until stopped.
    ///
    /// The first poll happens immediately; later polls tick every
    /// `period`. The loop ends when `true` is sent on the stop channel
    /// (or its sender is dropped).
    ///
    /// # Errors
    ///
    /// A failing heartbeat ends the loop and propagates its error;
    /// resilience against transient failures belongs to the transport.
    pub async fn pulse(&self, period: Duration, mut stop: watch::Receiver<bool>) -> Result<()> {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.heartbeat().await?;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        tracing::debug!(guid = %self.guid, "pulse stopped");
                        return Ok(());
                    }
                }
            }
        }
    }

    // ========== Snapshots ==========

    /// Returns a point-in-time copy of the device's identity and state.
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        let state = self.state.read();
        DeviceSnapshot {
            guid: self.guid.clone(),
            device_type: self.device_type.clone(),
            name: self.name.clone(),
            is_sensor: self.is_sensor,
            is_actuator: self.is_actuator,
            data: state.data.clone(),
            last_heartbeat: state.last_heartbeat,
            last_read: state.last_read,
        }
    }

    /// Returns the snapshot as JSON, with `data` passed through the
    /// kind's externalize hook (temperatures render as bare Kelvin
    /// numbers).
    #[must_use]
    pub fn snapshot_json(&self) -> serde_json::Value {
        let snapshot = self.snapshot();
        let data = snapshot
            .data
            .as_ref()
            .map_or(serde_json::Value::Null, |r| self.kind.externalize(r));

        serde_json::json!({
            "guid": snapshot.guid,
            "type": snapshot.device_type,
            "name": snapshot.name,
            "is_sensor": snapshot.is_sensor,
            "is_actuator": snapshot.is_actuator,
            "data": data,
            "last_heartbeat": snapshot.last_heartbeat,
            "last_read": snapshot.last_read,
        })
    }

    // ========== Subscriptions ==========

    /// Subscribes to heartbeat events.
    ///
    /// The callback receives the new reading on every successful,
    /// non-silent poll. Callbacks run synchronously on the polling
    /// thread, in registration order; a panicking callback unwinds
    /// through the poll.
    pub fn on_heartbeat<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Reading) + Send + Sync + 'static,
    {
        self.callbacks.on_heartbeat(callback)
    }

    /// Subscribes to change events.
    ///
    /// The callback receives the new reading and the previous one (absent
    /// on the first successful poll). It fires only when the new reading
    /// differs from the previous one by value equality.
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Reading, Option<&Reading>) + Send + Sync + 'static,
    {
        self.callbacks.on_change(callback)
    }

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.callbacks.unsubscribe(id)
    }

    // ========== Button ==========

    /// Returns `true` if a button device's latest reading is the pushed
    /// state (zero).
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedCapability`] for non-button
    /// devices.
    pub fn is_pushed(&self) -> Result<bool> {
        self.check_kind(DeviceKind::Button, "button state")?;
        let state = self.state.read();
        Ok(matches!(&state.data, Some(reading) if reading.as_f64() == Some(0.0)))
    }

    // ========== RGB LED ==========

    /// Writes a color to an RGB LED.
    ///
    /// The write goes straight to the hub; local `data` is not touched
    /// and will reflect the new color after the next heartbeat.
    ///
    /// # Errors
    ///
    /// Returns [`DeviceError::UnsupportedCapability`] for non-LED devices,
    /// or a protocol error if the write fails.
    pub async fn set_color(&self, color: RgbColor) -> Result<()> {
        self.check_kind(DeviceKind::RgbLed, "color control")?;

        let url = self.transport.device_url(&self.guid);
        let payload = WritePayload::new(color.to_string());
        self.transport.write_device(&url, &payload).await?;
        Ok(())
    }

    /// Turns an RGB LED on, restoring the last remembered color
    /// (white when none is known).
    ///
    /// # Errors
    ///
    /// Same as [`Device::set_color`].
    pub async fn turn_on(&self) -> Result<()> {
        let color = (*self.last_color.read()).unwrap_or(RgbColor::WHITE);
        self.set_color(color).await
    }

    /// Turns an RGB LED off by writing black, remembering the current
    /// color (when the latest reading holds one) for [`Device::turn_on`].
    ///
    /// # Errors
    ///
    /// Same as [`Device::set_color`].
    pub async fn turn_off(&self) -> Result<()> {
        let current = self.state.read().data.as_ref().and_then(Reading::as_color);
        if let Some(color) = current {
            *self.last_color.write() = Some(color);
        }
        self.set_color(RgbColor::BLACK).await
    }

    // ========== Helpers ==========

    /// Checks that this device has the kind a capability requires.
    fn check_kind(&self, required: DeviceKind, capability: &str) -> Result<()> {
        if self.kind == required {
            Ok(())
        } else {
            Err(Error::Device(DeviceError::UnsupportedCapability {
                capability: capability.to_string(),
            }))
        }
    }
}

impl<T: Transport> fmt::Display for Device<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(\"{}\")", self.kind, self.name.as_deref().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use serde_json::json;

    use crate::error::ProtocolError;
    use crate::protocol::{HeartbeatPayload, HeartbeatResponse};

    /// A transport that replays scripted heartbeat responses and records
    /// writes. Clones share state so tests can inspect it after moving
    /// the transport into a device.
    #[derive(Debug, Clone, Default)]
    struct ScriptedTransport {
        responses: Arc<Mutex<VecDeque<HeartbeatResponse>>>,
        writes: Arc<Mutex<Vec<(String, WritePayload)>>>,
    }

    impl ScriptedTransport {
        fn push_success(&self, value: serde_json::Value, timestamp: i64) {
            self.responses
                .lock()
                .unwrap()
                .push_back(HeartbeatResponse {
                    id: 0,
                    data: Some(HeartbeatPayload { value, timestamp }),
                });
        }

        fn push_failure(&self, id: i64) {
            self.responses
                .lock()
                .unwrap()
                .push_back(HeartbeatResponse { id, data: None });
        }

        fn writes(&self) -> Vec<(String, WritePayload)> {
            self.writes.lock().unwrap().clone()
        }
    }

    impl Transport for ScriptedTransport {
        async fn device_heartbeat(
            &self,
            _guid: &str,
        ) -> std::result::Result<HeartbeatResponse, ProtocolError> {
            // An exhausted script behaves like a hub with nothing new.
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(HeartbeatResponse { id: 11, data: None }))
        }

        async fn write_device(
            &self,
            url: &str,
            payload: &WritePayload,
        ) -> std::result::Result<(), ProtocolError> {
            self.writes
                .lock()
                .unwrap()
                .push((url.to_string(), payload.clone()));
            Ok(())
        }

        fn device_url(&self, guid: &str) -> String {
            format!("test://device/{guid}")
        }
    }

    fn descriptor(device_type: &str) -> DeviceDescriptor {
        DeviceDescriptor::new(device_type).with_name("Test Device")
    }

    #[test]
    fn construction_resolves_kind_from_registry() {
        let device = Device::new(
            ScriptedTransport::default(),
            "guid-1",
            &descriptor("temperature").as_sensor(),
        );
        assert_eq!(device.kind(), DeviceKind::TemperatureSensor);
        assert_eq!(device.guid(), "guid-1");
        assert_eq!(device.device_type(), Some("temperature"));
        assert_eq!(device.name(), Some("Test Device"));
        assert!(device.is_sensor());
        assert!(!device.is_actuator());
        assert!(device.data().is_none());
        assert!(device.last_heartbeat().is_none());
        assert!(device.last_read().is_none());
    }

    #[test]
    fn construction_falls_back_to_generic() {
        let device = Device::new(
            ScriptedTransport::default(),
            "guid-1",
            &descriptor("thermostat"),
        );
        assert_eq!(device.kind(), DeviceKind::Generic);

        let device = Device::new(
            ScriptedTransport::default(),
            "guid-2",
            &DeviceDescriptor::default(),
        );
        assert_eq!(device.kind(), DeviceKind::Generic);
    }

    #[tokio::test]
    async fn successful_poll_commits_data_and_last_read_together() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(61), 1_354_300_799_000);
        let device = Device::new(transport, "guid-1", &descriptor("humidity"));

        let (last_read, data) = device.heartbeat().await.unwrap();

        let expected = DateTime::from_timestamp_millis(1_354_300_799_000).unwrap();
        assert_eq!(last_read, Some(expected));
        assert_eq!(data, Some(Reading::Number(61.0)));
        assert_eq!(device.last_read(), Some(expected));
        assert_eq!(device.data(), Some(Reading::Number(61.0)));
        assert!(device.last_heartbeat().is_some());
    }

    #[tokio::test]
    async fn failed_poll_changes_nothing_and_returns_previous_pair() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(61), 1_000);
        transport.push_failure(404);
        let device = Device::new(transport, "guid-1", &descriptor("humidity"));

        let first = device.heartbeat().await.unwrap();
        let second = device.heartbeat().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(device.data(), Some(Reading::Number(61.0)));
    }

    #[tokio::test]
    async fn failed_poll_fires_no_events() {
        let transport = ScriptedTransport::default();
        transport.push_failure(404);
        let device = Device::new(transport, "guid-1", &descriptor("humidity"));

        let beats = Arc::new(AtomicU32::new(0));
        let beats_clone = beats.clone();
        device.on_heartbeat(move |_| {
            beats_clone.fetch_add(1, Ordering::SeqCst);
        });

        let (last_read, data) = device.heartbeat().await.unwrap();
        assert_eq!(last_read, None);
        assert_eq!(data, None);
        assert_eq!(beats.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn heartbeat_fires_every_poll_change_only_on_difference() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(1), 1_000);
        transport.push_success(json!(1), 2_000);
        transport.push_success(json!(2), 3_000);
        let device = Device::new(transport, "guid-1", &descriptor("light"));

        let beats = Arc::new(AtomicU32::new(0));
        let changes = Arc::new(Mutex::new(Vec::new()));

        let beats_clone = beats.clone();
        device.on_heartbeat(move |_| {
            beats_clone.fetch_add(1, Ordering::SeqCst);
        });
        let changes_clone = changes.clone();
        device.on_change(move |new, previous| {
            changes_clone
                .lock()
                .unwrap()
                .push((new.clone(), previous.cloned()));
        });

        device.heartbeat().await.unwrap();
        device.heartbeat().await.unwrap();
        device.heartbeat().await.unwrap();

        assert_eq!(beats.load(Ordering::SeqCst), 3);
        let changes = changes.lock().unwrap();
        assert_eq!(
            *changes,
            vec![
                (Reading::Number(1.0), None),
                (Reading::Number(2.0), Some(Reading::Number(1.0))),
            ]
        );
    }

    #[tokio::test]
    async fn silent_poll_updates_state_without_events() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(1), 1_000);
        let device = Device::new(transport, "guid-1", &descriptor("light"));

        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        device.on_heartbeat(move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        let fired_clone = fired.clone();
        device.on_change(move |_, _| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        device.heartbeat_silent().await.unwrap();

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(device.data(), Some(Reading::Number(1.0)));
    }

    #[tokio::test]
    async fn listener_order_and_duplicates() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(1), 1_000);
        let device = Device::new(transport, "guid-1", &descriptor("light"));

        let order = Arc::new(Mutex::new(Vec::new()));
        let order_a = order.clone();
        device.on_heartbeat(move |_| order_a.lock().unwrap().push("a"));
        let order_b = order.clone();
        let duplicate = move |_: &Reading| order_b.lock().unwrap().push("b");
        device.on_heartbeat(duplicate.clone());
        device.on_heartbeat(duplicate);

        device.heartbeat().await.unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b", "b"]);
    }

    #[tokio::test]
    async fn unsubscribed_listener_does_not_fire() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(1), 1_000);
        let device = Device::new(transport, "guid-1", &descriptor("light"));

        let fired = Arc::new(AtomicU32::new(0));
        let fired_clone = fired.clone();
        let id = device.on_heartbeat(move |_| {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(device.unsubscribe(id));
        assert!(!device.unsubscribe(id));

        device.heartbeat().await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn temperature_sensor_parses_celsius() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(22.5), 1_000);
        let device = Device::new(transport, "guid-1", &descriptor("temperature"));

        let (_, data) = device.heartbeat().await.unwrap();
        match data {
            Some(Reading::Temperature(t)) => {
                assert!((t.celsius() - 22.5).abs() < 1e-9);
            }
            other => panic!("expected temperature reading, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn parse_failure_leaves_state_intact() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(20.0), 1_000);
        transport.push_success(json!("warm"), 2_000);
        let device = Device::new(transport, "guid-1", &descriptor("temperature"));

        device.heartbeat().await.unwrap();
        let before = (device.last_read(), device.data());

        assert!(device.heartbeat().await.is_err());
        assert_eq!((device.last_read(), device.data()), before);
    }

    #[tokio::test]
    async fn button_is_pushed() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(0), 1_000);
        transport.push_success(json!(1), 2_000);
        let device = Device::new(transport, "guid-1", &descriptor("button"));

        assert!(!device.is_pushed().unwrap()); // no data yet

        device.heartbeat().await.unwrap();
        assert!(device.is_pushed().unwrap());

        device.heartbeat().await.unwrap();
        assert!(!device.is_pushed().unwrap());
    }

    #[test]
    fn is_pushed_requires_button_kind() {
        let device = Device::new(ScriptedTransport::default(), "guid-1", &descriptor("light"));
        assert!(matches!(
            device.is_pushed(),
            Err(Error::Device(DeviceError::UnsupportedCapability { .. }))
        ));
    }

    #[tokio::test]
    async fn set_color_writes_but_does_not_touch_data() {
        let transport = ScriptedTransport::default();
        let device = Device::new(
            transport.clone(),
            "guid-led",
            &descriptor("rgbled").as_actuator(),
        );

        device.set_color(RgbColor::new(255, 87, 51)).await.unwrap();

        let writes = transport.writes();
        assert_eq!(
            writes,
            vec![(
                "test://device/guid-led".to_string(),
                WritePayload::new("FF5733"),
            )]
        );
        assert!(device.data().is_none());
    }

    #[tokio::test]
    async fn set_color_requires_led_kind() {
        let device = Device::new(ScriptedTransport::default(), "guid-1", &descriptor("button"));
        assert!(matches!(
            device.set_color(RgbColor::WHITE).await,
            Err(Error::Device(DeviceError::UnsupportedCapability { .. }))
        ));
    }

    #[tokio::test]
    async fn turn_off_remembers_color_and_turn_on_restores_it() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!("FF5733"), 1_000);
        let device = Device::new(
            transport.clone(),
            "guid-led",
            &descriptor("rgbled").as_actuator(),
        );

        device.heartbeat().await.unwrap();
        device.turn_off().await.unwrap();
        device.turn_on().await.unwrap();

        let payloads: Vec<String> = transport
            .writes()
            .into_iter()
            .map(|(_, payload)| payload.value)
            .collect();
        assert_eq!(payloads, vec!["000000".to_string(), "FF5733".to_string()]);
    }

    #[tokio::test]
    async fn turn_on_with_no_remembered_color_uses_white() {
        let transport = ScriptedTransport::default();
        let device = Device::new(
            transport.clone(),
            "guid-led",
            &descriptor("rgbled").as_actuator(),
        );

        device.turn_on().await.unwrap();

        let payloads: Vec<String> = transport
            .writes()
            .into_iter()
            .map(|(_, payload)| payload.value)
            .collect();
        assert_eq!(payloads, vec!["FFFFFF".to_string()]);
    }

    #[tokio::test]
    async fn snapshot_reflects_state() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(61), 1_354_300_799_000);
        let device = Device::new(transport, "guid-1", &descriptor("humidity").as_sensor());

        device.heartbeat().await.unwrap();
        let snapshot = device.snapshot();

        assert_eq!(snapshot.guid, "guid-1");
        assert_eq!(snapshot.device_type.as_deref(), Some("humidity"));
        assert_eq!(snapshot.name.as_deref(), Some("Test Device"));
        assert!(snapshot.is_sensor);
        assert!(!snapshot.is_actuator);
        assert_eq!(snapshot.data, Some(Reading::Number(61.0)));
        assert!(snapshot.last_heartbeat.is_some());
        assert_eq!(
            snapshot.last_read,
            DateTime::from_timestamp_millis(1_354_300_799_000)
        );
    }

    #[tokio::test]
    async fn snapshot_json_externalizes_temperature() {
        let transport = ScriptedTransport::default();
        transport.push_success(json!(0.0), 1_000);
        let device = Device::new(transport, "guid-1", &descriptor("temperature").as_sensor());

        device.heartbeat().await.unwrap();
        let json = device.snapshot_json();

        // The temperature renders as a plain Kelvin number.
        assert_eq!(json["data"], json!(273.15));
        assert_eq!(json["guid"], json!("guid-1"));
        assert_eq!(json["is_sensor"], json!(true));
    }

    #[test]
    fn snapshot_json_with_no_data_is_null() {
        let device = Device::new(ScriptedTransport::default(), "guid-1", &descriptor("light"));
        assert_eq!(device.snapshot_json()["data"], serde_json::Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn pulse_polls_until_stopped() {
        let transport = ScriptedTransport::default();
        for i in 0..5 {
            transport.push_success(json!(i), i64::from(i) * 1_000);
        }
        let device = Arc::new(Device::new(transport, "guid-1", &descriptor("light")));

        let beats = Arc::new(AtomicU32::new(0));
        let beats_clone = beats.clone();
        device.on_heartbeat(move |_| {
            beats_clone.fetch_add(1, Ordering::SeqCst);
        });

        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn({
            let device = device.clone();
            async move { device.pulse(Duration::from_secs(10), stop_rx).await }
        });

        // First poll is immediate, then one every ten seconds.
        tokio::time::sleep(Duration::from_secs(25)).await;
        stop_tx.send(true).unwrap();
        handle.await.unwrap().unwrap();

        assert_eq!(beats.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn display_uses_kind_and_name() {
        let device = Device::new(
            ScriptedTransport::default(),
            "guid-1",
            &descriptor("temperature"),
        );
        assert_eq!(device.to_string(), "TemperatureSensor(\"Test Device\")");
    }
}
