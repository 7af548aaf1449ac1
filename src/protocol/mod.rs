// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport layer for communicating with the hub.
//!
//! This module defines the [`Transport`] trait the device model polls
//! through, the wire types the hub's REST API exchanges, and an HTTP
//! implementation ([`HubClient`], behind the `http` feature).
//!
//! The transport contract is deliberately small: one read (a device's
//! heartbeat resource), one fire-and-forget write (actuator commands), and
//! device addressing for the write. All resilience concerns (timeouts,
//! retries) live here, not in the device model.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HubClient, HubConfig};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// A device heartbeat response from the hub.
///
/// The hub reports a status `id` alongside the payload. `id == 0` signals
/// success; any other value means "no new data" and carries no payload
/// worth reading. Non-zero ids are not errors: callers treat them as
/// ordinary transient misses.
///
/// # Examples
///
/// ```
/// use hubpulse::protocol::HeartbeatResponse;
///
/// let json = r#"{"id":0,"data":{"DA":22.5,"timestamp":1354300799000}}"#;
/// let response: HeartbeatResponse = serde_json::from_str(json).unwrap();
///
/// assert!(response.is_success());
/// assert_eq!(response.data.unwrap().timestamp, 1_354_300_799_000);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatResponse {
    /// Status id; `0` means a fresh reading is present.
    pub id: i64,
    /// The reading payload; absent on unsuccessful responses.
    #[serde(default)]
    pub data: Option<HeartbeatPayload>,
}

impl HeartbeatResponse {
    /// Returns `true` if the response carries a fresh reading.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.id == 0
    }
}

/// The payload of a successful heartbeat response.
#[derive(Debug, Clone, Deserialize)]
pub struct HeartbeatPayload {
    /// The raw data value, shape depends on the device kind.
    #[serde(rename = "DA")]
    pub value: serde_json::Value,
    /// Server-side reading timestamp, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Payload for a fire-and-forget device write.
///
/// Actuator values are encoded as strings under the hub's `DA` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WritePayload {
    /// The encoded value to write.
    #[serde(rename = "DA")]
    pub value: String,
}

impl WritePayload {
    /// Creates a write payload from an encoded value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Trait for transport implementations that can reach the hub.
///
/// The device model is generic over this trait; tests substitute scripted
/// implementations, production code uses [`HubClient`].
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Fetches the current heartbeat for the device with the given GUID.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails to send or the
    /// response cannot be read. An unsuccessful status id is NOT an error;
    /// it is reported through [`HeartbeatResponse::id`].
    async fn device_heartbeat(&self, guid: &str) -> Result<HeartbeatResponse, ProtocolError>;

    /// Writes a value to a device resource. No structured response is
    /// consumed.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails.
    async fn write_device(&self, url: &str, payload: &WritePayload) -> Result<(), ProtocolError>;

    /// Returns the URL addressing the device with the given GUID, used
    /// for writes.
    fn device_url(&self, guid: &str) -> String;
}
