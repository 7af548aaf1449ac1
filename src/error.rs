// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `hubpulse` library.
//!
//! This module provides a comprehensive error hierarchy for handling failures
//! across the library: value validation, transport communication, payload
//! parsing, and device operations.

use thiserror::Error;

/// The main error type for this library.
///
/// This enum encompasses all possible errors that can occur when polling
/// or controlling hub devices.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during transport communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a heartbeat payload.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error occurred during device operations.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors related to value validation and constraints.
///
/// These errors occur when attempting to create or mutate constrained
/// types with invalid values. A rejected mutation leaves the prior value
/// fully intact.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature operation would produce a Kelvin value below absolute
    /// zero (or a non-finite one).
    #[error("temperature Kelvin value ({kelvin}) cannot be less than 0")]
    InvalidTemperature {
        /// The offending Kelvin value.
        kelvin: f64,
    },

    /// An unknown temperature unit tag was provided.
    #[error("invalid temperature unit: {0}")]
    InvalidUnit(String),

    /// An invalid hex color string was provided.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),
}

/// Errors related to transport communication with the hub.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the hub failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed (missing or rejected access token).
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing hub responses.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Unexpected response format.
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Errors related to device operations.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Device kind does not support the requested capability.
    #[error("device does not support {capability}")]
    UnsupportedCapability {
        /// The capability that is not supported.
        capability: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
