// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP transport implementation for the hub's REST API.

use std::time::Duration;

use reqwest::Client;

use crate::error::ProtocolError;
use crate::protocol::{HeartbeatResponse, Transport, WritePayload};

// ============================================================================
// HubConfig - Configuration for the hub connection
// ============================================================================

/// Configuration for an HTTP hub connection.
///
/// This is a simple configuration struct that holds connection parameters.
/// The REST API is stateless - each poll is an independent request.
///
/// # Examples
///
/// ```
/// use hubpulse::protocol::HubConfig;
/// use std::time::Duration;
///
/// // Simple configuration
/// let config = HubConfig::new("hub.local");
///
/// // With all options
/// let config = HubConfig::new("hub.local")
///     .with_port(8080)
///     .with_https()
///     .with_token("0a1b2c3d")
///     .with_timeout(Duration::from_secs(5));
/// ```
#[derive(Debug, Clone)]
pub struct HubConfig {
    host: String,
    port: u16,
    use_https: bool,
    token: Option<String>,
    timeout: Duration,
}

impl HubConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new configuration for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the hub
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the access token appended to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the access token if set.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{}{port_suffix}", self.host)
    }

    /// Creates a [`HubClient`] from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HubClient, ProtocolError> {
        let base_url = self.base_url();

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HubClient {
            base_url,
            client,
            token: self.token,
        })
    }
}

// ============================================================================
// HubClient - HTTP client for the hub's REST API
// ============================================================================

/// HTTP client for the hub's device REST API.
///
/// Heartbeats are read from `/rest/v0/device/<guid>/heartbeat`; actuator
/// writes are PUT to `/rest/v0/device/<guid>`.
///
/// # Examples
///
/// ```no_run
/// use hubpulse::protocol::{HubClient, Transport};
///
/// # async fn example() -> hubpulse::Result<()> {
/// let client = HubClient::new("hub.local")?.with_token("0a1b2c3d");
/// let response = client.device_heartbeat("1012BB013302").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HubClient {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HubClient {
    /// Creates a new client for the specified host.
    ///
    /// # Arguments
    ///
    /// * `host` - The hostname or IP address of the hub, or a full
    ///   `http(s)://` URL
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        let host = host.into();
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host
        } else {
            format!("http://{host}")
        };

        let client = Client::builder()
            .timeout(HubConfig::DEFAULT_TIMEOUT)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            token: None,
        })
    }

    /// Sets the access token appended to every request.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Returns the base URL of the hub.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Appends the access token query parameter when one is configured.
    fn with_auth(&self, url: String) -> String {
        match &self.token {
            Some(token) => format!("{url}?access_token={}", urlencoding::encode(token)),
            None => url,
        }
    }

    /// Builds the heartbeat URL for a device.
    fn heartbeat_url(&self, guid: &str) -> String {
        self.with_auth(format!(
            "{}/rest/v0/device/{}/heartbeat",
            self.base_url,
            urlencoding::encode(guid)
        ))
    }

    /// Maps a non-success HTTP status to the corresponding error.
    fn check_status(status: reqwest::StatusCode) -> Result<(), ProtocolError> {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }
        if !status.is_success() {
            return Err(ProtocolError::ConnectionFailed(format!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }
        Ok(())
    }
}

impl Transport for HubClient {
    async fn device_heartbeat(&self, guid: &str) -> Result<HeartbeatResponse, ProtocolError> {
        let url = self.heartbeat_url(guid);

        tracing::debug!(guid = %guid, "Fetching device heartbeat");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::check_status(response.status())?;

        let heartbeat: HeartbeatResponse =
            response.json().await.map_err(ProtocolError::Http)?;

        tracing::debug!(guid = %guid, id = heartbeat.id, "Received heartbeat response");

        Ok(heartbeat)
    }

    async fn write_device(&self, url: &str, payload: &WritePayload) -> Result<(), ProtocolError> {
        let url = self.with_auth(url.to_string());

        tracing::debug!(url = %url, value = %payload.value, "Writing device value");

        let response = self
            .client
            .put(&url)
            .json(payload)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        Self::check_status(response.status())
    }

    fn device_url(&self, guid: &str) -> String {
        format!(
            "{}/rest/v0/device/{}",
            self.base_url,
            urlencoding::encode(guid)
        )
    }
}
