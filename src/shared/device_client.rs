use async_trait::async_trait;
use tracing::debug;

use crate::domain::{RelayCommand, SensorReading};

/// Default address of the habitat device on the local network
pub const DEFAULT_DEVICE_HOST: &str = "http://192.168.1.106";

/// Errors talking to the habitat device
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("Request to device failed: {0}")]
    Transport(String),

    #[error("Device responded with status {0}")]
    Status(u16),

    #[error("Failed to decode device payload: {0}")]
    Decode(String),

    #[error("HTTP client configuration error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for DeviceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            DeviceError::Status(status.as_u16())
        } else if err.is_decode() {
            DeviceError::Decode(err.to_string())
        } else if err.is_builder() {
            DeviceError::Client(err.to_string())
        } else {
            DeviceError::Transport(err.to_string())
        }
    }
}

/// Source of sensor readings for the dashboard
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the current reading
    async fn fetch_reading(&self) -> Result<SensorReading, DeviceError>;
}

/// Sink for relay commands
#[async_trait]
pub trait RelayWriter: Send + Sync {
    /// Send a relay command; the device's response body is ignored
    async fn write_relay(&self, command: RelayCommand) -> Result<(), DeviceError>;
}

/// Plain-HTTP client for the habitat device
///
/// No request timeout is configured: a hung request stays pending until the
/// task driving it is dropped.
#[derive(Debug, Clone)]
pub struct HttpDeviceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDeviceClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DeviceError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DeviceError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl TelemetrySource for HttpDeviceClient {
    async fn fetch_reading(&self) -> Result<SensorReading, DeviceError> {
        let url = self.endpoint("sensor");
        debug!(url = %url, "Fetching sensor reading");

        let reading = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<SensorReading>()
            .await?;

        Ok(reading)
    }
}

#[async_trait]
impl RelayWriter for HttpDeviceClient {
    async fn write_relay(&self, command: RelayCommand) -> Result<(), DeviceError> {
        let url = self.endpoint("update");
        debug!(
            url = %url,
            relay = command.relay,
            state = command.state_code(),
            "Sending relay command"
        );

        self.http
            .get(&url)
            .query(&command.query_pairs())
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
