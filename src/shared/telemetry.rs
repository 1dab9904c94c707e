//! Periodic telemetry polling.
//!
//! Every tick spawns an independent fetch; nothing de-duplicates in-flight
//! requests and results are delivered in the order they complete, so a slow
//! response can land after a newer one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::dashboard_state::DashboardEvent;
use crate::device_client::{DeviceError, RelayWriter, TelemetrySource};
use crate::domain::{RelayCommand, SensorReading};

/// Default polling period
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Telemetry source returning the same reading on every poll
#[derive(Debug, Clone)]
pub struct StaticTelemetry {
    reading: SensorReading,
}

impl StaticTelemetry {
    pub fn new(reading: SensorReading) -> Self {
        Self { reading }
    }

    pub fn reading(&self) -> SensorReading {
        self.reading
    }
}

impl Default for StaticTelemetry {
    fn default() -> Self {
        Self::new(SensorReading {
            humidity_pct: Some(55.0),
            water_distance_cm: Some(12.0),
            water_temp_c: Some(24.5),
            soil_ph: Some(6.8),
        })
    }
}

#[async_trait]
impl TelemetrySource for StaticTelemetry {
    async fn fetch_reading(&self) -> Result<SensorReading, DeviceError> {
        Ok(self.reading)
    }
}

/// Relay writer that only logs commands, for dashboards without a device
#[derive(Debug, Clone, Default)]
pub struct DetachedRelayWriter;

#[async_trait]
impl RelayWriter for DetachedRelayWriter {
    async fn write_relay(&self, command: RelayCommand) -> Result<(), DeviceError> {
        info!(
            relay = command.relay,
            state = command.state_code(),
            "Relay command not sent (no device attached)"
        );
        Ok(())
    }
}

/// Fixed-period poller feeding results into the dashboard's event channel
pub struct TelemetryPoller {
    source: Arc<dyn TelemetrySource>,
    period: Duration,
}

impl TelemetryPoller {
    pub fn new(source: Arc<dyn TelemetrySource>, period: Duration) -> Self {
        Self { source, period }
    }

    /// Start polling; the first request goes out one period after the start
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn(self, events: UnboundedSender<DashboardEvent>) -> PollerHandle {
        let period = self.period;
        info!(period_ms = period.as_millis() as u64, "Telemetry poller started");

        let ticker = tokio::spawn(run(self.source, period, events));
        PollerHandle { ticker }
    }
}

async fn run(
    source: Arc<dyn TelemetrySource>,
    period: Duration,
    events: UnboundedSender<DashboardEvent>,
) {
    let start = tokio::time::Instant::now() + period;
    let mut ticker = tokio::time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Dropping the set aborts every outstanding request
    let mut in_flight = JoinSet::new();

    loop {
        ticker.tick().await;

        if events.is_closed() {
            debug!("Dashboard gone, stopping poller");
            break;
        }

        while in_flight.try_join_next().is_some() {}

        let source = Arc::clone(&source);
        let events = events.clone();
        in_flight.spawn(async move {
            let event = match source.fetch_reading().await {
                Ok(reading) => DashboardEvent::ReadingReceived(reading),
                Err(e) => DashboardEvent::PollFailed(e.to_string()),
            };
            // Receiver gone means the dashboard unmounted mid-request
            let _ = events.send(event);
        });
    }
}

/// Handle to a running poller; dropping it stops the timer and in-flight requests
#[derive(Debug)]
pub struct PollerHandle {
    ticker: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling
    pub fn shutdown(self) {
        // Drop does the work
    }

    pub fn is_finished(&self) -> bool {
        self.ticker.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.ticker.abort();
        info!("Telemetry poller stopped");
    }
}
