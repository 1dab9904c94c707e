//! Dashboard state container.
//!
//! All mutation goes through [`DashboardState::apply`] (poll results) or the
//! actuator operations on [`Dashboard`] (user input). State lives only as
//! long as the mounted dashboard.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::actuator::{ActuatorBank, ActuatorError, ScheduledActivation};
use crate::device_client::{RelayWriter, TelemetrySource};
use crate::domain::{RelayCommand, SensorReading};
use crate::gauges::DEFAULT_MAX_TANK_DEPTH_CM;
use crate::telemetry::{
    DetachedRelayWriter, PollerHandle, StaticTelemetry, TelemetryPoller, DEFAULT_POLL_INTERVAL,
};
use crate::time::Clock;
use crate::view::DashboardView;

/// Result of a single poll, delivered to the dashboard
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    ReadingReceived(SensorReading),
    PollFailed(String),
}

/// Everything the dashboard displays
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardState {
    pub reading: SensorReading,
    pub actuators: ActuatorBank,
    /// Time the last reading was applied; `None` until the first successful poll
    pub last_updated: Option<NaiveDateTime>,
    /// Poll failures since mount
    pub poll_failures: u64,
}

impl DashboardState {
    pub fn mount(actuators: ActuatorBank) -> Self {
        Self {
            reading: SensorReading::initial(),
            actuators,
            last_updated: None,
            poll_failures: 0,
        }
    }

    /// Apply a poll result
    ///
    /// A reading replaces the previous one wholesale. A failure leaves the
    /// displayed reading untouched.
    pub fn apply(&mut self, event: DashboardEvent, clock: &dyn Clock) {
        match event {
            DashboardEvent::ReadingReceived(reading) => {
                debug!(?reading, "Applying sensor reading");
                self.reading = reading;
                self.last_updated = Some(clock.now_local());
            }
            DashboardEvent::PollFailed(error) => {
                self.poll_failures += 1;
                warn!(
                    error = %error,
                    failures = self.poll_failures,
                    "Sensor poll failed"
                );
            }
        }
    }
}

/// Tunables for a mounted dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardSettings {
    pub max_tank_depth_cm: f64,
    pub poll_interval: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            max_tank_depth_cm: DEFAULT_MAX_TANK_DEPTH_CM,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Where the dashboard reads telemetry from and sends relay commands to
#[derive(Clone)]
pub struct DataSource {
    pub telemetry: Arc<dyn TelemetrySource>,
    pub relays: Arc<dyn RelayWriter>,
    pub actuators: ActuatorBank,
}

impl DataSource {
    /// Live device: one client for both reads and writes, water pump on relay 1
    pub fn live<C>(client: C) -> Self
    where
        C: TelemetrySource + RelayWriter + 'static,
    {
        let client = Arc::new(client);
        Self {
            telemetry: client.clone(),
            relays: client,
            actuators: ActuatorBank::water_pump(),
        }
    }

    /// Static readings, a schedulable doser and no device writes
    pub fn mock() -> Self {
        Self {
            telemetry: Arc::new(StaticTelemetry::default()),
            relays: Arc::new(DetachedRelayWriter),
            actuators: ActuatorBank::doser(),
        }
    }
}

/// A mounted dashboard with its poller running
pub struct Dashboard {
    state: DashboardState,
    settings: DashboardSettings,
    relays: Arc<dyn RelayWriter>,
    clock: Arc<dyn Clock>,
    events: UnboundedReceiver<DashboardEvent>,
    poller: Option<PollerHandle>,
}

impl Dashboard {
    /// Mount the dashboard and start polling
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(source: DataSource, settings: DashboardSettings, clock: Arc<dyn Clock>) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let poller = TelemetryPoller::new(source.telemetry, settings.poll_interval).spawn(tx);

        info!(
            actuators = source.actuators.len(),
            max_tank_depth_cm = settings.max_tank_depth_cm,
            "Dashboard mounted"
        );

        Self {
            state: DashboardState::mount(source.actuators),
            settings,
            relays: source.relays,
            clock,
            events,
            poller: Some(poller),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Derived values for display
    pub fn view(&self) -> DashboardView {
        DashboardView::build(&self.state, &self.settings, self.clock.as_ref())
    }

    /// Wait for the next poll result and apply it
    ///
    /// Returns `None` once the poller has stopped.
    pub async fn next_event(&mut self) -> Option<&DashboardState> {
        let event = self.events.recv().await?;
        self.state.apply(event, self.clock.as_ref());
        Some(&self.state)
    }

    /// Apply every poll result that has already arrived
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.state.apply(event, self.clock.as_ref());
            applied += 1;
        }
        applied
    }

    /// Flip an actuator and send the new state to the device
    ///
    /// The local state changes immediately. The write runs detached: a failure
    /// is logged and the local state is kept as-is. The returned handle can be
    /// awaited but nothing needs to.
    pub fn toggle(&mut self, index: usize) -> Result<JoinHandle<()>, ActuatorError> {
        let command = self.state.actuators.toggle(index)?;
        let relays = Arc::clone(&self.relays);
        Ok(tokio::spawn(send_relay_command(relays, command)))
    }

    pub fn schedule(
        &mut self,
        index: usize,
        activation: ScheduledActivation,
    ) -> Result<(), ActuatorError> {
        self.state.actuators.schedule(index, activation)
    }

    pub fn clear_schedule(&mut self, index: usize) -> Result<(), ActuatorError> {
        self.state.actuators.clear_schedule(index)
    }

    /// Stop polling and discard the dashboard state
    pub fn unmount(mut self) {
        if let Some(poller) = self.poller.take() {
            poller.shutdown();
        }
        info!("Dashboard unmounted");
    }
}

async fn send_relay_command(relays: Arc<dyn RelayWriter>, command: RelayCommand) {
    if let Err(e) = relays.write_relay(command).await {
        warn!(
            relay = command.relay,
            state = command.state_code(),
            error = %e,
            "Relay command failed"
        );
    }
}
