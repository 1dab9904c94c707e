use chrono::NaiveDateTime;
use tracing::info;

use crate::domain::RelayCommand;
use crate::time::{format_display, DISPLAY_FORMAT};

/// Errors raised by local actuator operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActuatorError {
    #[error("No actuator at position {0}")]
    UnknownActuator(usize),

    #[error("{0} cannot be scheduled")]
    NotSchedulable(String),

    #[error("Invalid schedule '{0}', expected YYYY-MM-DD HH:MM")]
    InvalidSchedule(String),
}

/// Point in time at which a schedulable actuator should run
///
/// Display-only: it is kept on the dashboard and never sent to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledActivation {
    pub at: NaiveDateTime,
}

impl ScheduledActivation {
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at }
    }

    /// Parse a date ("YYYY-MM-DD") and a time ("HH:MM") picked by the user
    pub fn parse(date: &str, time: &str) -> Result<Self, ActuatorError> {
        let raw = format!("{} {}", date, time);
        NaiveDateTime::parse_from_str(&raw, DISPLAY_FORMAT)
            .map(Self::new)
            .map_err(|_| ActuatorError::InvalidSchedule(raw))
    }

    /// Whether the scheduled time has been reached
    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.at
    }
}

impl std::fmt::Display for ScheduledActivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_display(&self.at))
    }
}

/// A relay-controlled device on the habitat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actuator {
    pub name: String,
    pub on: bool,
    pub schedulable: bool,
    pub scheduled: Option<ScheduledActivation>,
}

impl Actuator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on: false,
            schedulable: false,
            scheduled: None,
        }
    }

    pub fn schedulable(name: impl Into<String>) -> Self {
        Self {
            schedulable: true,
            ..Self::new(name)
        }
    }
}

/// Ordered set of actuators; position `i` drives relay `i + 1`
///
/// State is only changed by the user. There is no read-back from the device,
/// so the local state can diverge from the physical relay after a failed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorBank {
    actuators: Vec<Actuator>,
}

impl ActuatorBank {
    pub fn new(actuators: Vec<Actuator>) -> Self {
        Self { actuators }
    }

    /// Live habitat: a single water pump on relay 1
    pub fn water_pump() -> Self {
        Self::new(vec![Actuator::new("Water Pump")])
    }

    /// Mock habitat: a doser that can be scheduled
    pub fn doser() -> Self {
        Self::new(vec![Actuator::schedulable("Doser")])
    }

    pub fn len(&self) -> usize {
        self.actuators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actuators.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Actuator> {
        self.actuators.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actuator> {
        self.actuators.iter()
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Actuator, ActuatorError> {
        self.actuators
            .get_mut(index)
            .ok_or(ActuatorError::UnknownActuator(index))
    }

    /// Flip the actuator at `index` and return the command describing its new state
    pub fn toggle(&mut self, index: usize) -> Result<RelayCommand, ActuatorError> {
        let actuator = self.get_mut(index)?;
        actuator.on = !actuator.on;
        info!(
            actuator = %actuator.name,
            on = actuator.on,
            "Actuator toggled"
        );
        Ok(RelayCommand::for_index(index, actuator.on))
    }

    /// Set the scheduled activation of a schedulable actuator
    pub fn schedule(
        &mut self,
        index: usize,
        activation: ScheduledActivation,
    ) -> Result<(), ActuatorError> {
        let actuator = self.get_mut(index)?;
        if !actuator.schedulable {
            return Err(ActuatorError::NotSchedulable(actuator.name.clone()));
        }
        actuator.scheduled = Some(activation);
        info!(
            actuator = %actuator.name,
            at = %activation,
            "Activation scheduled"
        );
        Ok(())
    }

    /// Remove any scheduled activation
    pub fn clear_schedule(&mut self, index: usize) -> Result<(), ActuatorError> {
        let actuator = self.get_mut(index)?;
        actuator.scheduled = None;
        Ok(())
    }
}
