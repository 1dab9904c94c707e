use chrono::NaiveDateTime;

use crate::dashboard_state::{DashboardSettings, DashboardState};
use crate::gauges::{ph_gauge_fill, water_level_percent};
use crate::sensor_validation::{validate_reading, ReadingStatus, SensorStatus};
use crate::time::{format_display, Clock};

/// Placeholder shown for a value the device did not report
pub const MISSING_VALUE: &str = "--";

const METER_WIDTH: usize = 20;

/// One row of the "Device Controls" section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRow {
    pub name: String,
    pub on: bool,
    /// "2024-06-01 07:45" plus whether it has passed, for schedulable actuators
    pub schedule: Option<(String, bool)>,
    pub schedulable: bool,
}

/// Derived, display-ready values for the dashboard
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub controls: Vec<ControlRow>,
    pub ph_text: String,
    pub ph_gauge_fill: f64,
    pub humidity_text: String,
    pub water_temp_text: String,
    pub water_level_percent: f64,
    pub water_level_text: String,
    pub status: ReadingStatus,
    pub last_updated: Option<NaiveDateTime>,
    pub poll_failures: u64,
}

impl DashboardView {
    pub fn build(state: &DashboardState, settings: &DashboardSettings, clock: &dyn Clock) -> Self {
        let reading = &state.reading;
        let now = clock.now_local();

        let controls = state
            .actuators
            .iter()
            .map(|actuator| ControlRow {
                name: actuator.name.clone(),
                on: actuator.on,
                schedule: actuator
                    .scheduled
                    .map(|activation| (activation.to_string(), activation.is_due(now))),
                schedulable: actuator.schedulable,
            })
            .collect();

        let level = water_level_percent(reading, settings.max_tank_depth_cm);

        Self {
            controls,
            ph_text: reading
                .soil_ph
                .map(|ph| format!("{:.1} pH", ph))
                .unwrap_or_else(|| format!("{} pH", MISSING_VALUE)),
            ph_gauge_fill: reading.soil_ph.map(ph_gauge_fill).unwrap_or(0.0),
            humidity_text: with_unit(reading.humidity_pct, "%"),
            water_temp_text: with_unit(reading.water_temp_c, "°C"),
            water_level_percent: level,
            water_level_text: format!("{:.0}%", level.round()),
            status: validate_reading(reading),
            last_updated: state.last_updated,
            poll_failures: state.poll_failures,
        }
    }

    /// Render the dashboard as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("== PlantHabitat ==\n\n");
        out.push_str("Device Controls\n");
        for (i, row) in self.controls.iter().enumerate() {
            let switch = if row.on { "ON " } else { "OFF" };
            out.push_str(&format!("  [{}] {:<12} {}\n", i + 1, row.name, switch));
            match &row.schedule {
                Some((at, true)) => {
                    out.push_str(&format!("      scheduled for {} (passed)\n", at))
                }
                Some((at, false)) => out.push_str(&format!("      scheduled for {}\n", at)),
                None if row.schedulable => out.push_str("      not scheduled\n"),
                None => {}
            }
        }

        out.push('\n');
        out.push_str(&format!(
            "pH Level           {} {}{}\n",
            meter(self.ph_gauge_fill),
            self.ph_text,
            marker(self.status.soil_ph)
        ));
        out.push_str(&format!(
            "Humidity           {}{}\n",
            self.humidity_text,
            marker(self.status.humidity)
        ));
        out.push_str(&format!(
            "Water Temperature  {}{}\n",
            self.water_temp_text,
            marker(self.status.water_temp)
        ));
        out.push_str(&format!(
            "Water Level        Empty {} Full  {}{}\n",
            meter(self.water_level_percent),
            self.water_level_text,
            level_marker(self.status.water_distance)
        ));

        out.push('\n');
        match &self.last_updated {
            Some(at) => out.push_str(&format!("Last update: {}", format_display(at))),
            None => out.push_str("Last update: waiting for device"),
        }
        if self.poll_failures > 0 {
            out.push_str(&format!(" ({} failed polls)", self.poll_failures));
        }
        out.push('\n');

        out
    }
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => format!("{} {}", MISSING_VALUE, unit),
    }
}

fn marker(status: SensorStatus) -> &'static str {
    match status {
        SensorStatus::OutOfRange => " (out of range)",
        SensorStatus::Ok | SensorStatus::Missing => "",
    }
}

/// A missing distance is drawn as an empty tank, so say so
fn level_marker(status: SensorStatus) -> &'static str {
    match status {
        SensorStatus::Missing => " (no distance reported)",
        SensorStatus::Ok | SensorStatus::OutOfRange => "",
    }
}

fn meter(percent: f64) -> String {
    let filled = ((percent / 100.0) * METER_WIDTH as f64).round() as usize;
    let filled = filled.min(METER_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(METER_WIDTH - filled))
}
