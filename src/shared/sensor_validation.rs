use serde::{Deserialize, Serialize};

use crate::domain::SensorReading;

pub const HUMIDITY_MIN_PCT: f64 = 0.0;
pub const HUMIDITY_MAX_PCT: f64 = 100.0;
pub const PH_MIN: f64 = 0.0;
pub const PH_MAX: f64 = 14.0;
pub const WATER_TEMP_MIN_C: f64 = -10.0;
pub const WATER_TEMP_MAX_C: f64 = 60.0;

/// Display status of a single reading field
///
/// Values are never rejected; the status only decorates what is shown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SensorStatus {
    Ok,
    Missing,
    OutOfRange,
}

impl SensorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SensorStatus::Ok => "ok",
            SensorStatus::Missing => "missing",
            SensorStatus::OutOfRange => "out_of_range",
        }
    }
}

fn validate_range(value: Option<f64>, min: f64, max: f64) -> SensorStatus {
    match value {
        None => SensorStatus::Missing,
        Some(v) if v.is_nan() || v < min || v > max => SensorStatus::OutOfRange,
        Some(_) => SensorStatus::Ok,
    }
}

pub fn validate_humidity(humidity_pct: Option<f64>) -> SensorStatus {
    validate_range(humidity_pct, HUMIDITY_MIN_PCT, HUMIDITY_MAX_PCT)
}

pub fn validate_ph(ph: Option<f64>) -> SensorStatus {
    validate_range(ph, PH_MIN, PH_MAX)
}

pub fn validate_water_temperature(temp_c: Option<f64>) -> SensorStatus {
    validate_range(temp_c, WATER_TEMP_MIN_C, WATER_TEMP_MAX_C)
}

/// Distance has no upper bound here: anything past the tank depth is clamped
/// by the fill computation, so only presence matters.
pub fn validate_water_distance(distance_cm: Option<f64>) -> SensorStatus {
    match distance_cm {
        None => SensorStatus::Missing,
        Some(_) => SensorStatus::Ok,
    }
}

/// Per-field statuses for a reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadingStatus {
    pub humidity: SensorStatus,
    pub water_distance: SensorStatus,
    pub water_temp: SensorStatus,
    pub soil_ph: SensorStatus,
}

pub fn validate_reading(reading: &SensorReading) -> ReadingStatus {
    ReadingStatus {
        humidity: validate_humidity(reading.humidity_pct),
        water_distance: validate_water_distance(reading.water_distance_cm),
        water_temp: validate_water_temperature(reading.water_temp_c),
        soil_ph: validate_ph(reading.soil_ph),
    }
}
