use crate::domain::SensorReading;

/// Default maximum water depth of the tank in cm
pub const DEFAULT_MAX_TANK_DEPTH_CM: f64 = 30.0;

/// Upper end of the pH scale used for the gauge
pub const PH_SCALE_MAX: f64 = 14.0;

/// Convert a raw ultrasonic distance into a tank fill percentage
///
/// A small distance means the water surface is close to the sensor, so the
/// tank is full. Sensor noise outside `[0, max_depth_cm]` is clamped so the
/// result always lies in `[0, 100]`.
pub fn fill_percent(distance_cm: f64, max_depth_cm: f64) -> f64 {
    let percent = ((max_depth_cm - distance_cm) / max_depth_cm) * 100.0;
    if percent.is_nan() {
        return 0.0;
    }
    percent.clamp(0.0, 100.0)
}

/// Fill percentage for a reading; a missing distance counts as an empty tank
pub fn water_level_percent(reading: &SensorReading, max_depth_cm: f64) -> f64 {
    let distance_cm = reading.water_distance_cm.unwrap_or(max_depth_cm);
    fill_percent(distance_cm, max_depth_cm)
}

/// Fill of the circular pH gauge in percent
pub fn ph_gauge_fill(ph: f64) -> f64 {
    let fill = (ph / PH_SCALE_MAX) * 100.0;
    if fill.is_nan() {
        return 0.0;
    }
    fill.clamp(0.0, 100.0)
}
