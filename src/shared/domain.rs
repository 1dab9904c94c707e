use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sensor reading reported by the habitat device on `GET /sensor`
///
/// Field names on the wire are the device's short keys. A key the device
/// leaves out (or sends as `null`) deserializes to `None` and is shown as a
/// placeholder. The payload itself must be a JSON object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(try_from = "Map<String, Value>")]
pub struct SensorReading {
    /// Air humidity in percent
    #[serde(rename = "hum", skip_serializing_if = "Option::is_none")]
    pub humidity_pct: Option<f64>,

    /// Distance from the ultrasonic sensor to the water surface in cm
    #[serde(rename = "water", skip_serializing_if = "Option::is_none")]
    pub water_distance_cm: Option<f64>,

    /// Water temperature in degrees Celsius
    #[serde(rename = "soiltemp", skip_serializing_if = "Option::is_none")]
    pub water_temp_c: Option<f64>,

    /// Soil pH
    #[serde(rename = "soilph", skip_serializing_if = "Option::is_none")]
    pub soil_ph: Option<f64>,
}

impl SensorReading {
    /// Reading displayed when the dashboard mounts, before the first poll lands
    pub fn initial() -> Self {
        Self {
            humidity_pct: Some(0.0),
            water_distance_cm: Some(0.0),
            water_temp_c: Some(0.0),
            soil_ph: Some(0.0),
        }
    }
}

/// Field layout of the `/sensor` payload
#[derive(Deserialize)]
struct SensorPayload {
    #[serde(default)]
    hum: Option<f64>,
    #[serde(default)]
    water: Option<f64>,
    #[serde(default)]
    soiltemp: Option<f64>,
    #[serde(default)]
    soilph: Option<f64>,
}

// Going through a map keeps arrays from being read positionally
impl TryFrom<Map<String, Value>> for SensorReading {
    type Error = serde_json::Error;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let payload: SensorPayload = serde_json::from_value(Value::Object(fields))?;
        Ok(Self {
            humidity_pct: payload.hum,
            water_distance_cm: payload.water,
            water_temp_c: payload.soiltemp,
            soil_ph: payload.soilph,
        })
    }
}

/// Command for a single relay on the device
///
/// `relay` is 1-based, matching the device's `/update?relay=` numbering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelayCommand {
    pub relay: usize,
    pub on: bool,
}

impl RelayCommand {
    /// Build the command for the actuator at a 0-based position
    pub fn for_index(index: usize, on: bool) -> Self {
        Self {
            relay: index + 1,
            on,
        }
    }

    /// State code sent to the device (1 = on, 0 = off)
    pub fn state_code(&self) -> u8 {
        u8::from(self.on)
    }

    /// Query pairs for `GET /update`
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("relay", self.relay.to_string()),
            ("state", self.state_code().to_string()),
        ]
    }
}
