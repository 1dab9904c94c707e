use std::time::Duration;

use planthabitat::{
    DashboardSettings, DEFAULT_DEVICE_HOST, DEFAULT_MAX_TANK_DEPTH_CM, DEFAULT_POLL_INTERVAL,
};

/// Which telemetry source the dashboard is mounted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSourceKind {
    /// Poll the habitat device over HTTP
    Live,
    /// Static readings and a schedulable doser, no device
    Mock,
}

/// Configuration for the dashboard binary
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the habitat device
    pub device_host: String,
    /// Maximum water depth of the tank in cm
    pub max_tank_depth_cm: f64,
    /// Sensor polling period
    pub poll_interval: Duration,
    /// Telemetry source
    pub data_source: DataSourceKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device_host: DEFAULT_DEVICE_HOST.to_string(),
            max_tank_depth_cm: DEFAULT_MAX_TANK_DEPTH_CM,
            poll_interval: DEFAULT_POLL_INTERVAL,
            data_source: DataSourceKind::Live,
        }
    }
}

impl Config {
    /// Create a new Config instance from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Create a Config from any variable lookup; unset variables take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let device_host = lookup("DEVICE_HOST").unwrap_or(defaults.device_host);
        if !(device_host.starts_with("http://") || device_host.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                var: "DEVICE_HOST".to_string(),
                value: device_host,
            });
        }

        let max_tank_depth_cm = match lookup("MAX_TANK_DEPTH_CM") {
            Some(raw) => parse_positive_f64("MAX_TANK_DEPTH_CM", &raw)?,
            None => defaults.max_tank_depth_cm,
        };

        let poll_interval = match lookup("POLL_INTERVAL_MS") {
            Some(raw) => Duration::from_millis(parse_positive_u64("POLL_INTERVAL_MS", &raw)?),
            None => defaults.poll_interval,
        };

        let data_source = match lookup("DATA_SOURCE") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "live" => DataSourceKind::Live,
                "mock" => DataSourceKind::Mock,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "DATA_SOURCE".to_string(),
                        value: raw,
                    })
                }
            },
            None => defaults.data_source,
        };

        Ok(Config {
            device_host,
            max_tank_depth_cm,
            poll_interval,
            data_source,
        })
    }

    /// Settings handed to a mounted dashboard
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            max_tank_depth_cm: self.max_tank_depth_cm,
            poll_interval: self.poll_interval,
        }
    }
}

fn parse_positive_f64(var: &str, raw: &str) -> Result<f64, ConfigError> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn parse_positive_u64(var: &str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: '{value}'")]
    InvalidValue { var: String, value: String },
}
