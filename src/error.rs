use thiserror::Error;

use crate::config::ConfigError;
use planthabitat::{ActuatorError, Alert, DeviceError, SessionError};

/// Main error type for the dashboard binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Actuator error: {0}")]
    Actuator(#[from] ActuatorError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

/// Errors parsing a line of user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid device number")]
    InvalidDevice(String),
}

impl AppError {
    /// Convert error to the alert shown to the user
    pub fn to_alert(&self) -> Alert {
        match self {
            AppError::Session(e) => e.to_alert(),
            AppError::Actuator(ActuatorError::UnknownActuator(index)) => {
                Alert::error(format!("No device number {}", index + 1))
            }
            AppError::Actuator(e) => Alert::error(e.to_string()),
            AppError::Command(e) => Alert::error(e.to_string()),
            AppError::Config(e) => Alert::error(e.to_string()),
            AppError::Device(_) => Alert::error("Could not reach the habitat device"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_alert() {
        let error = AppError::from(SessionError::PasswordMismatch);
        let alert = error.to_alert();

        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "Passwords do not match");
    }

    #[test]
    fn test_unknown_actuator_is_one_based_for_users() {
        let error = AppError::from(ActuatorError::UnknownActuator(1));
        assert_eq!(error.to_alert().message, "No device number 2");
    }

    #[test]
    fn test_command_error_alert() {
        let error = AppError::from(CommandError::Usage("toggle <n>"));
        assert_eq!(error.to_alert().message, "Usage: toggle <n>");
    }

    #[test]
    fn test_device_error_alert_hides_details() {
        let error = AppError::from(DeviceError::Client("tls backend missing".to_string()));
        assert_eq!(error.to_alert().message, "Could not reach the habitat device");
        assert!(error.to_string().contains("tls backend missing"));
    }
}
