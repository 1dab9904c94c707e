use serde::{Deserialize, Serialize};

/// Blocking alert shown to the user
/// Carries a short title and a human-readable message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    /// Alert title (e.g., "Error", "Success")
    pub title: String,

    /// Human-readable message
    pub message: String,
}

impl Alert {
    /// Create a new alert
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Create an alert with the standard error title
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(alert_titles::ERROR, message)
    }

    /// Create an alert with the standard success title
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(alert_titles::SUCCESS, message)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.title, self.message)
    }
}

/// Titles used for alerts across the app
pub mod alert_titles {
    pub const ERROR: &str = "Error";
    pub const SUCCESS: &str = "Success";
}
