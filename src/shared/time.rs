use chrono::{Local, NaiveDateTime};

/// Format used when parsing and displaying wall-clock times on the dashboard
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Clock trait for abstracting time operations
/// Provides the local wall-clock time the dashboard displays and compares against
pub trait Clock: Send + Sync {
    /// Get current local wall-clock time (no timezone attached)
    fn now_local(&self) -> NaiveDateTime;
}

/// Production implementation of Clock using system time
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Test implementation of Clock with fixed/controllable time
/// Useful for deterministic testing
#[derive(Debug, Clone)]
pub struct FixedClock {
    timestamp: NaiveDateTime,
}

impl FixedClock {
    /// Create a new FixedClock with the given timestamp
    pub fn new(timestamp: NaiveDateTime) -> Self {
        Self { timestamp }
    }

    /// Create a FixedClock from a "YYYY-MM-DD HH:MM" string
    pub fn from_display(timestamp_str: &str) -> Result<Self, chrono::ParseError> {
        let timestamp = NaiveDateTime::parse_from_str(timestamp_str, DISPLAY_FORMAT)?;
        Ok(Self { timestamp })
    }

    /// Update the fixed time
    pub fn set_time(&mut self, timestamp: NaiveDateTime) {
        self.timestamp = timestamp;
    }

    /// Advance time by the given number of seconds
    pub fn advance_seconds(&mut self, seconds: i64) {
        self.timestamp += chrono::Duration::seconds(seconds);
    }
}

impl Clock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        self.timestamp
    }
}

/// Format a wall-clock time for display
pub fn format_display(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
