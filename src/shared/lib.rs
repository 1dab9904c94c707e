// Declare modules at the root level
pub mod actuator;
pub mod dashboard_state;
pub mod device_client;
pub mod domain;
pub mod error;
pub mod gauges;
pub mod sensor_validation;
pub mod session;
pub mod telemetry;
pub mod time;
pub mod view;

// Test utilities module (available in test and integration test builds)
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export everything under a shared namespace for external access
pub mod shared {
    pub use super::actuator;
    pub use super::dashboard_state;
    pub use super::device_client;
    pub use super::domain;
    pub use super::error;
    pub use super::gauges;
    pub use super::sensor_validation;
    pub use super::session;
    pub use super::telemetry;
    pub use super::time;
    pub use super::view;
}

// Also re-export at root for convenience
pub use actuator::*;
pub use dashboard_state::*;
pub use device_client::*;
pub use domain::*;
pub use error::*;
pub use gauges::*;
pub use sensor_validation::*;
pub use session::*;
pub use telemetry::*;
pub use time::*;
pub use view::*;
