//! Test utilities for property-based and async tests
//!
//! This module provides proptest generators for domain values (distances,
//! tank depths, credentials, readings) and scriptable fakes for the device
//! traits so poller and actuator behavior can be tested without a network.

pub mod generators {
    use proptest::prelude::*;

    use crate::domain::SensorReading;

    /// Generate a tank depth in cm (always positive)
    pub fn tank_depth_cm() -> impl Strategy<Value = f64> {
        1.0f64..500.0
    }

    /// Generate any finite distance, including sensor noise far outside the tank
    pub fn distance_cm() -> impl Strategy<Value = f64> {
        prop_oneof![
            -1000.0f64..1000.0,
            Just(0.0),
            Just(-0.0),
            Just(f64::MAX),
            Just(f64::MIN),
        ]
    }

    /// Generate a non-empty form field
    pub fn non_empty_field() -> impl Strategy<Value = String> {
        prop::string::string_regex("[A-Za-z0-9_.@!-]{1,32}").expect("Valid regex for field")
    }

    /// Generate a pair of different non-empty passwords
    pub fn mismatched_passwords() -> impl Strategy<Value = (String, String)> {
        (non_empty_field(), non_empty_field()).prop_filter("passwords must differ", |(a, b)| a != b)
    }

    /// Generate a reading with every field optionally missing
    pub fn sensor_reading() -> impl Strategy<Value = SensorReading> {
        (
            prop::option::of(0.0f64..100.0),
            prop::option::of(-10.0f64..60.0),
            prop::option::of(5.0f64..40.0),
            prop::option::of(0.0f64..14.0),
        )
            .prop_map(|(humidity, distance, temp, ph)| SensorReading {
                humidity_pct: humidity,
                water_distance_cm: distance,
                water_temp_c: temp,
                soil_ph: ph,
            })
    }
}

pub mod fakes {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::device_client::{DeviceError, RelayWriter, TelemetrySource};
    use crate::domain::{RelayCommand, SensorReading};

    /// Relay writer that records every command it receives
    #[derive(Debug, Clone, Default)]
    pub struct RecordingRelayWriter {
        commands: Arc<Mutex<Vec<RelayCommand>>>,
        fail: bool,
    }

    impl RecordingRelayWriter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Writer that records commands and then reports a transport failure
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn commands(&self) -> Vec<RelayCommand> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RelayWriter for RecordingRelayWriter {
        async fn write_relay(&self, command: RelayCommand) -> Result<(), DeviceError> {
            self.commands.lock().unwrap().push(command);
            if self.fail {
                return Err(DeviceError::Transport("connection refused".to_string()));
            }
            Ok(())
        }
    }

    /// One scripted response: wait `delay`, then return `result`
    pub struct ScriptedResponse {
        pub delay: Duration,
        pub result: Result<SensorReading, DeviceError>,
    }

    impl ScriptedResponse {
        pub fn ok(reading: SensorReading) -> Self {
            Self {
                delay: Duration::ZERO,
                result: Ok(reading),
            }
        }

        pub fn fail(message: &str) -> Self {
            Self {
                delay: Duration::ZERO,
                result: Err(DeviceError::Transport(message.to_string())),
            }
        }

        pub fn after(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    /// Telemetry source replaying scripted responses in call order
    ///
    /// Once the script runs out every call fails.
    #[derive(Clone, Default)]
    pub struct ScriptedTelemetry {
        script: Arc<Mutex<VecDeque<ScriptedResponse>>>,
        calls: Arc<Mutex<usize>>,
        completed: Arc<Mutex<usize>>,
    }

    impl ScriptedTelemetry {
        pub fn new(script: Vec<ScriptedResponse>) -> Self {
            Self {
                script: Arc::new(Mutex::new(script.into())),
                calls: Arc::new(Mutex::new(0)),
                completed: Arc::new(Mutex::new(0)),
            }
        }

        /// Number of fetches issued so far
        pub fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }

        /// Number of fetches that ran to completion (not cancelled mid-delay)
        pub fn completed(&self) -> usize {
            *self.completed.lock().unwrap()
        }
    }

    #[async_trait]
    impl TelemetrySource for ScriptedTelemetry {
        async fn fetch_reading(&self) -> Result<SensorReading, DeviceError> {
            *self.calls.lock().unwrap() += 1;
            let next = self.script.lock().unwrap().pop_front();
            let result = match next {
                Some(response) => {
                    if !response.delay.is_zero() {
                        tokio::time::sleep(response.delay).await;
                    }
                    response.result
                }
                None => Err(DeviceError::Transport("script exhausted".to_string())),
            };
            *self.completed.lock().unwrap() += 1;
            result
        }
    }
}
