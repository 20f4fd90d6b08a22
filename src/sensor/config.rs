//! Sensor connection configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the serial link and decoding policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Serial device path (e.g. "/dev/ttyUSB0")
    pub device: String,
    /// Line speed; the PM1006 talks at 9600 baud
    pub baud_rate: u32,
    /// Serial read timeout in milliseconds, used as the shutdown poll interval
    pub read_timeout_ms: u64,
    /// Skip publishing readings from frames whose checksum fails
    pub reject_on_checksum_failure: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            device: String::new(),
            baud_rate: crate::DEFAULT_BAUD_RATE,
            read_timeout_ms: crate::DEFAULT_READ_TIMEOUT_MS,
            reject_on_checksum_failure: false,
        }
    }
}

impl SensorConfig {
    /// Create a configuration for the given device with default settings.
    pub fn new(device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            ..Default::default()
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_read_timeout_ms(mut self, read_timeout_ms: u64) -> Self {
        self.read_timeout_ms = read_timeout_ms;
        self
    }

    pub fn with_reject_on_checksum_failure(mut self, reject: bool) -> Self {
        self.reject_on_checksum_failure = reject;
        self
    }
}
