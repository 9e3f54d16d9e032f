//! System configuration parameters
//!
//! Deployment parameters for the LED clock. The toggle period is a
//! constant, not a field: it is fixed for the lifetime of the firmware.
//! The remaining values can be overridden at build time by setting
//! `LEDCLOCK_CONFIG_JSON`.

use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pins;

/// Period between two toggler expiries.
pub const TOGGLE_PERIOD: Duration = Duration::from_millis(10);

/// Short name used for host-visible identifiers.
pub type Name = heapless::String<24>;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedClockConfig {
    // --- Pin ---
    /// GPIO number driving the LED
    pub led_gpio: i32,

    // --- Host registration ---
    /// Name the control device is registered under
    pub device_name: Name,
    /// Name of the visible device node
    pub node_name: Name,
    /// UART number backing the control console
    pub console_uart: i32,

    // --- Timer task ---
    pub timer: TimerTaskConfig,
}

/// Scheduling parameters for the toggler's timer task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerTaskConfig {
    /// FreeRTOS priority (ignored on host)
    pub priority: u8,
    /// Stack size in KiB
    pub stack_kb: u16,
}

impl Default for TimerTaskConfig {
    fn default() -> Self {
        Self {
            priority: 10,
            stack_kb: 4,
        }
    }
}

impl Default for LedClockConfig {
    fn default() -> Self {
        Self {
            led_gpio: pins::LED_GPIO,
            device_name: name("ledclock_Dev"),
            node_name: name("ledclock_device"),
            console_uart: pins::CONSOLE_UART,
            timer: TimerTaskConfig::default(),
        }
    }
}

impl LedClockConfig {
    /// Decode a JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the firmware cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=48).contains(&self.led_gpio) {
            return Err(ConfigError::ValidationFailed("led_gpio must be 0..=48"));
        }
        if self.device_name.is_empty() {
            return Err(ConfigError::ValidationFailed("device_name must not be empty"));
        }
        if self.node_name.is_empty() {
            return Err(ConfigError::ValidationFailed("node_name must not be empty"));
        }
        if !(0..=2).contains(&self.console_uart) {
            return Err(ConfigError::ValidationFailed("console_uart must be 0..=2"));
        }
        if self.timer.stack_kb < 2 {
            return Err(ConfigError::ValidationFailed("timer.stack_kb must be at least 2"));
        }
        Ok(())
    }
}

fn name(s: &str) -> Name {
    let mut n = Name::new();
    // Every literal above fits in 24 bytes.
    let _ = n.push_str(s);
    n
}
