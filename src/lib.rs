//! LED clock firmware library.
//!
//! A periodic timer task toggles one GPIO every 10 ms while a control
//! channel lets callers read or force the level. Both paths go through a
//! single mode arbiter. Startup registers the device with the host in
//! stages and unwinds them in reverse on failure or shutdown.
//!
//! All ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each module; the rest runs on the host for testing.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;

#[cfg(target_os = "espidf")]
mod esp_link_shims;

pub use error::{ConfigError, Error, PinError, RegistrationError, Result};
