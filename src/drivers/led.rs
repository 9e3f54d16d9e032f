//! Clock LED drivers.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`HalLed`] wraps the `esp_idf_hal` pin driver (it accepts
//! any `embedded_hal` stateful output pin).
//! On host/test: [`SimLed`] tracks the level in-memory only.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::digital::StatefulOutputPin;

use crate::app::ports::PinPort;
use crate::error::PinError;

// ── embedded-hal adapter ──────────────────────────────────────

/// LED on an `embedded_hal` output pin.
///
/// The level is read back from the output latch (`is_set_high`), so it
/// reports what was last driven rather than sampling the pad.
pub struct HalLed<P> {
    pin: P,
}

impl<P: StatefulOutputPin> HalLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: StatefulOutputPin> PinPort for HalLed<P> {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| PinError::WriteFailed)
    }

    fn get(&mut self) -> Result<bool, PinError> {
        self.pin.is_set_high().map_err(|_| PinError::ReadFailed)
    }
}

// ── Simulated GPIO ────────────────────────────────────────────

/// In-memory LED line.
///
/// Clones share the same line, so a test (or the host simulation) can
/// keep a probe while the arbiter owns the driving handle.
#[derive(Debug, Clone, Default)]
pub struct SimLed {
    level: Arc<AtomicBool>,
    writes: Arc<AtomicU32>,
}

impl SimLed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Level currently on the line.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::SeqCst)
    }

    /// Total number of writes since creation.
    pub fn writes(&self) -> u32 {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PinPort for SimLed {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        self.level.store(high, Ordering::SeqCst);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn get(&mut self) -> Result<bool, PinError> {
        Ok(self.level())
    }
}
