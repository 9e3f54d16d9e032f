//! Control channel: the on-demand half of the clock.
//!
//! An external caller can query the LED level or force it. Everything goes
//! through the [`ModeArbiter`], so calls racing the timer task (or each
//! other) never corrupt the pin.
//!
//! A forced level is **not sticky**: it holds only until the next toggler
//! expiry, which writes its own parity-determined level. This is intended;
//! the channel overrides the clock for at most one period.
//!
//! [`ControlSession`] is the device-file view of the same channel: open,
//! raw one-byte reads, ASCII writes, release.

use std::sync::Arc;

use log::{debug, error, info};

use super::arbiter::ModeArbiter;
use super::commands::{ControlRequest, ControlResponse, encode_level};
use super::ports::PinPort;
use crate::error::{Error, Result};

pub struct ControlChannel<P> {
    arbiter: Arc<ModeArbiter<P>>,
}

impl<P> Clone for ControlChannel<P> {
    fn clone(&self) -> Self {
        Self {
            arbiter: Arc::clone(&self.arbiter),
        }
    }
}

impl<P: PinPort> ControlChannel<P> {
    pub fn new(arbiter: Arc<ModeArbiter<P>>) -> Self {
        Self { arbiter }
    }

    /// Current level of the LED.
    pub fn query(&self) -> Result<bool> {
        Ok(self.arbiter.read()?)
    }

    /// Drive the LED to `high` until the next toggler tick.
    pub fn force(&self, high: bool) -> Result<()> {
        Ok(self.arbiter.write(high)?)
    }

    /// Decode a device-style payload and force the level it names.
    ///
    /// Anything other than a leading `'0'` / `'1'` is rejected with
    /// [`Error::InvalidCommand`] and the pin is left untouched.
    pub fn force_bytes(&self, buf: &[u8]) -> Result<bool> {
        match self.handle(ControlRequest::from_write(buf)?)? {
            ControlResponse::Forced(level) | ControlResponse::Level(level) => Ok(level),
        }
    }

    pub fn handle(&self, request: ControlRequest) -> Result<ControlResponse> {
        match request {
            ControlRequest::Query => self.query().map(ControlResponse::Level),
            ControlRequest::Force(level) => {
                self.force(level)?;
                Ok(ControlResponse::Forced(level))
            }
        }
    }

    /// Open a device-file style session on this channel.
    pub fn open(&self) -> ControlSession<P> {
        info!("control: device file opened");
        ControlSession {
            channel: self.clone(),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Device-file session
// ───────────────────────────────────────────────────────────────

/// Result of a device write.
///
/// The whole buffer is always reported as consumed, whether or not the
/// command was accepted; `result` tells the caller which.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReport {
    pub consumed: usize,
    pub result: Result<bool>,
}

/// An open handle on the control channel. Released (and logged) on drop.
pub struct ControlSession<P: PinPort> {
    channel: ControlChannel<P>,
}

impl<P: PinPort> ControlSession<P> {
    /// Read the current level as one raw byte (`0x00` / `0x01`).
    ///
    /// Returns the number of bytes placed in `buf`: 1, or 0 if `buf` is empty.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(slot) = buf.first_mut() else {
            return Ok(0);
        };
        let level = self.channel.query()?;
        *slot = encode_level(level);
        debug!("control: read LED = {}", *slot);
        Ok(1)
    }

    /// Interpret the first byte of `buf` as a force command.
    pub fn write(&mut self, buf: &[u8]) -> WriteReport {
        let result = self.channel.force_bytes(buf);
        match &result {
            Ok(level) => debug!("control: write LED set = {}", u8::from(*level)),
            Err(e @ Error::InvalidCommand(_)) => {
                error!("control: {} (provide either 1 or 0)", e);
            }
            Err(e) => error!("control: write failed: {}", e),
        }
        WriteReport {
            consumed: buf.len(),
            result,
        }
    }
}

impl<P: PinPort> Drop for ControlSession<P> {
    fn drop(&mut self) {
        info!("control: device file released");
    }
}
