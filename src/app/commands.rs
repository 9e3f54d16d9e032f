//! Control requests and their byte-level encoding.
//!
//! The typed [`ControlRequest`] is what the control channel acts on. The
//! device-file wire format is kept byte-for-byte at the boundary:
//!
//! | Direction | Bytes                     | Meaning                        |
//! |-----------|---------------------------|--------------------------------|
//! | write     | `'1'` then anything       | force high                     |
//! | write     | `'0'` then anything       | force low                      |
//! | write     | any other first byte      | rejected (`InvalidCommand`)    |
//! | read      | one byte, `0x00` / `0x01` | current level, raw (not ASCII) |
//!
//! Note the asymmetry: writes take ASCII digits, reads return the raw
//! numeric level. Callers depend on both.

use crate::error::{Error, Result};

/// ASCII token forcing the pin high.
pub const FORCE_HIGH: u8 = b'1';
/// ASCII token forcing the pin low.
pub const FORCE_LOW: u8 = b'0';

/// Commands an external caller can send to the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Report the current level.
    Query,
    /// Drive the pin to the given level until the next toggler tick.
    Force(bool),
}

/// Successful outcome of a [`ControlRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlResponse {
    /// Answer to [`ControlRequest::Query`].
    Level(bool),
    /// The level that was forced.
    Forced(bool),
}

impl ControlRequest {
    /// Decode a device write. Only the first byte is interpreted.
    pub fn from_write(buf: &[u8]) -> Result<Self> {
        match buf.first() {
            Some(&FORCE_HIGH) => Ok(Self::Force(true)),
            Some(&FORCE_LOW) => Ok(Self::Force(false)),
            other => Err(Error::InvalidCommand(other.copied())),
        }
    }
}

/// Encode a level the way a device read returns it.
pub const fn encode_level(high: bool) -> u8 {
    high as u8
}
