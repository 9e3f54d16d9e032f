//! Unified error types for the LED clock.
//!
//! A single `Error` enum that every subsystem converts into. All variants
//! are `Copy` so they can be handed back across the control channel and
//! logged from the timer task without allocation.

use core::fmt;

use crate::app::ports::Stage;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A force payload was neither `'0'` nor `'1'`. Carries the offending
    /// first byte, or `None` for an empty buffer.
    InvalidCommand(Option<u8>),
    /// The underlying pin could not be read or written.
    PinAccess(PinError),
    /// The host could not provide a resource during startup.
    Registration(RegistrationError),
    /// Configuration is invalid or could not be decoded.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCommand(Some(b)) => {
                write!(f, "invalid command 0x{b:02x}: expected '1' or '0'")
            }
            Self::InvalidCommand(None) => write!(f, "invalid command: empty payload"),
            Self::PinAccess(e) => write!(f, "pin: {e}"),
            Self::Registration(e) => write!(f, "registration: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Pin errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinError {
    /// Driving the output level failed.
    WriteFailed,
    /// Sampling the output level failed.
    ReadFailed,
}

impl fmt::Display for PinError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "GPIO write failed"),
            Self::ReadFailed => write!(f, "GPIO read failed"),
        }
    }
}

impl From<PinError> for Error {
    fn from(e: PinError) -> Self {
        Self::PinAccess(e)
    }
}

// ---------------------------------------------------------------------------
// Registration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationError {
    /// A host stage refused to come up. `code` is the host's return code.
    Stage { stage: Stage, code: i32 },
    /// The timer task could not be spawned.
    TimerSpawn,
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stage { stage, code } => write!(f, "{stage} failed (rc={code})"),
            Self::TimerSpawn => write!(f, "timer task spawn failed"),
        }
    }
}

impl From<RegistrationError> for Error {
    fn from(e: RegistrationError) -> Self {
        Self::Registration(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON override could not be decoded.
    Malformed,
    /// A field failed range validation. Names the field and the rule.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed config"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
