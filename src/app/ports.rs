//! Port traits: the boundary between the clock logic and the outside world.
//!
//! ```text
//!   Adapter / driver ──▶ Port trait ──▶ LedClock (domain)
//! ```
//!
//! Drivers (the LED pin) and adapters (the host registration layer)
//! implement these traits. The [`LedClock`](super::service::LedClock)
//! consumes them via generics, so the core never touches hardware directly
//! and every path can be exercised with mocks.

use core::fmt;

use crate::config::LedClockConfig;
use crate::error::PinError;

// ───────────────────────────────────────────────────────────────
// Pin port (driven: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// A single binary output line.
///
/// Implementations are owned by the [`ModeArbiter`](super::arbiter::ModeArbiter);
/// nothing else holds a writable handle once the clock is running.
pub trait PinPort {
    /// Drive the line to `high`.
    fn set(&mut self, high: bool) -> Result<(), PinError>;

    /// Sample the level the line is currently driven to.
    ///
    /// Takes `&mut self` because `embedded_hal` latch reads do.
    fn get(&mut self) -> Result<bool, PinError>;
}

// ───────────────────────────────────────────────────────────────
// Host port (driven: domain ↔ host environment)
// ───────────────────────────────────────────────────────────────

/// One host resource acquired during startup.
///
/// Stages are acquired in [`Stage::ACQUIRE_ORDER`] and released in the
/// exact reverse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Allocate the device identifier.
    AllocateId,
    /// Register the control entry point with the host.
    RegisterDevice,
    /// Make the device node visible to callers.
    CreateNode,
    /// Validate and claim the LED GPIO as an output.
    RequestPin,
}

impl Stage {
    pub const ACQUIRE_ORDER: [Stage; 4] = [
        Stage::AllocateId,
        Stage::RegisterDevice,
        Stage::CreateNode,
        Stage::RequestPin,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocateId => write!(f, "allocate id"),
            Self::RegisterDevice => write!(f, "register device"),
            Self::CreateNode => write!(f, "create node"),
            Self::RequestPin => write!(f, "request pin"),
        }
    }
}

/// The host registration layer.
///
/// # Contract
///
/// - `acquire` is called at most once per stage, in [`Stage::ACQUIRE_ORDER`].
/// - `release` is only called for stages whose `acquire` succeeded, and
///   exactly once each.
pub trait HostPort {
    /// Bring up one stage. `Err` carries the host's return code.
    fn acquire(&mut self, stage: Stage, config: &LedClockConfig) -> Result<(), i32>;

    /// Tear down one previously acquired stage. Must not fail.
    fn release(&mut self, stage: Stage);
}
