//! Mode arbiter: the only path to the LED pin.
//!
//! Both the timer task (toggler) and the control channel go through this
//! type. Each `read` and `write` runs inside one critical section, so a
//! reader observes either the level before a write or the level after it,
//! never a pin caught mid-update.
//!
//! The arbiter orders accesses but does not queue them: whichever write
//! completes last wins. There is no precedence between a forced level and
//! a toggler tick that race each other.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use super::ports::PinPort;
use crate::error::PinError;

pub struct ModeArbiter<P> {
    pin: Mutex<CriticalSectionRawMutex, RefCell<P>>,
}

impl<P: PinPort> ModeArbiter<P> {
    /// Take exclusive ownership of `pin`.
    pub fn new(pin: P) -> Self {
        Self {
            pin: Mutex::new(RefCell::new(pin)),
        }
    }

    /// Snapshot the current level.
    pub fn read(&self) -> Result<bool, PinError> {
        self.pin.lock(|cell| cell.borrow_mut().get())
    }

    /// Drive the pin to `high`.
    pub fn write(&self, high: bool) -> Result<(), PinError> {
        self.pin.lock(|cell| cell.borrow_mut().set(high))
    }
}
