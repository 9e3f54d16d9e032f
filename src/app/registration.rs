//! Staged acquisition of host resources.
//!
//! [`Registration`] brings up every [`Stage`] in order. If one fails, the
//! stages already acquired are released newest-first before the error is
//! reported, so a failed startup leaves nothing behind. A successful
//! registration is torn down the same way, on [`Registration::release_all`]
//! or on drop.

use heapless::Vec;
use log::{error, info};

use super::ports::{HostPort, Stage};
use crate::config::LedClockConfig;
use crate::error::RegistrationError;

const STAGE_COUNT: usize = Stage::ACQUIRE_ORDER.len();

pub struct Registration<H: HostPort> {
    host: H,
    acquired: Vec<Stage, STAGE_COUNT>,
}

impl<H: HostPort> Registration<H> {
    /// Acquire every stage, or none.
    pub fn acquire(host: H, config: &LedClockConfig) -> Result<Self, RegistrationError> {
        let mut reg = Self {
            host,
            acquired: Vec::new(),
        };

        for stage in Stage::ACQUIRE_ORDER {
            if let Err(code) = reg.host.acquire(stage, config) {
                error!("registration: {} failed (rc={}), unwinding", stage, code);
                reg.release_all();
                return Err(RegistrationError::Stage { stage, code });
            }
            let pushed = reg.acquired.push(stage);
            debug_assert!(pushed.is_ok(), "capacity equals the number of stages");
        }

        info!("registration: {} stages up", reg.acquired.len());
        Ok(reg)
    }

    /// Release every acquired stage in reverse order. Idempotent.
    pub fn release_all(&mut self) {
        while let Some(stage) = self.acquired.pop() {
            self.host.release(stage);
        }
    }

    /// Stages currently held, oldest first.
    pub fn acquired(&self) -> &[Stage] {
        &self.acquired
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: HostPort> Drop for Registration<H> {
    fn drop(&mut self) {
        self.release_all();
    }
}
