//! Periodic toggler: the autonomous half of the clock.
//!
//! [`Toggler`] is the pure tick logic: each expiry writes the parity of the
//! tick counter to the pin, then advances the counter. Starting from 0 the
//! pin sequence is `false, true, false, true, …`.
//!
//! [`PeriodicToggler`] binds a `Toggler` to a [`PeriodicTimer`] so the
//! expiries are driven by a dedicated timer task. A level forced through the
//! control channel in between is simply overwritten by the next tick.

use std::sync::Arc;
use std::time::Duration;

use log::{error, warn};

use super::arbiter::ModeArbiter;
use super::ports::PinPort;
use crate::config::TimerTaskConfig;
use crate::drivers::hw_timer::{self, PeriodicTimer, TaskSpawner};
use crate::error::RegistrationError;

/// Name of the timer task (null-terminated for `esp_pthread_set_cfg`).
const TICK_TASK_NAME: &str = "ledclock-tick\0";

/// Tick counter plus the expiry rule.
#[derive(Debug, Default)]
pub struct Toggler {
    counter: u32,
}

impl Toggler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from an arbitrary counter value.
    pub fn starting_at(counter: u32) -> Self {
        Self { counter }
    }

    /// Handle one timer expiry.
    ///
    /// Never fails: a pin write error is logged and the cycle continues.
    /// Returns the level that was written (or attempted).
    pub fn on_expiry<P: PinPort>(&mut self, arbiter: &ModeArbiter<P>) -> bool {
        let level = self.counter % 2 == 1;
        self.counter = self.counter.wrapping_add(1);
        if let Err(e) = arbiter.write(level) {
            warn!("toggler: tick write failed ({}), rescheduling", e);
        }
        level
    }
}

/// Handle to a running toggler. Dropping it stops it.
pub struct PeriodicToggler {
    timer: PeriodicTimer,
}

impl PeriodicToggler {
    /// Arm the toggler with a fresh counter.
    pub fn start<P>(
        arbiter: Arc<ModeArbiter<P>>,
        period: Duration,
        task: TimerTaskConfig,
    ) -> Result<Self, RegistrationError>
    where
        P: PinPort + Send + 'static,
    {
        Self::start_with(hw_timer::spawn_timer_task, arbiter, period, task)
    }

    /// Like [`start`](Self::start), with the timer task created by `spawn`.
    pub fn start_with<P>(
        spawn: TaskSpawner,
        arbiter: Arc<ModeArbiter<P>>,
        period: Duration,
        task: TimerTaskConfig,
    ) -> Result<Self, RegistrationError>
    where
        P: PinPort + Send + 'static,
    {
        let mut toggler = Toggler::new();
        let timer = PeriodicTimer::start_with(spawn, TICK_TASK_NAME, period, task, move || {
            toggler.on_expiry(&arbiter);
        })
        .map_err(|e| {
            error!("toggler: timer task spawn failed: {}", e);
            RegistrationError::TimerSpawn
        })?;
        Ok(Self { timer })
    }

    /// Stop toggling. No pin write happens after this returns.
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }
}
