//! Application service: lifecycle of the LED clock.
//!
//! [`LedClock`] owns the host registration, the arbiter around the LED pin,
//! and the running toggler. It is the start/shutdown pair the host calls
//! exactly once each:
//!
//! ```text
//!  HostPort ──▶ ┌─────────────────────────────┐
//!               │          LedClock           │ ──▶ ControlChannel (clones)
//!   PinPort ──▶ │  Registration · Arbiter ·   │
//!               │  PeriodicToggler            │
//!               └─────────────────────────────┘
//! ```

use std::sync::Arc;

use log::{info, warn};

use super::arbiter::ModeArbiter;
use super::control::ControlChannel;
use super::ports::{HostPort, PinPort};
use super::registration::Registration;
use super::toggler::PeriodicToggler;
use crate::config::{LedClockConfig, TOGGLE_PERIOD};
use crate::drivers::hw_timer::{self, TaskSpawner};
use crate::error::Result;

pub struct LedClock<P, H: HostPort> {
    // Field order matters for drop: the toggler stops before the
    // registration unwinds.
    toggler: PeriodicToggler,
    arbiter: Arc<ModeArbiter<P>>,
    registration: Registration<H>,
}

impl<P, H> LedClock<P, H>
where
    P: PinPort + Send + 'static,
    H: HostPort,
{
    /// Start hook: register with the host, take the pin, arm the toggler.
    ///
    /// On failure everything acquired so far is released in reverse order
    /// before the error is returned.
    pub fn init(host: H, pin: P, config: &LedClockConfig) -> Result<Self> {
        Self::init_with(hw_timer::spawn_timer_task, host, pin, config)
    }

    /// Like [`init`](Self::init), with the timer task created by `spawn`.
    pub fn init_with(
        spawn: TaskSpawner,
        host: H,
        mut pin: P,
        config: &LedClockConfig,
    ) -> Result<Self> {
        config.validate()?;
        let registration = Registration::acquire(host, config)?;

        // Output starts low, like a freshly configured GPIO.
        if let Err(e) = pin.set(false) {
            warn!("ledclock: initial low write failed ({}), continuing", e);
        }
        let arbiter = Arc::new(ModeArbiter::new(pin));

        let toggler =
            PeriodicToggler::start_with(spawn, Arc::clone(&arbiter), TOGGLE_PERIOD, config.timer)?;

        info!(
            "ledclock: initialized using GPIO {} (period {}us)",
            config.led_gpio,
            TOGGLE_PERIOD.as_micros()
        );
        Ok(Self {
            toggler,
            arbiter,
            registration,
        })
    }

    /// A control channel bound to this clock's pin.
    pub fn channel(&self) -> ControlChannel<P> {
        ControlChannel::new(Arc::clone(&self.arbiter))
    }

    pub fn is_running(&self) -> bool {
        self.toggler.is_running()
    }

    /// Shutdown hook: stop the toggler, then release the host stages
    /// newest-first. Control channels still held by callers keep the pin
    /// alive but nothing toggles it any more.
    pub fn shutdown(mut self) {
        self.toggler.stop();
        self.registration.release_all();
        info!("ledclock: exit done");
    }
}
