//! Mock host and pin adapters for integration tests.
//!
//! Records every registration call so tests can assert on the full
//! acquire/release history without touching real drivers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use ledclock::PinError;
use ledclock::app::ports::{HostPort, PinPort, Stage};
use ledclock::config::LedClockConfig;
use ledclock::drivers::led::SimLed;

// ── Host call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    Acquire(Stage),
    Release(Stage),
}

// ── MockHost ──────────────────────────────────────────────────

/// Host whose history survives the adapter being moved into a clock.
#[derive(Clone, Default)]
pub struct MockHost {
    calls: Arc<Mutex<Vec<HostCall>>>,
    fail_at: Option<(Stage, i32)>,
}

#[allow(dead_code)]
impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that refuses `stage` with return code `code`.
    pub fn failing_at(stage: Stage, code: i32) -> Self {
        Self {
            fail_at: Some((stage, code)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn released(&self) -> Vec<Stage> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                HostCall::Release(s) => Some(s),
                HostCall::Acquire(_) => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl HostPort for MockHost {
    fn acquire(&mut self, stage: Stage, _config: &LedClockConfig) -> Result<(), i32> {
        self.record(HostCall::Acquire(stage));
        match self.fail_at {
            Some((s, code)) if s == stage => Err(code),
            _ => Ok(()),
        }
    }

    fn release(&mut self, stage: Stage) {
        self.record(HostCall::Release(stage));
    }
}

// ── FlakyPin ──────────────────────────────────────────────────

/// A [`SimLed`] whose writes can be made to fail on demand.
#[derive(Clone, Default)]
pub struct FlakyPin {
    pub line: SimLed,
    failing: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FlakyPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl PinPort for FlakyPin {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PinError::WriteFailed);
        }
        self.line.set(high)
    }

    fn get(&mut self) -> Result<bool, PinError> {
        self.line.get()
    }
}

// ── TracePin ──────────────────────────────────────────────────

/// Who drove a traced write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Writer {
    /// The toggler's timer task.
    Tick,
    /// Any other thread (control callers, the test itself).
    Caller,
}

/// Name the toggler gives its timer task.
const TICK_THREAD: &str = "ledclock-tick";

/// A pin that keeps every write in order, tagged with its writer.
#[derive(Clone, Default)]
pub struct TracePin {
    trace: Arc<Mutex<Vec<(Writer, bool)>>>,
}

#[allow(dead_code)]
impl TracePin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trace(&self) -> Vec<(Writer, bool)> {
        self.trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn ticks(&self) -> usize {
        self.trace()
            .iter()
            .filter(|(w, _)| *w == Writer::Tick)
            .count()
    }
}

impl PinPort for TracePin {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        let writer = if thread::current().name() == Some(TICK_THREAD) {
            Writer::Tick
        } else {
            Writer::Caller
        };
        self.trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((writer, high));
        Ok(())
    }

    fn get(&mut self) -> Result<bool, PinError> {
        Ok(self
            .trace
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .is_some_and(|(_, level)| *level))
    }
}

// ── Helpers ───────────────────────────────────────────────────

/// Poll `cond` until it holds or `timeout` elapses.
#[allow(dead_code)]
pub fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}
