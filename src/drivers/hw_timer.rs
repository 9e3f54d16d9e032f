//! Recurring timer task with explicit rearm and cancellation.
//!
//! Each [`PeriodicTimer`] owns one dedicated task (spawned through
//! [`task_pin::spawn_on_core`]) that sleeps until its deadline, runs the
//! registered expiry callback, and then decides whether to rearm:
//!
//! ```text
//!   ┌──────────────┐  deadline  ┌────────────┐  not cancelled  ┌───────────┐
//!   │ wait (token) │───────────▶│ on_expiry  │────────────────▶│ rearm:    │
//!   └──────────────┘            └────────────┘                 │ now + T   │
//!          ▲                          │ cancelled              └─────┬─────┘
//!          │                          ▼                              │
//!          │                        exit                             │
//!          └─────────────────────────────────────────────────────────┘
//! ```
//!
//! The next deadline is measured from the moment the callback returns,
//! not from the intended fire time. Lateness therefore shifts the whole
//! schedule instead of accumulating, and is never caught up.
//!
//! Timer tasks run on the APP core at the configured priority on ESP-IDF
//! (plain threads elsewhere), so callbacks may take a short mutex but must
//! not block on anything unbounded.

use std::io;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{error, info};

use super::task_pin::{self, Core};
use crate::config::TimerTaskConfig;

// ── Cancellation token ───────────────────────────────────────

/// Shared cancellation flag checked at every rearm decision point.
///
/// Cancelling wakes a task blocked in [`CancelToken::wait_until`]
/// immediately instead of letting it sleep out its period.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        let (flag, cvar) = &*self.inner;
        *lock(flag) = true;
        cvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *lock(&self.inner.0)
    }

    /// Block until `deadline` or until cancelled, whichever comes first.
    /// Returns `true` if cancelled.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let (flag, cvar) = &*self.inner;
        let mut cancelled = lock(flag);
        loop {
            if *cancelled {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            cancelled = cvar
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

// A panicking expiry callback must not wedge stop().
fn lock(flag: &Mutex<bool>) -> MutexGuard<'_, bool> {
    flag.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Periodic timer ───────────────────────────────────────────

/// A running recurring timer. Dropping it stops it.
pub struct PeriodicTimer {
    name: &'static str,
    token: CancelToken,
    worker: Option<JoinHandle<()>>,
}

/// Spawns the task behind a [`PeriodicTimer`].
///
/// Receives the null-terminated task name, the scheduling parameters and
/// the task body. [`spawn_timer_task`] is the one used on the firmware.
pub type TaskSpawner =
    fn(&'static str, TimerTaskConfig, Box<dyn FnOnce() + Send>) -> io::Result<JoinHandle<()>>;

/// Default [`TaskSpawner`]: a task pinned to the APP core.
pub fn spawn_timer_task(
    name: &'static str,
    task: TimerTaskConfig,
    body: Box<dyn FnOnce() + Send>,
) -> io::Result<JoinHandle<()>> {
    task_pin::spawn_on_core(Core::App, task.priority, task.stack_kb as usize, name, body)
}

impl PeriodicTimer {
    /// Arm a timer that calls `on_expiry` every `period`.
    ///
    /// `name` must be null-terminated (e.g. `"ledclock-tick\0"`), as for
    /// [`task_pin::spawn_on_core`].
    pub fn start(
        name: &'static str,
        period: Duration,
        task: TimerTaskConfig,
        on_expiry: impl FnMut() + Send + 'static,
    ) -> io::Result<Self> {
        Self::start_with(spawn_timer_task, name, period, task, on_expiry)
    }

    /// Like [`start`](Self::start), with the task created by `spawn`.
    pub fn start_with(
        spawn: TaskSpawner,
        name: &'static str,
        period: Duration,
        task: TimerTaskConfig,
        mut on_expiry: impl FnMut() + Send + 'static,
    ) -> io::Result<Self> {
        let token = CancelToken::new();
        let worker_token = token.clone();

        let worker = spawn(
            name,
            task,
            Box::new(move || {
                let mut deadline = Instant::now() + period;
                loop {
                    if worker_token.wait_until(deadline) {
                        break;
                    }
                    on_expiry();
                    // Rearm decision point.
                    if worker_token.is_cancelled() {
                        break;
                    }
                    deadline = Instant::now() + period;
                }
            }),
        )?;

        let name = name.trim_end_matches('\0');
        info!("hw_timer: '{}' armed every {}us", name, period.as_micros());
        Ok(Self {
            name,
            token,
            worker: Some(worker),
        })
    }

    /// Cancel the pending rearm and wait for an in-flight expiry to finish.
    ///
    /// After this returns the callback never runs again. Safe to call more
    /// than once. Called from inside the callback it only cancels, since
    /// the task cannot wait for itself.
    pub fn stop(&mut self) {
        self.token.cancel();
        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.thread().id() == std::thread::current().id() {
            return;
        }
        if worker.join().is_err() {
            error!("hw_timer: '{}' expiry callback panicked", self.name);
        }
        info!("hw_timer: '{}' stopped", self.name);
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Drop for PeriodicTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
