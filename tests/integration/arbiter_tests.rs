//! The arbiter serializes concurrent access to the pin.

use std::sync::Arc;
use std::thread;

use ledclock::PinError;
use ledclock::app::arbiter::ModeArbiter;
use ledclock::app::ports::PinPort;

/// A pin whose level lives in two fields written one after the other.
/// An unserialized reader can observe them disagreeing.
#[derive(Default)]
struct SplitPin {
    first: bool,
    second: bool,
}

impl PinPort for SplitPin {
    fn set(&mut self, high: bool) -> Result<(), PinError> {
        self.first = high;
        thread::yield_now();
        self.second = high;
        Ok(())
    }

    fn get(&mut self) -> Result<bool, PinError> {
        if self.first == self.second {
            Ok(self.first)
        } else {
            Err(PinError::ReadFailed)
        }
    }
}

#[test]
fn readers_never_observe_a_partial_write() {
    let arbiter = Arc::new(ModeArbiter::new(SplitPin::default()));

    let writers: Vec<_> = (0..2)
        .map(|w| {
            let arbiter = Arc::clone(&arbiter);
            thread::spawn(move || {
                for i in 0..2_000u32 {
                    arbiter.write((i + w) % 2 == 1).unwrap();
                }
            })
        })
        .collect();
    let readers: Vec<_> = (0..2)
        .map(|_| {
            let arbiter = Arc::clone(&arbiter);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    assert!(arbiter.read().is_ok(), "torn read");
                }
            })
        })
        .collect();

    for t in writers.into_iter().chain(readers) {
        t.join().unwrap();
    }
}

#[test]
fn last_completed_write_wins() {
    let arbiter = Arc::new(ModeArbiter::new(SplitPin::default()));
    let a = Arc::clone(&arbiter);
    thread::spawn(move || a.write(true).unwrap()).join().unwrap();
    assert_eq!(arbiter.read(), Ok(true));
    arbiter.write(false).unwrap();
    assert_eq!(arbiter.read(), Ok(false));
}
