//! Control channel against a live toggler and against manual ticks.

use std::sync::Arc;
use std::time::Duration;

use ledclock::Error;
use ledclock::app::arbiter::ModeArbiter;
use ledclock::app::control::ControlChannel;
use ledclock::app::toggler::{PeriodicToggler, Toggler};
use ledclock::config::TimerTaskConfig;
use ledclock::drivers::led::SimLed;

use super::mock_hw::{FlakyPin, TracePin, Writer, wait_for};

fn manual() -> (SimLed, Arc<ModeArbiter<SimLed>>, ControlChannel<SimLed>) {
    let probe = SimLed::new();
    let arbiter = Arc::new(ModeArbiter::new(probe.clone()));
    let channel = ControlChannel::new(Arc::clone(&arbiter));
    (probe, arbiter, channel)
}

#[test]
fn ticks_from_zero_read_false_true_false() {
    let (_, arbiter, channel) = manual();
    let mut toggler = Toggler::new();
    let mut seen = Vec::new();
    for _ in 0..3 {
        toggler.on_expiry(&arbiter);
        seen.push(channel.query().unwrap());
    }
    assert_eq!(seen, [false, true, false]);
}

#[test]
fn force_holds_until_next_tick() {
    let (probe, arbiter, channel) = manual();
    let mut toggler = Toggler::new();
    toggler.on_expiry(&arbiter);
    toggler.on_expiry(&arbiter);
    assert!(probe.level());

    channel.force(false).unwrap();
    assert_eq!(channel.query(), Ok(false));

    // Counter is 2, so the next tick writes false, then true.
    toggler.on_expiry(&arbiter);
    assert_eq!(channel.query(), Ok(false));
    toggler.on_expiry(&arbiter);
    assert_eq!(channel.query(), Ok(true));
}

#[test]
fn device_session_over_manual_ticks() {
    let (_, arbiter, channel) = manual();
    let mut session = channel.open();
    let mut byte = [0xFF];

    session.write(b"1");
    assert_eq!(session.read(&mut byte), Ok(1));
    assert_eq!(byte, [0x01]);

    let report = session.write(b"7");
    assert_eq!(report.consumed, 1);
    assert_eq!(report.result, Err(Error::InvalidCommand(Some(b'7'))));
    session.read(&mut byte).unwrap();
    assert_eq!(byte, [0x01]);

    Toggler::new().on_expiry(&arbiter);
    session.read(&mut byte).unwrap();
    assert_eq!(byte, [0x00]);
}

#[test]
fn live_tick_overrides_forced_level() {
    let pin = TracePin::new();
    let arbiter = Arc::new(ModeArbiter::new(pin.clone()));
    let channel = ControlChannel::new(Arc::clone(&arbiter));
    let mut toggler = PeriodicToggler::start(
        arbiter,
        Duration::from_millis(50),
        TimerTaskConfig::default(),
    )
    .expect("start");

    // Right after a tick, force the level that tick wrote: the next tick
    // writes the opposite parity.
    assert!(wait_for(Duration::from_secs(2), || pin.ticks() >= 1));
    let forced = channel.query().unwrap();
    channel.force(forced).unwrap();
    assert!(wait_for(Duration::from_secs(2), || {
        let trace = pin.trace();
        trace
            .iter()
            .rposition(|(w, _)| *w == Writer::Caller)
            .is_some_and(|at| trace[at + 1..].iter().any(|(w, _)| *w == Writer::Tick))
    }));
    toggler.stop();

    let trace = pin.trace();
    let at = trace
        .iter()
        .rposition(|(w, _)| *w == Writer::Caller)
        .expect("forced write traced");
    assert_eq!(trace[at], (Writer::Caller, forced));

    let ordinal = trace[..at].iter().filter(|(w, _)| *w == Writer::Tick).count();
    let (writer, next) = trace[at + 1];
    assert_eq!(writer, Writer::Tick);
    assert_eq!(next, ordinal % 2 == 1, "tick writes its own parity");
    assert_ne!(next, forced, "tick replaces the forced level");
    assert_eq!(channel.query(), Ok(trace.last().map_or(false, |(_, l)| *l)));
}

#[test]
fn failed_writes_do_not_stop_the_toggler() {
    let pin = FlakyPin::new();
    let arbiter = Arc::new(ModeArbiter::new(pin.clone()));
    let mut toggler = PeriodicToggler::start(
        Arc::clone(&arbiter),
        Duration::from_millis(5),
        TimerTaskConfig::default(),
    )
    .expect("start");

    pin.set_failing(true);
    std::thread::sleep(Duration::from_millis(30));
    assert!(toggler.is_running());

    let before = pin.line.writes();
    pin.set_failing(false);
    assert!(wait_for(Duration::from_secs(2), || pin.line.writes() > before + 2));
    toggler.stop();
    assert!(!toggler.is_running());
}

#[test]
fn channel_reports_pin_errors() {
    let pin = FlakyPin::new();
    let channel = ControlChannel::new(Arc::new(ModeArbiter::new(pin.clone())));
    pin.set_failing(true);
    assert_eq!(
        channel.force(true),
        Err(Error::PinAccess(ledclock::PinError::WriteFailed))
    );
    assert_eq!(channel.query(), Ok(false));
}
