//! Startup and shutdown of the full clock against the mock host.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use ledclock::app::ports::Stage;
use ledclock::app::service::LedClock;
use ledclock::config::{LedClockConfig, TimerTaskConfig};
use ledclock::drivers::led::SimLed;
use ledclock::{ConfigError, Error, RegistrationError};

use super::mock_hw::{HostCall, MockHost, wait_for};

#[test]
fn init_acquires_every_stage_in_order() {
    let host = MockHost::new();
    let clock = LedClock::init(host.clone(), SimLed::new(), &LedClockConfig::default())
        .expect("init");
    assert!(clock.is_running());

    let acquired: Vec<_> = Stage::ACQUIRE_ORDER.iter().copied().map(HostCall::Acquire).collect();
    assert_eq!(host.calls(), acquired);
    clock.shutdown();
}

#[test]
fn failure_at_each_stage_unwinds_in_reverse() {
    for (k, &failing) in Stage::ACQUIRE_ORDER.iter().enumerate() {
        let host = MockHost::failing_at(failing, -16);
        let led = SimLed::new();
        let Err(err) = LedClock::init(host.clone(), led.clone(), &LedClockConfig::default()) else {
            panic!("init must fail at {failing}");
        };

        assert_eq!(
            err,
            Error::Registration(RegistrationError::Stage {
                stage: failing,
                code: -16,
            })
        );
        let expected: Vec<Stage> = Stage::ACQUIRE_ORDER[..k].iter().rev().copied().collect();
        assert_eq!(host.released(), expected, "failing at {failing}");
        assert_eq!(led.writes(), 0, "pin must not be touched when registration fails");
    }
}

fn no_task_slots(
    _: &'static str,
    _: TimerTaskConfig,
    _: Box<dyn FnOnce() + Send>,
) -> io::Result<JoinHandle<()>> {
    Err(io::Error::other("no task slots"))
}

#[test]
fn timer_spawn_failure_unwinds_every_stage() {
    let host = MockHost::new();
    let Err(err) = LedClock::init_with(
        no_task_slots,
        host.clone(),
        SimLed::new(),
        &LedClockConfig::default(),
    ) else {
        panic!("init must fail when the timer task cannot be spawned");
    };

    assert_eq!(err, Error::Registration(RegistrationError::TimerSpawn));
    let expected: Vec<Stage> = Stage::ACQUIRE_ORDER.iter().rev().copied().collect();
    assert_eq!(host.released(), expected);
}

#[test]
fn invalid_config_touches_nothing() {
    let host = MockHost::new();
    let config = LedClockConfig {
        led_gpio: 99,
        ..LedClockConfig::default()
    };
    let Err(err) = LedClock::init(host.clone(), SimLed::new(), &config) else {
        panic!("init must reject GPIO 99");
    };
    assert!(matches!(err, Error::Config(ConfigError::ValidationFailed(_))));
    assert!(host.calls().is_empty());
}

#[test]
fn shutdown_releases_every_stage_in_reverse() {
    let host = MockHost::new();
    let clock = LedClock::init(host.clone(), SimLed::new(), &LedClockConfig::default())
        .expect("init");
    clock.shutdown();

    let expected: Vec<Stage> = Stage::ACQUIRE_ORDER.iter().rev().copied().collect();
    assert_eq!(host.released(), expected);
}

#[test]
fn drop_behaves_like_shutdown() {
    let host = MockHost::new();
    let clock = LedClock::init(host.clone(), SimLed::new(), &LedClockConfig::default())
        .expect("init");
    drop(clock);
    assert_eq!(host.released().len(), Stage::ACQUIRE_ORDER.len());
}

#[test]
fn pin_starts_low_and_toggles() {
    let led = SimLed::new();
    let clock = LedClock::init(MockHost::new(), led.clone(), &LedClockConfig::default())
        .expect("init");
    assert!(wait_for(Duration::from_secs(2), || led.writes() >= 5));
    clock.shutdown();
}

#[test]
fn no_writes_after_shutdown() {
    let led = SimLed::new();
    let clock = LedClock::init(MockHost::new(), led.clone(), &LedClockConfig::default())
        .expect("init");
    let channel = clock.channel();
    assert!(wait_for(Duration::from_secs(2), || led.writes() >= 3));

    clock.shutdown();
    let writes = led.writes();
    let level = channel.query().expect("query after shutdown");
    thread::sleep(Duration::from_millis(50));

    assert_eq!(led.writes(), writes);
    assert_eq!(channel.query(), Ok(level));
}
