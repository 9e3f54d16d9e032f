//! Fuzz target: `ControlSession::write`
//!
//! Drives arbitrary byte sequences into the device write path and asserts
//! that it never panics, always reports the whole buffer as consumed, and
//! only changes the level when the first byte is a valid command.
//!
//! cargo fuzz run fuzz_write_command

#![no_main]

use std::sync::Arc;

use ledclock::app::arbiter::ModeArbiter;
use ledclock::app::control::ControlChannel;
use ledclock::drivers::led::SimLed;
use libfuzzer_sys::fuzz_target;

// Links the std critical-section implementation the arbiter needs.
use critical_section as _;

fuzz_target!(|data: &[u8]| {
    let probe = SimLed::new();
    let channel = ControlChannel::new(Arc::new(ModeArbiter::new(probe.clone())));
    let before = probe.level();

    let report = channel.open().write(data);
    assert_eq!(report.consumed, data.len());

    match data.first() {
        Some(b'1') => assert!(probe.level()),
        Some(b'0') => assert!(!probe.level()),
        _ => {
            assert!(report.result.is_err());
            assert_eq!(probe.level(), before);
        }
    }

    let mut byte = [0xFF];
    let mut session = channel.open();
    assert_eq!(session.read(&mut byte), Ok(1));
    assert!(byte[0] <= 1);
});
