//! LED clock firmware: main entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HostAdapter (UART · VFS · GPIO)   ConsoleAdapter (stdio) │
//! │  ──────────────── Port Trait Boundary ─────────────────  │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │  LedClock: Registration · ModeArbiter · Toggler    │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │  HalLed (config GPIO)      PeriodicTimer (APP core task)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver};
use log::{info, warn};

use ledclock::adapters::console::ConsoleAdapter;
use ledclock::adapters::host::HostAdapter;
use ledclock::app::service::LedClock;
use ledclock::config::LedClockConfig;
use ledclock::drivers::led::HalLed;

fn load_config() -> LedClockConfig {
    match option_env!("LEDCLOCK_CONFIG_JSON") {
        Some(json) => match LedClockConfig::from_json(json) {
            Ok(cfg) => {
                info!("config: build-time override applied");
                cfg
            }
            Err(e) => {
                warn!("config: override rejected ({}), using defaults", e);
                LedClockConfig::default()
            }
        },
        None => LedClockConfig::default(),
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("ledclock v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    config.validate().map_err(ledclock::Error::from)?;

    // ── 3. LED pin ────────────────────────────────────────────
    // SAFETY: the configured GPIO is validated above and nothing else in
    // the firmware creates a driver for it; the `PinDriver` is its only
    // owner and resets it when the arbiter drops.
    let pin = unsafe { AnyIOPin::new(config.led_gpio) };
    let led = HalLed::new(PinDriver::input_output(pin)?);

    // ── 4. Start the clock ────────────────────────────────────
    let clock = LedClock::init(HostAdapter::new(), led, &config)?;

    // ── 5. Serve the console until stdin closes ───────────────
    let mut console = ConsoleAdapter::new(&clock.channel());
    if let Err(e) = console.run(std::io::stdin().lock(), std::io::stdout()) {
        warn!("console: {}", e);
    }
    drop(console);

    clock.shutdown();
    Ok(())
}
