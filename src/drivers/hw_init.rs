//! One-shot peripheral bring-up and teardown.
//!
//! Brings up the console UART using raw ESP-IDF sys calls and checks the
//! LED GPIO number. Each `init_*` / `bind_*` has a matching `release_*` /
//! `unbind_*`; the host adapter calls them from its registration stages.
//! On simulation targets the UART calls are logged no-ops.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use log::info;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioInvalid(i32),
    UartInstallFailed(i32),
}

impl HwInitError {
    /// Host return code carried into `RegistrationError`.
    pub fn code(self) -> i32 {
        match self {
            // ESP_ERR_INVALID_ARG
            Self::GpioInvalid(_) => 0x102,
            Self::UartInstallFailed(rc) => rc,
        }
    }
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioInvalid(pin)     => write!(f, "GPIO {} is not a valid output", pin),
            Self::UartInstallFailed(rc) => write!(f, "UART driver install failed (rc={})", rc),
        }
    }
}

/// Highest GPIO number on the ESP32-S3.
const MAX_GPIO: i32 = 48;

/// Whether `pin` names an output-capable GPIO.
pub fn gpio_is_valid(pin: i32) -> bool {
    (0..=MAX_GPIO).contains(&pin)
}

// ── LED GPIO ──────────────────────────────────────────────────

/// Check that `pin` can drive the LED.
///
/// The pin itself is configured and reset by the `PinDriver` the arbiter
/// owns, so this stage only rejects numbers the board cannot use.
pub fn check_led_gpio(pin: i32) -> Result<(), HwInitError> {
    if !gpio_is_valid(pin) {
        return Err(HwInitError::GpioInvalid(pin));
    }
    info!("hw_init: GPIO {} accepted for the LED", pin);
    Ok(())
}

// ── Console UART ──────────────────────────────────────────────

/// Install the UART driver backing the control console.
#[cfg(target_os = "espidf")]
pub fn init_console_uart(uart: i32) -> Result<(), HwInitError> {
    // SAFETY: one-time install from the startup path; the driver owns the
    // UART until `release_console_uart`.
    let ret = unsafe {
        uart_driver_install(
            uart as uart_port_t,
            crate::pins::CONSOLE_RX_BUFFER,
            0,
            0,
            core::ptr::null_mut(),
            0,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::UartInstallFailed(ret));
    }
    info!("hw_init: console UART{} driver installed", uart);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_console_uart(uart: i32) -> Result<(), HwInitError> {
    info!("hw_init(sim): console UART{} driver skipped", uart);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn release_console_uart(uart: i32) {
    // SAFETY: VFS has been unbound first, so no reader is inside the driver.
    unsafe { uart_driver_delete(uart as uart_port_t) };
    info!("hw_init: console UART{} driver deleted", uart);
}

#[cfg(not(target_os = "espidf"))]
pub fn release_console_uart(uart: i32) {
    info!("hw_init(sim): console UART{} driver released", uart);
}

/// Route stdin/stdout through the installed driver (blocking reads).
#[cfg(target_os = "espidf")]
pub fn bind_console_vfs(uart: i32) {
    // SAFETY: requires the driver from `init_console_uart`, which the
    // registration order guarantees.
    unsafe { esp_vfs_dev_uart_use_driver(uart) };
    info!("hw_init: console VFS bound to UART{}", uart);
}

#[cfg(not(target_os = "espidf"))]
pub fn bind_console_vfs(uart: i32) {
    info!("hw_init(sim): console VFS bind to UART{} skipped", uart);
}

#[cfg(target_os = "espidf")]
pub fn unbind_console_vfs(uart: i32) {
    // SAFETY: switches VFS back to the ROM non-blocking path; always valid.
    unsafe { esp_vfs_dev_uart_use_nonblocking(uart) };
}

#[cfg(not(target_os = "espidf"))]
pub fn unbind_console_vfs(uart: i32) {
    info!("hw_init(sim): console VFS unbound from UART{}", uart);
}
