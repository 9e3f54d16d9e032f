//! GPIO / peripheral assignments for the LED clock board.
//!
//! Defaults for [`LedClockConfig`](crate::config::LedClockConfig). The
//! firmware drives whatever GPIO the configuration names.

// ---------------------------------------------------------------------------
// Clock LED
// ---------------------------------------------------------------------------

/// Digital output driving the clock LED (active HIGH).
pub const LED_GPIO: i32 = 16;

// ---------------------------------------------------------------------------
// Control console
// ---------------------------------------------------------------------------

/// UART carrying the control console (USB-serial bridge on the dev board).
pub const CONSOLE_UART: i32 = 0;

/// Console UART receive ring buffer (bytes).
pub const CONSOLE_RX_BUFFER: i32 = 256;
