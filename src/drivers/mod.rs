//! LED pin driver, hardware initialisation, and the timer task.

pub mod hw_init;
pub mod hw_timer;
pub mod led;
pub mod task_pin;
