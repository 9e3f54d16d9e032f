//! Application core: clock logic, no direct I/O.
//!
//! The toggler, control channel, and arbiter that reconcile them, plus the
//! lifecycle service that wires them to the host. All interaction with
//! hardware and the host environment happens through the **port traits**
//! in [`ports`], so this layer is fully testable without real peripherals.

pub mod arbiter;
pub mod commands;
pub mod control;
pub mod ports;
pub mod registration;
pub mod service;
pub mod toggler;
