//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements / serves | Connects to                   |
//! |-------------|---------------------|-------------------------------|
//! | `host`      | HostPort            | ESP-IDF UART, VFS, GPIO       |
//! | `console`   | ControlChannel      | stdin / stdout (console UART) |
//! | `device_id` | (used by `host`)    | eFuse factory MAC             |

pub mod console;
pub mod device_id;
pub mod host;
