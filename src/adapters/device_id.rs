//! Device identifier allocation.
//!
//! The `AllocateId` registration stage takes a [`DeviceId`] out of an
//! [`IdRegistry`] and the matching release hands it back. An identifier is
//! the board prefix (last three bytes of the factory MAC) plus a minor
//! number from a small fixed pool, e.g. `LC-4C4310.0`.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

use log::{info, warn};

/// Number of minors one registry can hand out.
pub const MINOR_COUNT: u8 = 8;

/// `ESP_ERR_NO_MEM`, returned when every minor is taken.
pub const ERR_NO_FREE_MINOR: i32 = 0x101;

/// Factory MAC address from eFuse.
#[cfg(target_os = "espidf")]
pub fn board_mac() -> [u8; 6] {
    let mut mac = [0u8; 6];
    // SAFETY: writes exactly six bytes into `mac`.
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: a fixed, locally administered address.
#[cfg(not(target_os = "espidf"))]
pub fn board_mac() -> [u8; 6] {
    [0x02, 0x00, 0x00, 0x4C, 0x43, 0x10]
}

/// An allocated identifier. Not `Clone`: the holder gives it back exactly
/// once through [`IdRegistry::release`].
#[derive(Debug, PartialEq, Eq)]
pub struct DeviceId {
    board: [u8; 3],
    minor: u8,
}

impl DeviceId {
    pub fn minor(&self) -> u8 {
        self.minor
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.board;
        write!(f, "LC-{a:02X}{b:02X}{c:02X}.{}", self.minor)
    }
}

/// Pool of minor numbers, one bit per minor.
#[derive(Debug, Default)]
pub struct IdRegistry {
    in_use: AtomicU8,
}

/// Registry used by the firmware's host adapter.
pub static DEVICE_IDS: IdRegistry = IdRegistry::new();

impl IdRegistry {
    pub const fn new() -> Self {
        Self {
            in_use: AtomicU8::new(0),
        }
    }

    /// Claim the lowest free minor for the board with factory `mac`.
    pub fn allocate(&self, mac: &[u8; 6]) -> Result<DeviceId, i32> {
        let mut current = self.in_use.load(Ordering::Acquire);
        loop {
            let free = !current;
            if free == 0 {
                warn!("device_id: all {} minors in use", MINOR_COUNT);
                return Err(ERR_NO_FREE_MINOR);
            }
            let minor = free.trailing_zeros() as u8;
            match self.in_use.compare_exchange_weak(
                current,
                current | (1 << minor),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let id = DeviceId {
                        board: [mac[3], mac[4], mac[5]],
                        minor,
                    };
                    info!("device_id: allocated {}", id);
                    return Ok(id);
                }
                Err(seen) => current = seen,
            }
        }
    }

    /// Return `id`'s minor to the pool.
    pub fn release(&self, id: DeviceId) {
        self.in_use.fetch_and(!(1 << id.minor), Ordering::AcqRel);
        info!("device_id: released {}", id);
    }

    /// Whether `minor` is currently held.
    pub fn is_allocated(&self, minor: u8) -> bool {
        minor < MINOR_COUNT && self.in_use.load(Ordering::Acquire) & (1 << minor) != 0
    }

    pub fn allocated(&self) -> u32 {
        self.in_use.load(Ordering::Acquire).count_ones()
    }
}
