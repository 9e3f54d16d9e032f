//! Host adapter: implements [`HostPort`] for the ESP32 runtime.
//!
//! | Stage            | Acquire                              | Release                       |
//! |------------------|--------------------------------------|-------------------------------|
//! | `AllocateId`     | take a `DeviceId` from the registry  | hand it back                  |
//! | `RegisterDevice` | `uart_driver_install` (console UART) | `uart_driver_delete`          |
//! | `CreateNode`     | `esp_vfs_dev_uart_use_driver`        | `esp_vfs_dev_uart_use_nonblocking` |
//! | `RequestPin`     | check the LED GPIO number            | forget it                     |
//!
//! The LED pin itself belongs to the `PinDriver` inside the arbiter; this
//! adapter never configures or resets it. On simulation targets the UART
//! calls only log, so the full registration runs on the host.

use log::{error, info};

use super::device_id::{self, DEVICE_IDS, DeviceId, IdRegistry};
use crate::app::ports::{HostPort, Stage};
use crate::config::LedClockConfig;
use crate::drivers::hw_init;

/// Resources claimed so far. Each field is set by its `acquire` stage and
/// taken back by the matching `release`.
#[derive(Debug)]
pub struct HostAdapter {
    ids: &'static IdRegistry,
    device_id: Option<DeviceId>,
    console_uart: Option<i32>,
    node_bound: bool,
    led_gpio: Option<i32>,
}

impl Default for HostAdapter {
    fn default() -> Self {
        Self::with_registry(&DEVICE_IDS)
    }
}

impl HostAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate identifiers from `ids` instead of the firmware registry.
    pub fn with_registry(ids: &'static IdRegistry) -> Self {
        Self {
            ids,
            device_id: None,
            console_uart: None,
            node_bound: false,
            led_gpio: None,
        }
    }

    /// Identifier allocated by the first stage, if it is still held.
    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }
}

impl HostPort for HostAdapter {
    fn acquire(&mut self, stage: Stage, config: &LedClockConfig) -> Result<(), i32> {
        match stage {
            Stage::AllocateId => {
                self.device_id = Some(self.ids.allocate(&device_id::board_mac())?);
            }
            Stage::RegisterDevice => {
                hw_init::init_console_uart(config.console_uart).map_err(|e| {
                    error!("host: {}", e);
                    e.code()
                })?;
                self.console_uart = Some(config.console_uart);
                info!("host: registered as {}", config.device_name);
            }
            Stage::CreateNode => {
                hw_init::bind_console_vfs(config.console_uart);
                self.node_bound = true;
                info!("host: node {} created", config.node_name);
            }
            Stage::RequestPin => {
                hw_init::check_led_gpio(config.led_gpio).map_err(|e| {
                    error!("host: {}", e);
                    e.code()
                })?;
                self.led_gpio = Some(config.led_gpio);
            }
        }
        Ok(())
    }

    fn release(&mut self, stage: Stage) {
        match stage {
            Stage::AllocateId => {
                if let Some(id) = self.device_id.take() {
                    self.ids.release(id);
                }
            }
            Stage::RegisterDevice => {
                if let Some(uart) = self.console_uart.take() {
                    hw_init::release_console_uart(uart);
                }
            }
            Stage::CreateNode => {
                if !core::mem::take(&mut self.node_bound) {
                    return;
                }
                if let Some(uart) = self.console_uart {
                    hw_init::unbind_console_vfs(uart);
                }
            }
            Stage::RequestPin => {
                if let Some(pin) = self.led_gpio.take() {
                    info!("host: GPIO {} returned", pin);
                }
            }
        }
    }
}
