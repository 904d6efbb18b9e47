//! Configuration management
//!
//! Boot-time settings. There is no configuration source this early, so
//! everything is fixed at build time; Cargo features select the log level.

use log::LevelFilter;

use crate::utils::logger::default_level;

/// PL011 data register on the QEMU `virt` machine
pub const QEMU_VIRT_UART_BASE: usize = 0x0900_0000;

/// Line printed before anything else
pub const BANNER: &str = "BHARMOS Kernel\n";

/// Early boot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Address of the console transmit register
    pub uart_base: usize,
    /// Maximum level passed to the logger
    pub log_level: LevelFilter,
    /// First line written to the console
    pub banner: &'static str,
}

impl BootConfig {
    /// Configuration for QEMU `-M virt`
    pub const fn qemu_virt() -> Self {
        Self {
            uart_base: QEMU_VIRT_UART_BASE,
            log_level: default_level(),
            banner: BANNER,
        }
    }

    pub const fn with_uart_base(mut self, uart_base: usize) -> Self {
        self.uart_base = uart_base;
        self
    }

    pub const fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::qemu_virt()
    }
}
