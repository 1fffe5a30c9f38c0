//! Board bring-up and the TF-M non-secure interface.

use crate::status::{CyResult, OsStatus};

/// Board support package and secure interface bring-up.
pub trait Board {
    /// Initialize the device and board peripherals (clocks, pins, debug UART, IPC).
    fn init(&mut self) -> Result<(), CyResult>;

    /// Unmask interrupts globally.
    fn enable_interrupts(&mut self);

    /// Initialize the TF-M non-secure interface. Every later call into the secure side depends on it.
    fn init_secure_interface(&mut self) -> Result<(), OsStatus>;
}
