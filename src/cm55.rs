//! Cortex-M55 companion core release.

use crate::error::{Error, Result};

/// Start of the CM55 application image in non-volatile memory, as laid out by the board's memory map.
pub const M55_NVM_START: u32 = 0x6058_0000;

/// Size of the MCUboot header prepended to every application image.
pub const MCUBOOT_HEADER_SIZE: u32 = 0x400;

/// Default time in microseconds to wait for the CM55 to come out of reset.
pub const BOOT_WAIT_TIME_USEC: u32 = 10;

/// Minimum alignment of a Cortex-M vector table.
pub const VECTOR_TABLE_ALIGN: u32 = 128;

/// Address of the CM55 vector table, checked for vector table alignment.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootAddress(u32);

impl BootAddress {
    /// Validate `addr` as a vector table address.
    pub const fn new(addr: u32) -> Result<Self> {
        if addr % VECTOR_TABLE_ALIGN != 0 {
            return Err(Error::MisalignedBootAddress(addr));
        }
        Ok(Self(addr))
    }

    /// The application image right after its MCUboot header in CM55 NVM.
    pub const fn default_image() -> Self {
        Self(M55_NVM_START + MCUBOOT_HEADER_SIZE)
    }

    /// Raw address.
    pub const fn addr(self) -> u32 {
        self.0
    }
}

impl Default for BootAddress {
    fn default() -> Self {
        Self::default_image()
    }
}

/// Control over the companion core.
pub trait SecondaryCore {
    /// Point the CM55 at `boot_addr`, release it from reset and wait `wait_us` microseconds for it to start.
    fn enable(&mut self, boot_addr: BootAddress, wait_us: u32);
}
