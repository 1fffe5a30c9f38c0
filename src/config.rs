//! Application configuration.

use crate::cm55::{BOOT_WAIT_TIME_USEC, BootAddress};
use crate::psa::ChallengeSize;
use crate::relay::Timeout;

/// Title shown in the console banner.
pub const BANNER: &str = "PSOC Edge MCU: Trusted Firmware-M (TF-M) Initial Attestation Application";

/// Application configuration
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// CM55 vector table address
    pub boot_address: BootAddress,
    /// Time to wait for the CM55 to start, in microseconds
    pub boot_wait_us: u32,
    /// Banner title
    pub banner: &'static str,
    /// Size of the attestation challenge
    pub challenge: ChallengeSize,
    /// Wait limit for each relayed request
    pub relay_timeout: Timeout,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            boot_address: BootAddress::default_image(),
            boot_wait_us: BOOT_WAIT_TIME_USEC,
            banner: BANNER,
            challenge: ChallengeSize::Bytes32,
            relay_timeout: Timeout::Never,
        }
    }
}
