//! Crate error type.

use core::fmt;

use crate::console::ConsoleError;
use crate::status::{CyResult, OsStatus, PsaStatus};

/// Failure of one step of the attestation demo.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Device and board peripheral initialization failed.
    BoardInit(CyResult),

    /// The TF-M non-secure interface could not be initialized.
    SecureInterfaceInit(OsStatus),

    /// PSA crypto initialization failed.
    CryptoInit(PsaStatus),

    /// The PSA RNG could not produce the nonce.
    RandomGeneration(PsaStatus),

    /// The attestation service could not report the token size.
    TokenSize(PsaStatus),

    /// The token does not fit the token buffer.
    TokenTooLarge {
        /// Size reported by the attestation service.
        size: usize,
        /// Capacity of the token buffer.
        capacity: usize,
    },

    /// The attestation service refused to produce a token.
    Attestation(PsaStatus),

    /// Console output failed.
    Console(ConsoleError),

    /// The companion core boot address is not aligned to a vector table boundary.
    MisalignedBootAddress(u32),

    /// Waiting for an inter-processor request failed.
    RelayReceive(CyResult),

    /// Forwarding an inter-processor request to the secure side failed.
    RelayProcess(CyResult),
}

/// shorthand for -> `Result<T>`
pub type Result<T> = core::result::Result<T, Error>;

impl From<ConsoleError> for Error {
    fn from(value: ConsoleError) -> Self {
        Self::Console(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BoardInit(r) => write!(f, "board init failed: {}", r),
            Self::SecureInterfaceInit(s) => write!(f, "TF-M interface init failed: {}", s),
            Self::CryptoInit(s) => write!(f, "PSA crypto init failed: {}", s),
            Self::RandomGeneration(s) => write!(f, "nonce generation failed: {}", s),
            Self::TokenSize(s) => write!(f, "token size query failed: {}", s),
            Self::TokenTooLarge { size, capacity } => {
                write!(f, "token of {} bytes exceeds buffer of {} bytes", size, capacity)
            }
            Self::Attestation(s) => write!(f, "attestation token request failed: {}", s),
            Self::Console(e) => write!(f, "console output failed: {}", e),
            Self::MisalignedBootAddress(addr) => write!(f, "misaligned CM55 boot address {:#010x}", addr),
            Self::RelayReceive(r) => write!(f, "IPC receive failed: {}", r),
            Self::RelayProcess(r) => write!(f, "IPC request processing failed: {}", r),
        }
    }
}

impl core::error::Error for Error {}
