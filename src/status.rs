//! Result codes returned by the vendor platform libraries and TF-M.

use core::fmt;

/// Severity field of a [`CyResult`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResultKind {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Fatal error
    Fatal,
}

const CODE_MASK: u32 = 0xFFFF;
const KIND_POSITION: u32 = 16;
const KIND_MASK: u32 = 0x3;
const MODULE_POSITION: u32 = 18;
const MODULE_MASK: u32 = 0x3FFF;

/// A `cy_rslt_t` as returned by the board support package, PDL and the SRF relay.
///
/// The value packs three fields: a 16-bit code, a 2-bit severity and a 14-bit module identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CyResult(pub u32);

impl CyResult {
    /// `CY_RSLT_SUCCESS`
    pub const SUCCESS: Self = Self(0);

    /// Build a result from its fields. Values wider than their field are masked.
    pub const fn new(kind: ResultKind, module: u16, code: u16) -> Self {
        let kind = match kind {
            ResultKind::Info => 0,
            ResultKind::Warning => 1,
            ResultKind::Error => 2,
            ResultKind::Fatal => 3,
        };
        Self(((module as u32 & MODULE_MASK) << MODULE_POSITION) | (kind << KIND_POSITION) | (code as u32 & CODE_MASK))
    }

    /// Whether this is `CY_RSLT_SUCCESS`.
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Module-specific code.
    pub const fn code(self) -> u16 {
        (self.0 & CODE_MASK) as u16
    }

    /// Severity.
    pub const fn kind(self) -> ResultKind {
        match (self.0 >> KIND_POSITION) & KIND_MASK {
            0 => ResultKind::Info,
            1 => ResultKind::Warning,
            2 => ResultKind::Error,
            _ => ResultKind::Fatal,
        }
    }

    /// Identifier of the module that produced the result.
    pub const fn module(self) -> u16 {
        ((self.0 >> MODULE_POSITION) & MODULE_MASK) as u16
    }

    /// `Ok(())` on success, the result itself otherwise.
    pub fn check(self) -> Result<(), Self> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for CyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#010x} (module {:#x}, {:?}, code {:#x})",
            self.0,
            self.module(),
            self.kind(),
            self.code()
        )
    }
}

/// A `psa_status_t` from the PSA crypto and attestation services.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PsaStatus(pub i32);

impl PsaStatus {
    /// `PSA_SUCCESS`
    pub const SUCCESS: Self = Self(0);
    /// `PSA_ERROR_GENERIC_ERROR`
    pub const GENERIC_ERROR: Self = Self(-132);
    /// `PSA_ERROR_NOT_PERMITTED`
    pub const NOT_PERMITTED: Self = Self(-133);
    /// `PSA_ERROR_NOT_SUPPORTED`
    pub const NOT_SUPPORTED: Self = Self(-134);
    /// `PSA_ERROR_INVALID_ARGUMENT`
    pub const INVALID_ARGUMENT: Self = Self(-135);
    /// `PSA_ERROR_BAD_STATE`
    pub const BAD_STATE: Self = Self(-137);
    /// `PSA_ERROR_BUFFER_TOO_SMALL`
    pub const BUFFER_TOO_SMALL: Self = Self(-138);
    /// `PSA_ERROR_INSUFFICIENT_MEMORY`
    pub const INSUFFICIENT_MEMORY: Self = Self(-141);
    /// `PSA_ERROR_SERVICE_FAILURE`
    pub const SERVICE_FAILURE: Self = Self(-144);
    /// `PSA_ERROR_COMMUNICATION_FAILURE`
    pub const COMMUNICATION_FAILURE: Self = Self(-145);
    /// `PSA_ERROR_INSUFFICIENT_ENTROPY`
    pub const INSUFFICIENT_ENTROPY: Self = Self(-148);

    /// Whether this is `PSA_SUCCESS`.
    pub const fn is_success(self) -> bool {
        self.0 == Self::SUCCESS.0
    }

    /// Symbolic name of the status, if it is one of the well-known codes.
    pub const fn name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "PSA_SUCCESS",
            -132 => "PSA_ERROR_GENERIC_ERROR",
            -133 => "PSA_ERROR_NOT_PERMITTED",
            -134 => "PSA_ERROR_NOT_SUPPORTED",
            -135 => "PSA_ERROR_INVALID_ARGUMENT",
            -137 => "PSA_ERROR_BAD_STATE",
            -138 => "PSA_ERROR_BUFFER_TOO_SMALL",
            -141 => "PSA_ERROR_INSUFFICIENT_MEMORY",
            -144 => "PSA_ERROR_SERVICE_FAILURE",
            -145 => "PSA_ERROR_COMMUNICATION_FAILURE",
            -148 => "PSA_ERROR_INSUFFICIENT_ENTROPY",
            _ => return None,
        })
    }

    /// `Ok(())` on success, the status itself otherwise.
    pub fn check(self) -> Result<(), Self> {
        if self.is_success() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for PsaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.0),
            None => write!(f, "psa status {}", self.0),
        }
    }
}

/// Status of the TF-M non-secure OS wrapper (`OS_WRAPPER_SUCCESS` / `OS_WRAPPER_ERROR`).
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OsStatus(pub u32);

impl OsStatus {
    /// `OS_WRAPPER_SUCCESS`
    pub const SUCCESS: Self = Self(0);
    /// `OS_WRAPPER_ERROR`
    pub const ERROR: Self = Self(0xFFFF_FFFF);

    /// `Ok(())` on success, the status itself otherwise.
    pub fn check(self) -> Result<(), Self> {
        if self == Self::SUCCESS { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for OsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os wrapper status {:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cy_result_fields() {
        // CY_RSLT_CREATE(CY_RSLT_TYPE_ERROR, 0x1AB, 0x42)
        let r = CyResult(0x06AE_0042);
        assert_eq!(r.code(), 0x42);
        assert_eq!(r.kind(), ResultKind::Error);
        assert_eq!(r.module(), 0x1AB);
        assert!(!r.is_success());
        assert_eq!(CyResult::new(ResultKind::Error, 0x1AB, 0x42), r);
    }

    #[test]
    fn test_cy_result_new_masks_module() {
        let r = CyResult::new(ResultKind::Fatal, 0xFFFF, 0x1);
        assert_eq!(r.module(), 0x3FFF);
        assert_eq!(r.kind(), ResultKind::Fatal);
        assert_eq!(r.code(), 1);
    }

    #[test]
    fn test_check() {
        assert_eq!(CyResult::SUCCESS.check(), Ok(()));
        assert_eq!(CyResult(5).check(), Err(CyResult(5)));
        assert_eq!(PsaStatus::SUCCESS.check(), Ok(()));
        assert_eq!(PsaStatus::BAD_STATE.check(), Err(PsaStatus::BAD_STATE));
        assert_eq!(OsStatus::SUCCESS.check(), Ok(()));
        assert_eq!(OsStatus::ERROR.check(), Err(OsStatus::ERROR));
    }

    #[test]
    fn test_psa_status_names() {
        assert_eq!(PsaStatus::SUCCESS.name(), Some("PSA_SUCCESS"));
        assert_eq!(PsaStatus(-138).name(), Some("PSA_ERROR_BUFFER_TOO_SMALL"));
        assert_eq!(PsaStatus(-1).name(), None);
    }
}
