#![no_std]

use core::marker::{PhantomData, PhantomPinned};
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_io::ErrorKind;
use pse84_attest::board::Board;
use pse84_attest::console::platform_log_result;
use pse84_attest::cm55::{BootAddress, SecondaryCore};
use pse84_attest::psa::{Crypto, InitialAttestation};
use pse84_attest::relay::{RequestRelay, Timeout};
use pse84_attest::status::{CyResult, OsStatus, PsaStatus};
use pse84_attest::{Platform, TokenBuffer};

/// `mtb_srf_context_t` configured by the BSP for the CM55 relay. Only ever handled by pointer.
#[repr(C)]
pub struct MtbSrfRelayContext {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// `MXCM55_Type` register block. Only ever handled by pointer.
#[repr(C)]
pub struct MxCm55 {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// `MXCM55_BASE` from the PSE84 device header.
const MXCM55: *mut MxCm55 = 0x4408_0000 as *mut MxCm55;

extern "C" {
    fn cybsp_init() -> u32;
    fn tfm_ns_interface_init() -> u32;

    fn psa_crypto_init() -> i32;
    fn psa_generate_random(output: *mut u8, output_size: usize) -> i32;
    fn psa_initial_attest_get_token_size(challenge_size: usize, token_size: *mut usize) -> i32;
    fn psa_initial_attest_get_token(
        auth_challenge: *const u8,
        challenge_size: usize,
        token_buf: *mut u8,
        token_buf_size: usize,
        token_size: *mut usize,
    ) -> i32;

    fn ifx_platform_log_msg(msg: *const u8, msg_size: u32) -> i32;

    #[allow(non_snake_case)]
    fn Cy_SysEnableCM55(base: *mut MxCm55, vector_table_offset: u32, wait_us: u32);

    fn mtb_srf_ipc_receive_request(relay_context: *mut MtbSrfRelayContext, timeout_us: u32) -> u32;
    fn mtb_srf_ipc_process_pending_request(relay_context: *mut MtbSrfRelayContext) -> u32;

    #[allow(non_upper_case_globals)]
    static mut cybsp_mtb_srf_relay_context: MtbSrfRelayContext;
}

/// Token buffer in memory shared with the secure side.
#[link_section = ".cy_sharedmem"]
static mut ATTESTATION_TOKEN: TokenBuffer = TokenBuffer::new();

static TAKEN: AtomicBool = AtomicBool::new(false);

/// The PSE84 EVK as seen from the non-secure CM33.
pub struct Pse84 {
    _private: (),
}

impl Pse84 {
    /// Take the board and the shared token buffer. Returns `None` on every call after the first.
    pub fn take() -> Option<(Self, &'static mut TokenBuffer)> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            return None;
        }
        // SAFETY: guarded by TAKEN, so this is the only reference ever handed out.
        let token = unsafe { &mut *core::ptr::addr_of_mut!(ATTESTATION_TOKEN) };
        // .cy_sharedmem is NOLOAD, so nothing has initialized it yet.
        *token = TokenBuffer::new();
        Some((Self { _private: () }, token))
    }
}

impl Board for Pse84 {
    fn init(&mut self) -> Result<(), CyResult> {
        // SAFETY: called once, before any other BSP function.
        CyResult(unsafe { cybsp_init() }).check()
    }

    fn enable_interrupts(&mut self) {
        // SAFETY: the BSP has installed all handlers during init.
        unsafe { cortex_m::interrupt::enable() };
    }

    fn init_secure_interface(&mut self) -> Result<(), OsStatus> {
        // SAFETY: no arguments; TF-M owns the state behind it.
        OsStatus(unsafe { tfm_ns_interface_init() }).check()
    }
}

impl Crypto for Pse84 {
    fn init(&mut self) -> Result<(), PsaStatus> {
        // SAFETY: no arguments.
        PsaStatus(unsafe { psa_crypto_init() }).check()
    }

    fn generate_random(&mut self, out: &mut [u8]) -> Result<(), PsaStatus> {
        // SAFETY: `out` is valid for writes of `out.len()` bytes.
        PsaStatus(unsafe { psa_generate_random(out.as_mut_ptr(), out.len()) }).check()
    }
}

impl InitialAttestation for Pse84 {
    fn token_size(&mut self, challenge_len: usize) -> Result<usize, PsaStatus> {
        let mut size = 0;
        // SAFETY: `size` is a valid out pointer for the duration of the call.
        PsaStatus(unsafe { psa_initial_attest_get_token_size(challenge_len, &mut size) }).check()?;
        Ok(size)
    }

    fn get_token(&mut self, challenge: &[u8], out: &mut [u8]) -> Result<usize, PsaStatus> {
        let mut size = 0;
        // SAFETY: both slices are valid for their lengths and `size` is a valid out pointer.
        PsaStatus(unsafe {
            psa_initial_attest_get_token(challenge.as_ptr(), challenge.len(), out.as_mut_ptr(), out.len(), &mut size)
        })
        .check()?;
        Ok(size)
    }
}

impl SecondaryCore for Pse84 {
    fn enable(&mut self, boot_addr: BootAddress, wait_us: u32) {
        // SAFETY: MXCM55 is the CM55 control block of this device and the address was checked for alignment.
        unsafe { Cy_SysEnableCM55(MXCM55, boot_addr.addr(), wait_us) };
    }
}

impl RequestRelay for Pse84 {
    fn receive_request(&mut self, timeout: Timeout) -> Result<(), CyResult> {
        // SAFETY: the relay context is initialized by the BSP and only touched from this thread.
        CyResult(unsafe {
            mtb_srf_ipc_receive_request(core::ptr::addr_of_mut!(cybsp_mtb_srf_relay_context), timeout.as_raw())
        })
        .check()
    }

    fn process_pending_request(&mut self) -> Result<(), CyResult> {
        // SAFETY: as above.
        CyResult(unsafe { mtb_srf_ipc_process_pending_request(core::ptr::addr_of_mut!(cybsp_mtb_srf_relay_context)) })
            .check()
    }
}

impl Platform for Pse84 {
    type Console = PlatformLog;

    fn console_writer(&mut self) -> PlatformLog {
        PlatformLog { _private: () }
    }
}

/// Console output routed through the TF-M platform log service to the debug UART.
pub struct PlatformLog {
    _private: (),
}

impl embedded_io::ErrorType for PlatformLog {
    type Error = ErrorKind;
}

impl embedded_io::Write for PlatformLog {
    fn write(&mut self, buf: &[u8]) -> Result<usize, ErrorKind> {
        let len = u32::try_from(buf.len()).map_err(|_| ErrorKind::InvalidInput)?;
        // SAFETY: `buf` is valid for reads of `len` bytes.
        let ret = unsafe { ifx_platform_log_msg(buf.as_ptr(), len) };
        platform_log_result(ret, buf.len()).inspect_err(|_| {
            defmt::warn!("platform log failed: {}", PsaStatus(ret));
        })
    }

    fn flush(&mut self) -> Result<(), ErrorKind> {
        Ok(())
    }
}
