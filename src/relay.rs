//! Forwarding of Secure Request Framework requests from the CM55 to TF-M.
//!
//! The CM55 has no direct path to the secure side. It posts requests over IPC and this core receives each one and
//! hands it to TF-M. Requests are handled strictly one at a time; there is no queue on this side.

use core::convert::Infallible;

use crate::error::{Error, Result};
use crate::status::CyResult;

/// How long to wait for the next request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Timeout {
    /// Block until a request arrives.
    #[default]
    Never,
    /// Give up after this many microseconds.
    Micros(u32),
}

impl Timeout {
    /// `MTB_IPC_NEVER_TIMEOUT`
    pub const NEVER_RAW: u32 = 0xFFFF_FFFF;

    /// Encoding expected by the IPC relay. A finite timeout is capped just below the "never" value.
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::Never => Self::NEVER_RAW,
            Self::Micros(us) if us == Self::NEVER_RAW => Self::NEVER_RAW - 1,
            Self::Micros(us) => us,
        }
    }
}

/// IPC endpoint of the request relay.
pub trait RequestRelay {
    /// Wait for the next request from the companion core.
    fn receive_request(&mut self, timeout: Timeout) -> core::result::Result<(), CyResult>;

    /// Forward the request received last to the secure side and post the reply.
    fn process_pending_request(&mut self) -> core::result::Result<(), CyResult>;
}

impl<R: RequestRelay + ?Sized> RequestRelay for &mut R {
    fn receive_request(&mut self, timeout: Timeout) -> core::result::Result<(), CyResult> {
        (**self).receive_request(timeout)
    }

    fn process_pending_request(&mut self) -> core::result::Result<(), CyResult> {
        (**self).process_pending_request()
    }
}

/// Drives a [`RequestRelay`]: receive, then process, one request at a time.
pub struct Relay<R: RequestRelay> {
    inner: R,
    timeout: Timeout,
    served: u32,
}

impl<R: RequestRelay> Relay<R> {
    /// Create a relay driver.
    pub fn new(inner: R, timeout: Timeout) -> Self {
        Self {
            inner,
            timeout,
            served: 0,
        }
    }

    /// Number of requests forwarded so far.
    pub fn served(&self) -> u32 {
        self.served
    }

    /// Release the relay endpoint.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Receive and forward a single request.
    pub fn serve_one(&mut self) -> Result<()> {
        self.inner.receive_request(self.timeout).map_err(Error::RelayReceive)?;
        self.inner.process_pending_request().map_err(Error::RelayProcess)?;
        self.served = self.served.wrapping_add(1);
        trace!("relayed request {}", self.served);
        Ok(())
    }

    /// Forward requests until one fails.
    pub fn run(&mut self) -> Result<Infallible> {
        info!("relaying CM55 requests to TF-M");
        loop {
            self.serve_one()?;
        }
    }
}
