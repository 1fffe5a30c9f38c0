//! The attestation demo sequence.
//!
//! Board bring-up, TF-M interface, banner, nonce, token, hex dump, CM55 release and then the relay loop, in that
//! order. The first failing step ends the sequence; nothing after it runs.

use core::convert::Infallible;

use crate::board::Board;
use crate::cm55::SecondaryCore;
use crate::config::Config;
use crate::console::{Console, GENERATED, GENERATING};
use crate::error::{Error, Result};
use crate::psa::{Crypto, InitialAttestation, Nonce};
use crate::relay::{Relay, RequestRelay};
use crate::token::TokenBuffer;

/// Everything the demo needs from the device and the secure firmware.
pub trait Platform: Board + Crypto + InitialAttestation + SecondaryCore + RequestRelay {
    /// Sink for console messages.
    type Console: embedded_io::Write;

    /// Obtain the console sink. Only valid once the secure interface is up.
    fn console_writer(&mut self) -> Self::Console;
}

/// The demo application.
pub struct App<P: Platform> {
    platform: P,
    config: Config,
}

impl<P: Platform> App<P> {
    /// Create the application on top of `platform`.
    pub fn new(platform: P, config: Config) -> Self {
        Self { platform, config }
    }

    /// Release the platform.
    pub fn into_inner(self) -> P {
        self.platform
    }

    /// Initialize the board and the TF-M interface, then clear the console and print the banner.
    pub fn bring_up(&mut self) -> Result<Console<P::Console>> {
        Board::init(&mut self.platform).map_err(Error::BoardInit)?;
        self.platform.enable_interrupts();
        self.platform
            .init_secure_interface()
            .map_err(Error::SecureInterfaceInit)?;
        info!("TF-M non-secure interface up");

        let mut console = Console::new(self.platform.console_writer());
        console.banner(self.config.banner)?;
        Ok(console)
    }

    /// Draw a nonce, request a token bound to it and print the token.
    pub fn attest<'t>(
        &mut self,
        console: &mut Console<P::Console>,
        token: &'t mut TokenBuffer,
    ) -> Result<&'t [u8]> {
        Crypto::init(&mut self.platform).map_err(Error::CryptoInit)?;

        let nonce = Nonce::generate(&mut self.platform, self.config.challenge).map_err(Error::RandomGeneration)?;
        debug!("nonce of {} bytes generated", nonce.as_bytes().len());

        console.print(format_args!("{}", GENERATING))?;
        let bytes = token.request(&mut self.platform, &nonce)?;
        info!("attestation token of {} bytes received", bytes.len());

        console.print(format_args!("{}", GENERATED))?;
        console.hex_dump(bytes)?;
        Ok(bytes)
    }

    /// Start the CM55 application.
    pub fn boot_companion(&mut self) {
        info!("enabling CM55 at {:#x}", self.config.boot_address.addr());
        self.platform
            .enable(self.config.boot_address, self.config.boot_wait_us);
    }

    /// Forward CM55 requests to TF-M until one fails.
    pub fn relay(&mut self) -> Result<Infallible> {
        Relay::new(&mut self.platform, self.config.relay_timeout).run()
    }

    /// Run the whole sequence. Returns only on failure.
    pub fn run(mut self, token: &mut TokenBuffer) -> Result<Infallible> {
        let mut console = self.bring_up()?;
        self.attest(&mut console, token)?;
        self.boot_companion();
        self.relay()
    }
}

/// Stop on a fatal error.
pub fn halt(err: Error) -> ! {
    error!("fatal: {}", err);
    panic!("{}", err)
}
