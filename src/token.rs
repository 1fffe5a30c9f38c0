//! Attestation token storage.

use crate::error::{Error, Result};
use crate::psa::{InitialAttestation, Nonce};

/// Capacity of the token buffer in bytes.
pub const TOKEN_BUF_SIZE: usize = 1024;

/// Fixed-size store for one attestation token.
///
/// The secure side writes the token straight into this buffer, so on target it lives in memory shared with TF-M
/// (see the `.cy_sharedmem` section in the board crate).
pub struct TokenBuffer {
    buf: [u8; TOKEN_BUF_SIZE],
    len: usize,
}

impl TokenBuffer {
    /// An empty buffer.
    pub const fn new() -> Self {
        Self {
            buf: [0; TOKEN_BUF_SIZE],
            len: 0,
        }
    }

    /// Capacity in bytes.
    pub const fn capacity(&self) -> usize {
        TOKEN_BUF_SIZE
    }

    /// The token received so far; empty until [`TokenBuffer::request`] succeeds.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Ask the attestation service for a token bound to `nonce` and store it.
    ///
    /// The expected size is queried first, so a token that would not fit is rejected before the service writes
    /// anything.
    pub fn request<A: InitialAttestation + ?Sized>(&mut self, attest: &mut A, nonce: &Nonce) -> Result<&[u8]> {
        self.len = 0;

        let challenge = nonce.as_bytes();
        let size = attest.token_size(challenge.len()).map_err(Error::TokenSize)?;
        if size > TOKEN_BUF_SIZE {
            return Err(Error::TokenTooLarge {
                size,
                capacity: TOKEN_BUF_SIZE,
            });
        }
        debug!("expecting attestation token of {} bytes", size);

        let len = attest
            .get_token(challenge, &mut self.buf)
            .map_err(Error::Attestation)?;
        if len > TOKEN_BUF_SIZE {
            return Err(Error::TokenTooLarge {
                size: len,
                capacity: TOKEN_BUF_SIZE,
            });
        }

        self.len = len;
        Ok(self.as_bytes())
    }
}

impl Default for TokenBuffer {
    fn default() -> Self {
        Self::new()
    }
}
