//! PSA crypto and initial attestation services.

use core::num::NonZeroU32;

use rand::{CryptoRng, RngCore};

use crate::status::PsaStatus;

/// Default nonce size in bytes.
pub const NONCE_SIZE: usize = 32;

/// Largest challenge the attestation service accepts.
pub const MAX_CHALLENGE_SIZE: usize = 64;

/// PSA crypto service as exposed to the non-secure side.
pub trait Crypto {
    /// Initialize the crypto subsystem. Must be called before any other operation.
    fn init(&mut self) -> Result<(), PsaStatus>;

    /// Fill `out` with random bytes from the secure RNG.
    fn generate_random(&mut self, out: &mut [u8]) -> Result<(), PsaStatus>;
}

/// PSA initial attestation service.
pub trait InitialAttestation {
    /// Size of the token that a challenge of `challenge_len` bytes would produce.
    fn token_size(&mut self, challenge_len: usize) -> Result<usize, PsaStatus>;

    /// Write the token for `challenge` into `out` and return its length.
    fn get_token(&mut self, challenge: &[u8], out: &mut [u8]) -> Result<usize, PsaStatus>;
}

/// Challenge sizes permitted by the attestation service.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChallengeSize {
    /// 32 bytes
    #[default]
    Bytes32,
    /// 48 bytes
    Bytes48,
    /// 64 bytes
    Bytes64,
}

impl ChallengeSize {
    /// Size in bytes.
    pub const fn len(self) -> usize {
        match self {
            Self::Bytes32 => 32,
            Self::Bytes48 => 48,
            Self::Bytes64 => 64,
        }
    }
}

/// Random challenge bound into an attestation token.
#[derive(Clone)]
pub struct Nonce {
    bytes: [u8; MAX_CHALLENGE_SIZE],
    size: ChallengeSize,
}

impl Nonce {
    /// Draw a fresh nonce of the given size from the secure RNG.
    pub fn generate<C: Crypto + ?Sized>(crypto: &mut C, size: ChallengeSize) -> Result<Self, PsaStatus> {
        let mut bytes = [0u8; MAX_CHALLENGE_SIZE];
        crypto.generate_random(&mut bytes[..size.len()])?;
        Ok(Self { bytes, size })
    }

    /// Challenge size.
    pub fn size(&self) -> ChallengeSize {
        self.size
    }

    /// The nonce bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.size.len()]
    }
}

/// [`RngCore`] over the PSA RNG, for code written against the `rand` traits.
pub struct PsaRng<'a, C: Crypto + ?Sized> {
    crypto: &'a mut C,
}

impl<'a, C: Crypto + ?Sized> PsaRng<'a, C> {
    /// Wrap an initialized crypto service.
    pub fn new(crypto: &'a mut C) -> Self {
        Self { crypto }
    }
}

impl<C: Crypto + ?Sized> RngCore for PsaRng<'_, C> {
    fn next_u32(&mut self) -> u32 {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf);
        u32::from_le_bytes(buf)
    }

    fn next_u64(&mut self) -> u64 {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf);
        u64::from_le_bytes(buf)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(status) = self.crypto.generate_random(dest) {
            panic!("PSA RNG failure: {}", status);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.crypto.generate_random(dest).map_err(|status| {
            // PSA errors are negative; fold them into the custom error range.
            let code = rand::Error::CUSTOM_START | status.0.unsigned_abs();
            rand::Error::from(NonZeroU32::new(code).unwrap_or(NonZeroU32::MIN))
        })
    }
}

impl<C: Crypto + ?Sized> CryptoRng for PsaRng<'_, C> {}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts up from a seed; fails once `budget` bytes are exhausted.
    struct CountingCrypto {
        next: u8,
        budget: usize,
    }

    impl Crypto for CountingCrypto {
        fn init(&mut self) -> Result<(), PsaStatus> {
            Ok(())
        }

        fn generate_random(&mut self, out: &mut [u8]) -> Result<(), PsaStatus> {
            if out.len() > self.budget {
                return Err(PsaStatus::INSUFFICIENT_ENTROPY);
            }
            self.budget -= out.len();
            for b in out {
                *b = self.next;
                self.next = self.next.wrapping_add(1);
            }
            Ok(())
        }
    }

    #[test]
    fn test_challenge_sizes() {
        assert_eq!(ChallengeSize::default().len(), NONCE_SIZE);
        assert_eq!(ChallengeSize::Bytes48.len(), 48);
        assert_eq!(ChallengeSize::Bytes64.len(), MAX_CHALLENGE_SIZE);
    }

    #[test]
    fn test_nonce_generate() {
        let mut crypto = CountingCrypto { next: 1, budget: 256 };
        let nonce = Nonce::generate(&mut crypto, ChallengeSize::Bytes32).unwrap();
        assert_eq!(nonce.as_bytes().len(), 32);
        assert_eq!(nonce.as_bytes()[0], 1);
        assert_eq!(nonce.as_bytes()[31], 32);
        assert_eq!(nonce.size(), ChallengeSize::Bytes32);

        let nonce = Nonce::generate(&mut crypto, ChallengeSize::Bytes64).unwrap();
        assert_eq!(nonce.as_bytes().len(), 64);
        assert_eq!(nonce.as_bytes()[0], 33);
    }

    #[test]
    fn test_nonce_generate_failure() {
        let mut crypto = CountingCrypto { next: 0, budget: 16 };
        let err = Nonce::generate(&mut crypto, ChallengeSize::Bytes32).err();
        assert_eq!(err, Some(PsaStatus::INSUFFICIENT_ENTROPY));
    }

    #[test]
    fn test_psa_rng() {
        let mut crypto = CountingCrypto { next: 0, budget: 12 };
        let mut rng = PsaRng::new(&mut crypto);
        assert_eq!(rng.next_u32(), u32::from_le_bytes([0, 1, 2, 3]));
        assert_eq!(rng.next_u64(), u64::from_le_bytes([4, 5, 6, 7, 8, 9, 10, 11]));

        let mut buf = [0u8; 4];
        let err = rng.try_fill_bytes(&mut buf).unwrap_err();
        assert_eq!(
            err.code().map(NonZeroU32::get),
            Some(rand::Error::CUSTOM_START | 148)
        );
    }

    #[test]
    #[should_panic]
    fn test_psa_rng_fill_bytes_panics_on_failure() {
        let mut crypto = CountingCrypto { next: 0, budget: 0 };
        let mut rng = PsaRng::new(&mut crypto);
        let mut buf = [0u8; 1];
        rng.fill_bytes(&mut buf);
    }
}
