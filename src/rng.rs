//! Randomness sourcing.
//!
//! Every operation that needs fresh randomness borrows a generator mutably for
//! the duration of the call. Concurrent attempts therefore each own their
//! generator (one per thread or per attempt); nothing in this crate shares one.

use rand_chacha::ChaCha20Rng;
use rand_core::{RngCore, SeedableRng};

use crate::curve::PairingCurve;
use crate::secret::SecretScalar;

/// Where an ephemeral scalar comes from.
pub enum Nonce<'r, C: PairingCurve> {
    /// Caller-supplied value, for deterministic runs and test vectors.
    Provided(SecretScalar<C>),
    /// Draw a fresh value from the borrowed generator.
    Draw(&'r mut dyn RngCore),
}

impl<C: PairingCurve> Nonce<'_, C> {
    pub fn resolve(self) -> SecretScalar<C> {
        match self {
            Nonce::Provided(x) => x,
            Nonce::Draw(rng) => SecretScalar::random(rng),
        }
    }
}

/// Seeded CSPRNG. The seed is compressed with BLAKE3 so any length is accepted.
pub fn create_csprng(seed: &[u8]) -> ChaCha20Rng {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"MPIN-CSPRNG-V1");
    hasher.update(seed);
    ChaCha20Rng::from_seed(*hasher.finalize().as_bytes())
}

/// CSPRNG seeded from the operating system.
pub fn os_csprng() -> ChaCha20Rng {
    ChaCha20Rng::from_entropy()
}
