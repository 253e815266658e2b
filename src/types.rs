//! Common types, configuration and error handling.

use serde::{Deserialize, Serialize};

/// Identifier of a distributed trusted authority (D-TA). Authorities are numbered `1..=n`.
pub type PartyId = u32;

/// Epoch day (days since the Unix epoch) a time permit is bound to.
pub type EpochDate = u32;

pub trait Wire: Sized {
    // Canonical byte encoding for network transport.
    fn encode(&self) -> Vec<u8>;
    fn decode(bytes: &[u8]) -> Result<Self, Error>;
}

/// Protocol-wide configuration shared by authorities, clients and servers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Number of authorities whose shares make up every secret.
    pub authorities: u32,
    /// PINs live in `0..max_pin`; also bounds PIN-error recovery.
    pub max_pin: u32,
    /// Number of entries in the kangaroo jump table (jumps are `2^0 .. 2^(n-1)`).
    pub kangaroo_table: u32,
    /// Number of jumps taken by the tame kangaroo before it sets its trap.
    pub kangaroo_trap: u32,
}

impl Params {
    pub fn with_authorities(authorities: u32) -> Self {
        Self {
            authorities,
            ..Self::default()
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            authorities: 2,
            max_pin: 10_000,
            kangaroo_table: 6,
            kangaroo_trap: 1_500,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Wrong length, off-curve point or non-canonical scalar.
    MalformedInput,
    /// Proof did not verify: wrong PIN or corrupted token.
    BadPin,
    /// Time permit does not match the date the server expects.
    BadTimePermitOrDate,
    /// Designated-verifier public key inconsistent with the identity.
    BadPublicKey,
    /// Kangaroo search exhausted its bound.
    PinErrorUndetermined,
    InvalidParams,
    InvalidShare,
    CryptoError,
    DecryptionFailed,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for Error {}

pub fn validate_params(params: Params) -> Result<(), Error> {
    if params.authorities == 0 || params.max_pin < 2 {
        return Err(Error::InvalidParams);
    }
    // Jump distances are powers of two held in an i64 walk counter.
    if params.kangaroo_table == 0 || params.kangaroo_table > 32 || params.kangaroo_trap == 0 {
        return Err(Error::InvalidParams);
    }
    Ok(())
}

pub fn validate_pin(params: &Params, pin: u32) -> Result<(), Error> {
    if pin >= params.max_pin {
        return Err(Error::InvalidParams);
    }
    Ok(())
}

/// Current epoch day, the `date` time permits are issued for.
pub fn today() -> EpochDate {
    (epoch_time() / 86_400) as EpochDate
}

/// Current Unix time in seconds, the `epoch_time` bound into one-pass challenges.
pub fn epoch_time() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl From<hkdf::InvalidLength> for Error {
    fn from(_: hkdf::InvalidLength) -> Self {
        Error::CryptoError
    }
}

impl From<chacha20poly1305::aead::Error> for Error {
    fn from(_: chacha20poly1305::aead::Error) -> Self {
        Error::DecryptionFailed
    }
}
