//! Identity hashing and the mapping of identities and dates onto G1.

use sha2::{Digest, Sha256};

use crate::curve::PairingCurve;
use crate::types::{EpochDate, Error};

const DST_ID: &[u8] = b"MPIN-G1-ID-V1";
const DST_PERMIT: &[u8] = b"MPIN-G1-PERMIT-V1";

pub const HASHED_ID_LEN: usize = 32;

/// `H(ID)`: the digest authorities issue secrets for and anonymous servers receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HashedId(pub [u8; HASHED_ID_LEN]);

impl HashedId {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: [u8; HASHED_ID_LEN] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        Ok(HashedId(raw))
    }

    pub fn as_bytes(&self) -> &[u8; HASHED_ID_LEN] {
        &self.0
    }
}

pub fn hash_id(id: &[u8]) -> HashedId {
    HashedId(Sha256::digest(id).into())
}

/// How the server learns who is authenticating.
#[derive(Clone, Copy, Debug)]
pub enum ServerIdentity<'a> {
    /// The identity string itself (for DVS, `ID ‖ Pa`).
    Plain(&'a [u8]),
    /// Only `H(ID)`, so the identity stays hidden from the verifier.
    Hashed(&'a HashedId),
}

impl ServerIdentity<'_> {
    pub fn hashed(&self) -> HashedId {
        match self {
            ServerIdentity::Plain(id) => hash_id(id),
            ServerIdentity::Hashed(h) => **h,
        }
    }
}

/// The identity point `A = map(H(ID))`.
pub fn map_id<C: PairingCurve>(hashed: &HashedId) -> C::G1 {
    C::hash_to_g1(hashed.as_bytes(), DST_ID)
}

/// The time-permit point `map(date ‖ H(ID))`.
pub fn map_permit<C: PairingCurve>(date: EpochDate, hashed: &HashedId) -> C::G1 {
    let mut msg = Vec::with_capacity(4 + HASHED_ID_LEN);
    msg.extend_from_slice(&date.to_be_bytes());
    msg.extend_from_slice(hashed.as_bytes());
    C::hash_to_g1(&msg, DST_PERMIT)
}

/// `HTID = A + map(date ‖ H(ID))`, the point commitments are taken over when
/// time permits are in use.
pub fn map_id_with_permit<C: PairingCurve>(date: EpochDate, hashed: &HashedId) -> C::G1 {
    map_id::<C>(hashed) + map_permit::<C>(date, hashed)
}
