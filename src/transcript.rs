//! Hashing of protocol transcripts into scalars.

use crate::curve::PairingCurve;
use crate::identity::HashedId;

const DST_CHALLENGE: &[u8] = b"MPIN-CHALLENGE-V1";
const DST_HASH_ALL: &[u8] = b"MPIN-FULL-TRANSCRIPT-V1";

/// Hash length-prefixed `parts` under `dst` and reduce the 64-byte XOF output mod q.
pub fn hash_to_scalar<C: PairingCurve>(dst: &[u8], parts: &[&[u8]]) -> C::Scalar {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&(dst.len() as u32).to_be_bytes());
    hasher.update(dst);
    for part in parts {
        hasher.update(&(part.len() as u32).to_be_bytes());
        hasher.update(part);
    }
    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);
    C::scalar_from_wide(&wide)
}

/// One-pass challenge `y = H(epoch_time ‖ commitment ‖ message)`.
///
/// `commitment` is `UT` when time permits are in use and `U` otherwise. Binding
/// a message turns the proof into a signature on it.
pub fn challenge<C: PairingCurve>(
    epoch_time: u64,
    commitment: &C::G1,
    message: Option<&[u8]>,
) -> C::Scalar {
    let commitment = C::g1_to_bytes(commitment);
    match message {
        Some(m) => hash_to_scalar::<C>(
            DST_CHALLENGE,
            &[&epoch_time.to_be_bytes(), &commitment, &[1u8], m],
        ),
        None => hash_to_scalar::<C>(DST_CHALLENGE, &[&epoch_time.to_be_bytes(), &commitment, &[0u8]]),
    }
}

/// `HM`: hash of the whole M-Pin Full transcript, shared input to both key derivations.
pub fn hash_all<C: PairingCurve>(
    hashed_id: &HashedId,
    u: &C::G1,
    ut: Option<&C::G1>,
    v: &C::G1,
    y: &C::Scalar,
    z: &C::G1,
    t: &C::G1,
) -> C::Scalar {
    let u = C::g1_to_bytes(u);
    let ut = ut.map(C::g1_to_bytes).unwrap_or_default();
    let v = C::g1_to_bytes(v);
    let y = C::scalar_to_bytes(y);
    let z = C::g1_to_bytes(z);
    let t = C::g1_to_bytes(t);
    hash_to_scalar::<C>(
        DST_HASH_ALL,
        &[hashed_id.as_bytes(), &u, &ut, &v, &y, &z, &t],
    )
}
