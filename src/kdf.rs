use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::secret::{SESSION_KEY_LEN, SessionKey};
use crate::types::Error;

const SESSION_KEY_INFO: &[u8] = b"MPIN-FULL-SESSION-KEY-V1";

pub fn hkdf_extract(salt: &[u8], ikm: &[u8]) -> Hkdf<Sha256> {
    Hkdf::<Sha256>::new(Some(salt), ikm)
}

pub fn hkdf_expand(prk: &Hkdf<Sha256>, info: &[u8], out_len: usize) -> Result<Zeroizing<Vec<u8>>, Error> {
    let mut okm = Zeroizing::new(vec![0u8; out_len]);
    prk.expand(info, &mut okm)?;
    Ok(okm)
}

/// Session key from the shared pairing value `g` and the Diffie-Hellman point `W`.
pub fn session_key(pairing_value: &[u8], dh_point: &[u8]) -> Result<SessionKey, Error> {
    let prk = hkdf_extract(dh_point, pairing_value);
    let okm = hkdf_expand(&prk, SESSION_KEY_INFO, SESSION_KEY_LEN)?;
    SessionKey::from_bytes(&okm)
}
