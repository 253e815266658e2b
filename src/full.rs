//! M-Pin Full: turning a successful authentication into a shared session key.
//!
//! After the proof exchange the client sends `Z = r·A` and the server sends
//! `T = w·HTID` (or `w·HID` without permits). Both hash the transcript into
//! `HM` and derive the same key:
//!
//! - server: `g = e(Z + HM·HID, sQ)`, `W = w·(UT or U)`
//! - client: `g = (r + HM)·(e(Token, Q') + PIN·e(A, Q'))`, `W = x·T`
//!
//! The client's pairings do not depend on the attempt and are computed once
//! by [`precompute`].

use std::fmt;

use group::Group;
use tracing::debug;
use zeroize::Zeroizing;

use crate::curve::PairingCurve;
use crate::dvs::DvsPublicKey;
use crate::identity::{hash_id, map_id};
use crate::kdf;
use crate::rng::Nonce;
use crate::secret::{SecretPoint, SecretScalar, SessionKey};
use crate::sharing::ServerSecret;
use crate::token::Token;
use crate::types::{Error, Params, validate_pin};

/// `pc1 = e(Token, Q')`, `pc2 = e(A, Q')`. `pc1` is wiped on drop.
#[derive(Clone)]
pub struct Precomputed<C: PairingCurve> {
    pc1: SecretPoint<C::Gt>,
    pc2: C::Gt,
}

impl<C: PairingCurve> fmt::Debug for Precomputed<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Precomputed(..)")
    }
}

/// `Q'` is `Pa` for designated-verifier clients and `Q` otherwise.
pub fn precompute<C: PairingCurve>(
    token: &Token<C>,
    id: &[u8],
    public_key: Option<&DvsPublicKey<C>>,
) -> Result<Precomputed<C>, Error> {
    let q = public_key.map_or_else(C::G2::generator, |pa| *pa.point());
    let a = map_id::<C>(&hash_id(id));
    Ok(Precomputed {
        pc1: SecretPoint::new(C::pairing(token.point()?.expose(), &q)),
        pc2: C::pairing(&a, &q),
    })
}

/// `(k, k·point)` for a fresh or supplied `k`: `Z = r·A`, `T = w·HTID`.
pub fn g1_multiple<C: PairingCurve>(nonce: Nonce<'_, C>, point: &C::G1) -> (SecretScalar<C>, C::G1) {
    let k = nonce.resolve();
    let multiple = *point * k.expose();
    (k, multiple)
}

fn derive<C: PairingCurve>(g: &SecretPoint<C::Gt>, w: &SecretPoint<C::G1>) -> Result<SessionKey, Error> {
    let ikm = Zeroizing::new(C::gt_to_bytes(g.expose()));
    let salt = Zeroizing::new(C::g1_to_bytes(w.expose()));
    kdf::session_key(&ikm, &salt)
}

pub fn server_key<C: PairingCurve>(
    z: &C::G1,
    server_secret: &ServerSecret<C>,
    w: &SecretScalar<C>,
    hm: &C::Scalar,
    hid: &C::G1,
    u: &C::G1,
    ut: Option<&C::G1>,
) -> Result<SessionKey, Error> {
    let g = SecretPoint::new(C::pairing(&(*z + *hid * hm), server_secret.point()));
    let dh = SecretPoint::new(*ut.unwrap_or(u) * w.expose());
    let key = derive::<C>(&g, &dh)?;
    debug!("server session key derived");
    Ok(key)
}

pub fn client_key<C: PairingCurve>(
    params: &Params,
    precomputed: &Precomputed<C>,
    pin: u32,
    r: &SecretScalar<C>,
    x: &SecretScalar<C>,
    hm: &C::Scalar,
    t: &C::G1,
) -> Result<SessionKey, Error> {
    validate_pin(params, pin)?;
    let mut base = precomputed.pc1.clone();
    *base.expose_mut() += precomputed.pc2 * C::Scalar::from(u64::from(pin));
    let g = SecretPoint::new(*base.expose() * (*r.expose() + hm));
    let dh = SecretPoint::new(*t * x.expose());
    let key = derive::<C>(&g, &dh)?;
    debug!("client session key derived");
    Ok(key)
}
