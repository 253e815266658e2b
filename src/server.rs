//! Server-side verification for the one-pass and two-pass protocols.
//!
//! The check is a single pairing product
//!
//! `e(V, Q') + e(UT' + y·HTID', sQ) == 0`
//!
//! written additively in GT, with `Q' = Q` (or `Pa` for designated
//! verifiers) and `UT'`, `HTID'` falling back to `U`, `HID` when the server
//! runs without time permits. Date and public-key consistency are decided
//! before any pairing so every failure has its own status.

use ff::Field;
use group::Group;
use rand_core::RngCore;
use tracing::{debug, warn};

use crate::client::{AuthRequest, Pass1Message};
use crate::curve::PairingCurve;
use crate::dvs::DvsPublicKey;
use crate::identity::{ServerIdentity, map_id, map_permit};
use crate::sharing::ServerSecret;
use crate::transcript::challenge as one_pass_challenge;
use crate::types::{EpochDate, Error, Params, Wire, validate_params};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    Success,
    BadPin,
    BadTimePermitOrDate,
    BadPublicKey,
    MalformedInput,
}

impl AuthStatus {
    pub fn is_success(self) -> bool {
        self == AuthStatus::Success
    }

    pub fn into_error(self) -> Option<Error> {
        match self {
            AuthStatus::Success => None,
            AuthStatus::BadPin => Some(Error::BadPin),
            AuthStatus::BadTimePermitOrDate => Some(Error::BadTimePermitOrDate),
            AuthStatus::BadPublicKey => Some(Error::BadPublicKey),
            AuthStatus::MalformedInput => Some(Error::MalformedInput),
        }
    }
}

/// `E` and `F` with `F = (entered − enrolled)·E` in additive GT notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinErrorHelpers<C: PairingCurve> {
    pub e: C::Gt,
    pub f: C::Gt,
}

/// Outcome of a verification. `hid`, `htid` and `y` are returned so a caller
/// running M-Pin Full can reuse them.
#[derive(Clone, Debug)]
pub struct Verification<C: PairingCurve> {
    pub status: AuthStatus,
    pub hid: C::G1,
    pub htid: Option<C::G1>,
    pub y: C::Scalar,
    pub helpers: Option<PinErrorHelpers<C>>,
}

impl<C: PairingCurve> Verification<C> {
    pub fn into_result(self) -> Result<Self, Error> {
        match self.status.into_error() {
            None => Ok(self),
            Some(err) => Err(err),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyOptions<'a, C: PairingCurve> {
    /// Message the one-pass proof signs. Ignored by [`second_pass`].
    pub message: Option<&'a [u8]>,
    /// Verify against `Pa` instead of `Q`.
    pub public_key: Option<&'a DvsPublicKey<C>>,
    /// Compute [`PinErrorHelpers`] when the PIN check fails.
    pub want_helpers: bool,
}

/// Server view of the claimed identity, fixed before the client's commitment
/// is examined.
#[derive(Clone, Debug)]
pub struct ServerPass1<C: PairingCurve> {
    pub date: Option<EpochDate>,
    pub hid: C::G1,
    pub htid: Option<C::G1>,
    plain_id: Option<Vec<u8>>,
}

/// Map the identity (and, with permits, the expected date). No secret input.
pub fn first_pass<C: PairingCurve>(
    expected_date: Option<EpochDate>,
    identity: ServerIdentity<'_>,
) -> ServerPass1<C> {
    let hashed = identity.hashed();
    let hid = map_id::<C>(&hashed);
    let htid = expected_date.map(|date| hid + map_permit::<C>(date, &hashed));
    let plain_id = match identity {
        ServerIdentity::Plain(id) => Some(id.to_vec()),
        ServerIdentity::Hashed(_) => None,
    };
    ServerPass1 {
        date: expected_date,
        hid,
        htid,
        plain_id,
    }
}

/// Fresh two-pass challenge `y`.
pub fn challenge<C: PairingCurve>(rng: &mut dyn RngCore) -> C::Scalar {
    C::scalar_random(rng)
}

struct Claim<'a, C: PairingCurve> {
    date: Option<EpochDate>,
    u: &'a C::G1,
    ut: Option<&'a C::G1>,
    v: &'a C::G1,
}

fn check_date<C: PairingCurve>(pass1: &ServerPass1<C>, claim: &Claim<'_, C>) -> bool {
    match (pass1.date, claim.date, claim.ut) {
        (Some(expected), Some(date), Some(_)) => expected == date,
        (None, None, None) => true,
        _ => false,
    }
}

fn verifier_key<C: PairingCurve>(
    pass1: &ServerPass1<C>,
    public_key: Option<&DvsPublicKey<C>>,
) -> Option<C::G2> {
    let Some(pa) = public_key else {
        return Some(C::G2::generator());
    };
    if pa.is_identity() {
        return None;
    }
    if let Some(id) = &pass1.plain_id
        && !id.ends_with(&pa.to_bytes())
    {
        return None;
    }
    Some(*pa.point())
}

fn verify<C: PairingCurve>(
    server_secret: &ServerSecret<C>,
    pass1: &ServerPass1<C>,
    claim: Claim<'_, C>,
    y: C::Scalar,
    options: &VerifyOptions<'_, C>,
) -> Verification<C> {
    let outcome = |status, helpers| Verification {
        status,
        hid: pass1.hid,
        htid: pass1.htid,
        y,
        helpers,
    };

    if !check_date(pass1, &claim) {
        warn!(
            expected = ?pass1.date,
            claimed = ?claim.date,
            "authentication rejected: time permit or date mismatch"
        );
        return outcome(AuthStatus::BadTimePermitOrDate, None);
    }

    let Some(q) = verifier_key(pass1, options.public_key) else {
        warn!("authentication rejected: designated-verifier key inconsistent with identity");
        return outcome(AuthStatus::BadPublicKey, None);
    };

    let (commitment, point) = match (claim.ut, pass1.htid) {
        (Some(ut), Some(htid)) => (*ut, htid),
        _ => (*claim.u, pass1.hid),
    };
    let residual =
        C::pairing_product(&[(*claim.v, q), (commitment + point * y, *server_secret.point())]);

    if bool::from(residual.is_identity()) {
        debug!(date = ?pass1.date, dvs = options.public_key.is_some(), "authentication accepted");
        return outcome(AuthStatus::Success, None);
    }

    warn!("authentication rejected: bad pin");
    let helpers = options.want_helpers.then(|| PinErrorHelpers {
        e: C::pairing(&-(*claim.u + pass1.hid * y), &q),
        f: residual,
    });
    outcome(AuthStatus::BadPin, helpers)
}

/// Verify a one-pass request. `y` is recomputed from the request's
/// `epoch_time`, its commitment and `options.message`; the caller decides
/// whether `epoch_time` is fresh enough.
pub fn one_pass<C: PairingCurve>(
    params: &Params,
    server_secret: &ServerSecret<C>,
    identity: ServerIdentity<'_>,
    expected_date: Option<EpochDate>,
    request: &AuthRequest<C>,
    options: &VerifyOptions<'_, C>,
) -> Result<Verification<C>, Error> {
    validate_params(*params)?;
    let pass1 = first_pass::<C>(expected_date, identity);
    let commitment = request.ut.as_ref().unwrap_or(&request.u);
    let y = one_pass_challenge::<C>(request.epoch_time, commitment, options.message);
    let claim = Claim {
        date: request.date,
        u: &request.u,
        ut: request.ut.as_ref(),
        v: &request.v,
    };
    Ok(verify(server_secret, &pass1, claim, y, options))
}

/// [`one_pass`] over an encoded [`AuthRequest`]. A request that does not
/// decode yields [`AuthStatus::MalformedInput`].
pub fn one_pass_encoded<C: PairingCurve>(
    params: &Params,
    server_secret: &ServerSecret<C>,
    identity: ServerIdentity<'_>,
    expected_date: Option<EpochDate>,
    request: &[u8],
    options: &VerifyOptions<'_, C>,
) -> Result<Verification<C>, Error> {
    match AuthRequest::<C>::decode(request) {
        Ok(request) => one_pass(params, server_secret, identity, expected_date, &request, options),
        Err(_) => {
            validate_params(*params)?;
            warn!(len = request.len(), "authentication rejected: malformed request");
            let pass1 = first_pass::<C>(expected_date, identity);
            Ok(Verification {
                status: AuthStatus::MalformedInput,
                hid: pass1.hid,
                htid: pass1.htid,
                y: C::Scalar::ZERO,
                helpers: None,
            })
        }
    }
}

/// Verify the client's answer `V` to challenge `y` for the commitments it sent
/// in its first message.
pub fn second_pass<C: PairingCurve>(
    params: &Params,
    server_secret: &ServerSecret<C>,
    pass1: &ServerPass1<C>,
    message: &Pass1Message<C>,
    y: &C::Scalar,
    v: &C::G1,
    options: &VerifyOptions<'_, C>,
) -> Result<Verification<C>, Error> {
    validate_params(*params)?;
    let claim = Claim {
        date: message.date,
        u: &message.u,
        ut: message.ut.as_ref(),
        v,
    };
    Ok(verify(server_secret, pass1, claim, *y, options))
}

/// One request in a [`verify_batch`] call.
#[derive(Clone, Copy, Debug)]
pub struct BatchItem<'a, C: PairingCurve> {
    pub identity: ServerIdentity<'a>,
    pub request: &'a AuthRequest<C>,
    pub options: VerifyOptions<'a, C>,
}

/// Verify independent one-pass requests against the same server secret and
/// date. Runs on the rayon pool with the `parallel` feature.
pub fn verify_batch<C: PairingCurve>(
    params: &Params,
    server_secret: &ServerSecret<C>,
    expected_date: Option<EpochDate>,
    items: &[BatchItem<'_, C>],
) -> Result<Vec<Verification<C>>, Error> {
    validate_params(*params)?;
    let check = |item: &BatchItem<'_, C>| {
        one_pass(
            params,
            server_secret,
            item.identity,
            expected_date,
            item.request,
            &item.options,
        )
    };

    #[cfg(feature = "parallel")]
    let results = {
        use rayon::prelude::*;
        items.par_iter().map(check).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let results = items.iter().map(check).collect();

    results
}
