//! Client side of the one-pass and two-pass (three message) protocols.
//!
//! The client holds a [`Token`], optionally a [`TimePermit`] for today, and
//! the user's PIN. From fresh `x` it commits to
//!
//! - `U = x·A`
//! - `UT = x·(A + map(date ‖ H(ID)))` when a permit is used
//!
//! and answers a challenge `y` with `V = −(x + y)·SEC` where
//! `SEC = Token + PIN·A [+ TimePermit]`.
//!
//! In the one-pass flow `y` is derived from the commitment and the client's
//! clock. In the two-pass flow the server picks `y`, and the caller keeps the
//! [`ClientPass1State`] between the two calls.

use tracing::debug;

use crate::curve::PairingCurve;
use crate::identity::{hash_id, map_id, map_id_with_permit};
use crate::rng::Nonce;
use crate::secret::{SecretPoint, SecretScalar};
use crate::sharing::TimePermit;
use crate::token::{Token, restore_pin};
use crate::transcript::challenge;
use crate::types::{EpochDate, Error, Params};

/// Long-lived client material used for one authentication attempt.
pub struct ClientInput<'a, C: PairingCurve> {
    /// Identity string; for the designated-verifier variant this is `ID ‖ Pa`.
    pub id: &'a [u8],
    pub pin: u32,
    pub token: &'a Token<C>,
    /// Presence enables time permits; the permit's date is the one claimed.
    pub permit: Option<&'a TimePermit<C>>,
}

/// One-pass authentication request sent to the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequest<C: PairingCurve> {
    pub date: Option<EpochDate>,
    pub epoch_time: u64,
    pub u: C::G1,
    pub ut: Option<C::G1>,
    pub v: C::G1,
}

/// Result of [`one_pass`]. `x` is returned whether it was supplied or drawn.
pub struct ClientProof<C: PairingCurve> {
    pub x: SecretScalar<C>,
    pub y: C::Scalar,
    pub request: AuthRequest<C>,
}

/// First message of the two-pass flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pass1Message<C: PairingCurve> {
    pub date: Option<EpochDate>,
    pub u: C::G1,
    pub ut: Option<C::G1>,
}

impl<C: PairingCurve> Pass1Message<C> {
    /// The commitment a challenge is bound to: `UT` with permits, `U` without.
    pub fn commitment(&self) -> &C::G1 {
        self.ut.as_ref().unwrap_or(&self.u)
    }
}

/// Client state carried from the first pass to the second. Wiped on drop.
pub struct ClientPass1State<C: PairingCurve> {
    x: SecretScalar<C>,
    sec: SecretPoint<C::G1>,
}

/// Result of [`second_pass`].
pub struct ClientPass2<C: PairingCurve> {
    pub x: SecretScalar<C>,
    pub v: C::G1,
}

/// `V = −(x + y)·SEC`
fn proof<C: PairingCurve>(sec: &C::G1, x: &C::Scalar, y: &C::Scalar) -> C::G1 {
    -(*sec * (*x + *y))
}

/// Commit to `x` and assemble `SEC`; shared by both flows.
pub fn first_pass<C: PairingCurve>(
    params: &Params,
    input: &ClientInput<'_, C>,
    nonce: Nonce<'_, C>,
) -> Result<(ClientPass1State<C>, Pass1Message<C>), Error> {
    let x = nonce.resolve();
    let hashed = hash_id(input.id);
    let mut sec = restore_pin(params, input.id, input.pin, input.token)?;

    let u = map_id::<C>(&hashed) * x.expose();
    let (date, ut) = match input.permit {
        Some(permit) => {
            *sec.expose_mut() += permit.point();
            let htid = map_id_with_permit::<C>(permit.date, &hashed);
            (Some(permit.date), Some(htid * x.expose()))
        }
        None => (None, None),
    };

    let state = ClientPass1State { x, sec };
    Ok((state, Pass1Message { date, u, ut }))
}

/// Answer the server's challenge. Consumes the first-pass state.
pub fn second_pass<C: PairingCurve>(
    state: ClientPass1State<C>,
    y: &C::Scalar,
) -> Result<ClientPass2<C>, Error> {
    let ClientPass1State { x, sec } = state;
    let v = proof::<C>(sec.expose(), x.expose(), y);
    Ok(ClientPass2 { x, v })
}

/// Single-message authentication. With `message` the proof doubles as a
/// signature on it.
pub fn one_pass<C: PairingCurve>(
    params: &Params,
    input: &ClientInput<'_, C>,
    message: Option<&[u8]>,
    epoch_time: u64,
    nonce: Nonce<'_, C>,
) -> Result<ClientProof<C>, Error> {
    let (state, pass1) = first_pass(params, input, nonce)?;
    let y = challenge::<C>(epoch_time, pass1.commitment(), message);
    let ClientPass2 { x, v } = second_pass(state, &y)?;
    debug!(
        date = ?pass1.date,
        epoch_time,
        signed = message.is_some(),
        "client proof built"
    );
    Ok(ClientProof {
        x,
        y,
        request: AuthRequest {
            date: pass1.date,
            epoch_time,
            u: pass1.u,
            ut: pass1.ut,
            v,
        },
    })
}
