//! PIN extraction: turning a client secret into the token the client keeps.
//!
//! `Token = ClientSecret − PIN·A` with `A = map(H(ID))`. Adding `PIN'·A` back
//! at authentication time restores the client secret exactly when `PIN' = PIN`;
//! otherwise the result is off by `(PIN' − PIN)·A`, which is the offset the
//! server's helpers let [`crate::kangaroo`] recover.

use std::fmt;

use crate::curve::PairingCurve;
use crate::identity::{hash_id, map_id};
use crate::secret::{SecretG1, SecretPoint};
use crate::sharing::ClientSecret;
use crate::types::{Error, Params, validate_pin};

/// The only long-term secret a client stores. Wiped on drop.
#[derive(Clone)]
pub struct Token<C: PairingCurve>(pub(crate) SecretG1<C>);

impl<C: PairingCurve> Token<C> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Token(SecretG1::from_bytes(bytes)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub(crate) fn point(&self) -> Result<SecretPoint<C::G1>, Error> {
        self.0.point()
    }
}

impl<C: PairingCurve> fmt::Debug for Token<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(..)")
    }
}

fn pin_point<C: PairingCurve>(id: &[u8], pin: u32) -> C::G1 {
    map_id::<C>(&hash_id(id)) * C::Scalar::from(u64::from(pin))
}

/// Remove `pin` from the combined client secret. The client secret is consumed.
pub fn extract_pin<C: PairingCurve>(
    params: &Params,
    id: &[u8],
    pin: u32,
    client_secret: ClientSecret<C>,
) -> Result<Token<C>, Error> {
    validate_pin(params, pin)?;
    let mut token = client_secret.point()?;
    *token.expose_mut() -= pin_point::<C>(id, pin);
    Ok(Token(SecretG1::new(token.expose())))
}

/// Candidate client secret `Token + PIN·A`.
pub(crate) fn restore_pin<C: PairingCurve>(
    params: &Params,
    id: &[u8],
    pin: u32,
    token: &Token<C>,
) -> Result<SecretPoint<C::G1>, Error> {
    validate_pin(params, pin)?;
    let mut sec = token.point()?;
    *sec.expose_mut() += pin_point::<C>(id, pin);
    Ok(sec)
}
