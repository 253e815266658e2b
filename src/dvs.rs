//! Designated-verifier (key-escrow-less) variant.
//!
//! The client draws `z`, publishes `Pa = z⁻¹·Q` and enrols under the identity
//! `ID ‖ Pa`. Its client secret and time permits are multiplied by `z` before
//! use, so only a server checking against `Pa` (instead of `Q`) accepts its
//! proofs, and the authorities alone cannot impersonate it.

use ff::Field;
use group::Group;
use tracing::debug;

use crate::curve::PairingCurve;
use crate::rng::Nonce;
use crate::secret::{SecretG1, SecretPoint, SecretScalar};
use crate::sharing::{ClientSecret, TimePermit};
use crate::types::Error;

/// `Pa = z⁻¹·Q`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DvsPublicKey<C: PairingCurve>(pub(crate) C::G2);

impl<C: PairingCurve> DvsPublicKey<C> {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(DvsPublicKey(C::g2_from_bytes(bytes)?))
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        C::g2_to_bytes(&self.0)
    }

    pub fn point(&self) -> &C::G2 {
        &self.0
    }

    pub fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }
}

pub struct DvsKeyPair<C: PairingCurve> {
    z: SecretScalar<C>,
    pub public: DvsPublicKey<C>,
}

impl<C: PairingCurve> DvsKeyPair<C> {
    pub fn generate(nonce: Nonce<'_, C>) -> Result<Self, Error> {
        let z = nonce.resolve();
        let z_inv = Option::<C::Scalar>::from(z.expose().invert()).ok_or(Error::InvalidParams)?;
        let public = DvsPublicKey(C::G2::generator() * z_inv);
        debug!("designated-verifier key generated");
        Ok(Self { z, public })
    }

    /// The identity the client enrols and authenticates under: `ID ‖ encode(Pa)`.
    pub fn identity(&self, id: &[u8]) -> Vec<u8> {
        let mut out = id.to_vec();
        out.extend_from_slice(&self.public.to_bytes());
        out
    }

    pub fn secret(&self) -> &SecretScalar<C> {
        &self.z
    }
}

/// `z·CS`, applied before PIN extraction.
pub fn bind_client_secret<C: PairingCurve>(
    key: &DvsKeyPair<C>,
    client_secret: ClientSecret<C>,
) -> Result<ClientSecret<C>, Error> {
    let mut bound = client_secret.point()?;
    *bound.expose_mut() *= key.z.expose();
    Ok(ClientSecret(SecretG1::new(bound.expose())))
}

/// `z·TP`, so permits keep matching a `z`-bound secret.
pub fn bind_time_permit<C: PairingCurve>(key: &DvsKeyPair<C>, permit: &TimePermit<C>) -> TimePermit<C> {
    TimePermit {
        date: permit.date,
        value: permit.value * key.z.expose(),
    }
}
