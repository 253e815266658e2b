//! Owned secret material that is wiped when it goes out of scope.

use std::fmt;
use std::marker::PhantomData;

use group::Group;
use rand_core::RngCore;
use zeroize::{DefaultIsZeroes, Zeroize, Zeroizing};

use crate::curve::PairingCurve;
use crate::types::Error;

// Lets `zeroize` overwrite any plain-old-data value with its default.
#[derive(Clone, Copy, Default)]
struct Wiped<T>(T);

impl<T: Copy + Default> DefaultIsZeroes for Wiped<T> {}

/// A scalar that is zeroized on drop: master shares, ephemerals `x`, `r`, `w`, DVS `z`.
pub struct SecretScalar<C: PairingCurve>(Wiped<C::Scalar>);

impl<C: PairingCurve> SecretScalar<C> {
    pub fn new(value: C::Scalar) -> Self {
        Self(Wiped(value))
    }

    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::new(C::scalar_random(rng))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::new(C::scalar_from_bytes(bytes)?))
    }

    pub fn expose(&self) -> &C::Scalar {
        &self.0.0
    }

    pub fn to_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(C::scalar_to_bytes(self.expose()))
    }
}

impl<C: PairingCurve> Clone for SecretScalar<C> {
    fn clone(&self) -> Self {
        Self::new(*self.expose())
    }
}

impl<C: PairingCurve> Drop for SecretScalar<C> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl<C: PairingCurve> fmt::Debug for SecretScalar<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretScalar(..)")
    }
}

// Group elements have no `Default`; the identity stands in for zero.
#[derive(Clone, Copy)]
struct Cleared<G>(G);

impl<G: Group> Default for Cleared<G> {
    fn default() -> Self {
        Self(G::identity())
    }
}

impl<G: Group> DefaultIsZeroes for Cleared<G> {}

/// A group element that is reset to the identity on drop: restored client
/// secrets and the pairing values they produce.
pub(crate) struct SecretPoint<G: Group>(Cleared<G>);

impl<G: Group> SecretPoint<G> {
    pub(crate) fn new(value: G) -> Self {
        Self(Cleared(value))
    }

    pub(crate) fn expose(&self) -> &G {
        &self.0.0
    }

    pub(crate) fn expose_mut(&mut self) -> &mut G {
        &mut self.0.0
    }
}

impl<G: Group> Clone for SecretPoint<G> {
    fn clone(&self) -> Self {
        Self::new(*self.expose())
    }
}

impl<G: Group> Drop for SecretPoint<G> {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// A G1 element held only as its canonical encoding, wiped on drop.
pub(crate) struct SecretG1<C: PairingCurve> {
    bytes: Zeroizing<Vec<u8>>,
    _curve: PhantomData<C>,
}

impl<C: PairingCurve> SecretG1<C> {
    pub(crate) fn new(point: &C::G1) -> Self {
        Self {
            bytes: Zeroizing::new(C::g1_to_bytes(point)),
            _curve: PhantomData,
        }
    }

    pub(crate) fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let point = C::g1_from_bytes(bytes)?;
        Ok(Self::new(&point))
    }

    pub(crate) fn point(&self) -> Result<SecretPoint<C::G1>, Error> {
        C::g1_from_bytes(&self.bytes).map(SecretPoint::new)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl<C: PairingCurve> Clone for SecretG1<C> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            _curve: PhantomData,
        }
    }
}

pub const SESSION_KEY_LEN: usize = 32;

/// Symmetric key agreed by the M-Pin Full exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey(Zeroizing<[u8; SESSION_KEY_LEN]>);

impl SessionKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let raw: [u8; SESSION_KEY_LEN] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        Ok(Self(Zeroizing::new(raw)))
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(..)")
    }
}
