//! Pairing-group primitives consumed by the protocol.
//!
//! The protocol is written once against [`PairingCurve`]; each supported curve
//! provides one implementation. [`Bls12381`] is backed by `blstrs`.

use std::fmt::Debug;
use std::io::Cursor;

use blstrs::{Compress, G1Affine, G1Projective, G2Affine, G2Projective, Gt, Scalar};
use ff::{Field, PrimeField};
use group::{Curve, Group};
use rand_core::RngCore;

use crate::types::Error;

/// Encoded sizes of the curve's scalars and group elements, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurveConfig {
    pub name: &'static str,
    pub field_bytes: usize,
    pub scalar_bytes: usize,
    pub g1_bytes: usize,
    pub g2_bytes: usize,
    pub gt_bytes: usize,
}

pub trait PairingCurve: Clone + Copy + Debug + Default + Send + Sync + 'static {
    type Scalar: PrimeField;
    type G1: Group<Scalar = Self::Scalar>;
    type G2: Group<Scalar = Self::Scalar>;
    type Gt: Group<Scalar = Self::Scalar>;

    const CONFIG: CurveConfig;

    fn pairing(p: &Self::G1, q: &Self::G2) -> Self::Gt;

    /// Product of pairings, written additively: `Σ e(pᵢ, qᵢ)`.
    fn pairing_product(terms: &[(Self::G1, Self::G2)]) -> Self::Gt {
        terms
            .iter()
            .fold(Self::Gt::identity(), |acc, (p, q)| acc + Self::pairing(p, q))
    }

    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> Self::G1;

    fn scalar_to_bytes(s: &Self::Scalar) -> Vec<u8>;
    fn scalar_from_bytes(bytes: &[u8]) -> Result<Self::Scalar, Error>;
    fn g1_to_bytes(p: &Self::G1) -> Vec<u8>;
    fn g1_from_bytes(bytes: &[u8]) -> Result<Self::G1, Error>;
    fn g2_to_bytes(p: &Self::G2) -> Vec<u8>;
    fn g2_from_bytes(bytes: &[u8]) -> Result<Self::G2, Error>;
    fn gt_to_bytes(t: &Self::Gt) -> Vec<u8>;
    fn gt_from_bytes(bytes: &[u8]) -> Result<Self::Gt, Error>;

    fn scalar_random(rng: &mut dyn RngCore) -> Self::Scalar {
        Self::Scalar::random(rng)
    }

    /// Reduce a big-endian byte string modulo the group order.
    fn scalar_from_wide(bytes: &[u8]) -> Self::Scalar {
        let radix = Self::Scalar::from(256u64);
        bytes.iter().fold(Self::Scalar::ZERO, |acc, b| {
            acc * radix + Self::Scalar::from(u64::from(*b))
        })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bls12381;

impl PairingCurve for Bls12381 {
    type Scalar = Scalar;
    type G1 = G1Projective;
    type G2 = G2Projective;
    type Gt = Gt;

    const CONFIG: CurveConfig = CurveConfig {
        name: "BLS12-381",
        field_bytes: 48,
        scalar_bytes: 32,
        g1_bytes: 48,
        g2_bytes: 96,
        gt_bytes: 288,
    };

    fn pairing(p: &G1Projective, q: &G2Projective) -> Gt {
        blstrs::pairing(&p.to_affine(), &q.to_affine())
    }

    fn hash_to_g1(msg: &[u8], dst: &[u8]) -> G1Projective {
        G1Projective::hash_to_curve(msg, dst, &[])
    }

    fn scalar_to_bytes(s: &Scalar) -> Vec<u8> {
        s.to_bytes_be().to_vec()
    }

    fn scalar_from_bytes(bytes: &[u8]) -> Result<Scalar, Error> {
        let raw: [u8; 32] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        Option::<Scalar>::from(Scalar::from_bytes_be(&raw)).ok_or(Error::MalformedInput)
    }

    fn g1_to_bytes(p: &G1Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g1_from_bytes(bytes: &[u8]) -> Result<G1Projective, Error> {
        let raw: [u8; 48] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        let affine =
            Option::<G1Affine>::from(G1Affine::from_compressed(&raw)).ok_or(Error::MalformedInput)?;
        Ok(affine.into())
    }

    fn g2_to_bytes(p: &G2Projective) -> Vec<u8> {
        p.to_affine().to_compressed().to_vec()
    }

    fn g2_from_bytes(bytes: &[u8]) -> Result<G2Projective, Error> {
        let raw: [u8; 96] = bytes.try_into().map_err(|_| Error::MalformedInput)?;
        let affine =
            Option::<G2Affine>::from(G2Affine::from_compressed(&raw)).ok_or(Error::MalformedInput)?;
        Ok(affine.into())
    }

    /// Torus compression is undefined at the identity; it is encoded as all
    /// zeros, which no other element compresses to.
    fn gt_to_bytes(t: &Gt) -> Vec<u8> {
        if bool::from(t.is_identity()) {
            return vec![0u8; Self::CONFIG.gt_bytes];
        }
        let mut bytes = Vec::with_capacity(Self::CONFIG.gt_bytes);
        t.write_compressed(&mut bytes)
            .expect("in-memory serialization should not fail");
        bytes
    }

    fn gt_from_bytes(bytes: &[u8]) -> Result<Gt, Error> {
        if bytes.len() != Self::CONFIG.gt_bytes {
            return Err(Error::MalformedInput);
        }
        if bytes.iter().all(|b| *b == 0) {
            return Ok(Gt::identity());
        }
        let mut cursor = Cursor::new(bytes);
        Gt::read_compressed(&mut cursor).map_err(|_| Error::MalformedInput)
    }
}
