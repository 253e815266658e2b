//! Master-secret shares held by the distributed trusted authorities and the
//! additive combination of their contributions.
//!
//! Authority `i` holds `sᵢ`. The master secret `s = Σ sᵢ` is never formed;
//! only its images are summed:
//!
//! - server secret `s·Q` in G2,
//! - client secret `s·A` in G1 where `A = map(H(ID))`,
//! - time permit `s·map(date ‖ H(ID))` in G1.
//!
//! Each share records which authorities it already contains. Combining shares
//! that overlap is rejected, and a final secret can only be built from a share
//! covering every configured authority.

use std::fmt;

use group::Group;
use rand_core::RngCore;
use tracing::debug;

use crate::curve::PairingCurve;
use crate::identity::{HashedId, map_id, map_permit};
use crate::secret::{SecretG1, SecretPoint, SecretScalar};
use crate::types::{EpochDate, Error, Params, PartyId, validate_params};

pub struct MasterSecretShare<C: PairingCurve> {
    pub authority: PartyId,
    secret: SecretScalar<C>,
}

impl<C: PairingCurve> MasterSecretShare<C> {
    pub fn random(authority: PartyId, rng: &mut dyn RngCore) -> Result<Self, Error> {
        Self::from_secret(authority, SecretScalar::random(rng))
    }

    pub fn from_secret(authority: PartyId, secret: SecretScalar<C>) -> Result<Self, Error> {
        if authority == 0 {
            return Err(Error::InvalidParams);
        }
        Ok(Self { authority, secret })
    }

    pub fn secret(&self) -> &SecretScalar<C> {
        &self.secret
    }
}

#[derive(Clone, Debug)]
pub struct ServerSecretShare<C: PairingCurve> {
    pub contributors: Vec<PartyId>,
    pub value: C::G2,
}

#[derive(Clone)]
pub struct ClientSecretShare<C: PairingCurve> {
    pub contributors: Vec<PartyId>,
    pub(crate) value: SecretG1<C>,
}

#[derive(Clone, Debug)]
pub struct TimePermitShare<C: PairingCurve> {
    pub contributors: Vec<PartyId>,
    pub date: EpochDate,
    pub value: C::G1,
}

pub fn share_server_secret<C: PairingCurve>(master: &MasterSecretShare<C>) -> ServerSecretShare<C> {
    ServerSecretShare {
        contributors: vec![master.authority],
        value: C::G2::generator() * master.secret.expose(),
    }
}

pub fn share_client_secret<C: PairingCurve>(
    master: &MasterSecretShare<C>,
    hashed_id: &HashedId,
) -> ClientSecretShare<C> {
    let point = SecretPoint::new(map_id::<C>(hashed_id) * master.secret.expose());
    ClientSecretShare {
        contributors: vec![master.authority],
        value: SecretG1::new(point.expose()),
    }
}

pub fn share_time_permit<C: PairingCurve>(
    master: &MasterSecretShare<C>,
    date: EpochDate,
    hashed_id: &HashedId,
) -> TimePermitShare<C> {
    TimePermitShare {
        contributors: vec![master.authority],
        date,
        value: map_permit::<C>(date, hashed_id) * master.secret.expose(),
    }
}

/// Pairwise combination of shares of the same kind.
pub trait Combine: Sized {
    fn combine(&self, other: &Self) -> Result<Self, Error>;
}

/// Fold any non-empty set of shares. The result does not depend on order.
pub fn combine_all<S: Combine + Clone>(shares: &[S]) -> Result<S, Error> {
    let (first, rest) = shares.split_first().ok_or(Error::InvalidShare)?;
    rest.iter().try_fold(first.clone(), |acc, s| acc.combine(s))
}

fn merge_contributors(a: &[PartyId], b: &[PartyId]) -> Result<Vec<PartyId>, Error> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    out.extend_from_slice(a);
    for id in b {
        if out.contains(id) {
            return Err(Error::InvalidShare);
        }
        out.push(*id);
    }
    out.sort_unstable();
    Ok(out)
}

fn require_all(params: &Params, contributors: &[PartyId]) -> Result<(), Error> {
    validate_params(*params)?;
    let mut ids = contributors.to_vec();
    ids.sort_unstable();
    ids.dedup();
    let expected: Vec<PartyId> = (1..=params.authorities).collect();
    if ids.len() != contributors.len() || ids != expected {
        return Err(Error::InvalidShare);
    }
    Ok(())
}

impl<C: PairingCurve> Combine for ServerSecretShare<C> {
    fn combine(&self, other: &Self) -> Result<Self, Error> {
        Ok(ServerSecretShare {
            contributors: merge_contributors(&self.contributors, &other.contributors)?,
            value: self.value + other.value,
        })
    }
}

impl<C: PairingCurve> Combine for ClientSecretShare<C> {
    fn combine(&self, other: &Self) -> Result<Self, Error> {
        let contributors = merge_contributors(&self.contributors, &other.contributors)?;
        let mut sum = self.value.point()?;
        *sum.expose_mut() += other.value.point()?.expose();
        Ok(ClientSecretShare {
            contributors,
            value: SecretG1::new(sum.expose()),
        })
    }
}

impl<C: PairingCurve> Combine for TimePermitShare<C> {
    fn combine(&self, other: &Self) -> Result<Self, Error> {
        if self.date != other.date {
            return Err(Error::BadTimePermitOrDate);
        }
        Ok(TimePermitShare {
            contributors: merge_contributors(&self.contributors, &other.contributors)?,
            date: self.date,
            value: self.value + other.value,
        })
    }
}

/// `s·Q`: held only by the verifying server.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerSecret<C: PairingCurve>(pub(crate) C::G2);

impl<C: PairingCurve> fmt::Debug for ServerSecret<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(..)")
    }
}

impl<C: PairingCurve> ServerSecret<C> {
    pub fn from_shares(params: &Params, shares: &[ServerSecretShare<C>]) -> Result<Self, Error> {
        let combined = combine_all(shares)?;
        require_all(params, &combined.contributors)?;
        debug!(authorities = params.authorities, "server secret combined");
        Ok(ServerSecret(combined.value))
    }

    pub fn point(&self) -> &C::G2 {
        &self.0
    }
}

/// `s·A`: exists only between combination and PIN extraction.
pub struct ClientSecret<C: PairingCurve>(pub(crate) SecretG1<C>);

impl<C: PairingCurve> ClientSecret<C> {
    pub fn from_shares(params: &Params, shares: &[ClientSecretShare<C>]) -> Result<Self, Error> {
        let combined = combine_all(shares)?;
        require_all(params, &combined.contributors)?;
        debug!(authorities = params.authorities, "client secret combined");
        Ok(ClientSecret(combined.value))
    }

    pub(crate) fn point(&self) -> Result<SecretPoint<C::G1>, Error> {
        self.0.point()
    }
}

/// `s·map(date ‖ H(ID))`, valid for exactly one epoch day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimePermit<C: PairingCurve> {
    pub date: EpochDate,
    pub(crate) value: C::G1,
}

impl<C: PairingCurve> TimePermit<C> {
    pub fn from_shares(params: &Params, shares: &[TimePermitShare<C>]) -> Result<Self, Error> {
        let combined = combine_all(shares)?;
        require_all(params, &combined.contributors)?;
        debug!(date = combined.date, "time permit combined");
        Ok(TimePermit {
            date: combined.date,
            value: combined.value,
        })
    }

    pub fn point(&self) -> &C::G1 {
        &self.value
    }
}
