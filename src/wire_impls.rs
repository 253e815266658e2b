use crate::client::{AuthRequest, Pass1Message};
use crate::curve::PairingCurve;
use crate::dvs::DvsPublicKey;
use crate::encoding::{dec_tuple, dec_u32, dec_u64, enc_opt, enc_tuple};
use crate::identity::HashedId;
use crate::secret::{SecretG1, SecretScalar};
use crate::server::PinErrorHelpers;
use crate::sharing::{
    ClientSecret, ClientSecretShare, MasterSecretShare, ServerSecret, ServerSecretShare,
    TimePermit, TimePermitShare,
};
use crate::token::Token;
use crate::types::{EpochDate, Error, Params, PartyId, Wire};

fn encode_parts(parts: &[&[u8]]) -> Vec<u8> {
    enc_tuple(parts).expect("wire parts are bounded by group element sizes")
}

fn enc_contributors(ids: &[PartyId]) -> Vec<u8> {
    ids.iter().flat_map(|id| id.to_be_bytes()).collect()
}

fn dec_contributors(bytes: &[u8]) -> Result<Vec<PartyId>, Error> {
    if bytes.is_empty() || bytes.len() % 4 != 0 {
        return Err(Error::MalformedInput);
    }
    bytes.chunks_exact(4).map(dec_u32).collect()
}

fn dec_opt_date(bytes: &[u8]) -> Result<Option<EpochDate>, Error> {
    if bytes.is_empty() {
        return Ok(None);
    }
    dec_u32(bytes).map(Some)
}

fn dec_opt_g1<C: PairingCurve>(bytes: &[u8]) -> Result<Option<C::G1>, Error> {
    if bytes.is_empty() {
        return Ok(None);
    }
    C::g1_from_bytes(bytes).map(Some)
}

impl Wire for Params {
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(16);
        out.extend_from_slice(&self.authorities.to_be_bytes());
        out.extend_from_slice(&self.max_pin.to_be_bytes());
        out.extend_from_slice(&self.kangaroo_table.to_be_bytes());
        out.extend_from_slice(&self.kangaroo_trap.to_be_bytes());
        out
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != 16 {
            return Err(Error::MalformedInput);
        }
        Ok(Params {
            authorities: dec_u32(&bytes[0..4])?,
            max_pin: dec_u32(&bytes[4..8])?,
            kangaroo_table: dec_u32(&bytes[8..12])?,
            kangaroo_trap: dec_u32(&bytes[12..16])?,
        })
    }
}

impl Wire for HashedId {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        HashedId::from_bytes(bytes)
    }
}

impl<C: PairingCurve> Wire for AuthRequest<C> {
    fn encode(&self) -> Vec<u8> {
        let date = self.date.map(u32::to_be_bytes);
        let ut = self.ut.as_ref().map(C::g1_to_bytes);
        encode_parts(&[
            enc_opt(date.as_ref().map(|d| d.as_slice())),
            &self.epoch_time.to_be_bytes(),
            &C::g1_to_bytes(&self.u),
            enc_opt(ut.as_deref()),
            &C::g1_to_bytes(&self.v),
        ])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 5)?;
        let date = dec_opt_date(&parts[0])?;
        let ut = dec_opt_g1::<C>(&parts[3])?;
        Ok(AuthRequest {
            date,
            epoch_time: dec_u64(&parts[1])?,
            u: C::g1_from_bytes(&parts[2])?,
            ut,
            v: C::g1_from_bytes(&parts[4])?,
        })
    }
}

impl<C: PairingCurve> Wire for Pass1Message<C> {
    fn encode(&self) -> Vec<u8> {
        let date = self.date.map(u32::to_be_bytes);
        let ut = self.ut.as_ref().map(C::g1_to_bytes);
        encode_parts(&[
            enc_opt(date.as_ref().map(|d| d.as_slice())),
            &C::g1_to_bytes(&self.u),
            enc_opt(ut.as_deref()),
        ])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 3)?;
        let date = dec_opt_date(&parts[0])?;
        let ut = dec_opt_g1::<C>(&parts[2])?;
        Ok(Pass1Message {
            date,
            u: C::g1_from_bytes(&parts[1])?,
            ut,
        })
    }
}

impl<C: PairingCurve> Wire for MasterSecretShare<C> {
    fn encode(&self) -> Vec<u8> {
        let secret = self.secret().to_bytes();
        encode_parts(&[&self.authority.to_be_bytes(), secret.as_slice()])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 2)?;
        let secret = SecretScalar::from_bytes(&parts[1])?;
        MasterSecretShare::from_secret(dec_u32(&parts[0])?, secret)
    }
}

impl<C: PairingCurve> Wire for ServerSecretShare<C> {
    fn encode(&self) -> Vec<u8> {
        encode_parts(&[
            &enc_contributors(&self.contributors),
            &C::g2_to_bytes(&self.value),
        ])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 2)?;
        Ok(ServerSecretShare {
            contributors: dec_contributors(&parts[0])?,
            value: C::g2_from_bytes(&parts[1])?,
        })
    }
}

impl<C: PairingCurve> Wire for ClientSecretShare<C> {
    fn encode(&self) -> Vec<u8> {
        encode_parts(&[&enc_contributors(&self.contributors), self.value.as_bytes()])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 2)?;
        Ok(ClientSecretShare {
            contributors: dec_contributors(&parts[0])?,
            value: SecretG1::from_bytes(&parts[1])?,
        })
    }
}

impl<C: PairingCurve> Wire for TimePermitShare<C> {
    fn encode(&self) -> Vec<u8> {
        encode_parts(&[
            &enc_contributors(&self.contributors),
            &self.date.to_be_bytes(),
            &C::g1_to_bytes(&self.value),
        ])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 3)?;
        Ok(TimePermitShare {
            contributors: dec_contributors(&parts[0])?,
            date: dec_u32(&parts[1])?,
            value: C::g1_from_bytes(&parts[2])?,
        })
    }
}

impl<C: PairingCurve> Wire for ServerSecret<C> {
    fn encode(&self) -> Vec<u8> {
        C::g2_to_bytes(&self.0)
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Ok(ServerSecret(C::g2_from_bytes(bytes)?))
    }
}

impl<C: PairingCurve> Wire for ClientSecret<C> {
    fn encode(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Ok(ClientSecret(SecretG1::from_bytes(bytes)?))
    }
}

impl<C: PairingCurve> Wire for TimePermit<C> {
    fn encode(&self) -> Vec<u8> {
        encode_parts(&[&self.date.to_be_bytes(), &C::g1_to_bytes(&self.value)])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 2)?;
        Ok(TimePermit {
            date: dec_u32(&parts[0])?,
            value: C::g1_from_bytes(&parts[1])?,
        })
    }
}

impl<C: PairingCurve> Wire for Token<C> {
    fn encode(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Token::from_bytes(bytes)
    }
}

impl<C: PairingCurve> Wire for DvsPublicKey<C> {
    fn encode(&self) -> Vec<u8> {
        self.to_bytes()
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        DvsPublicKey::from_bytes(bytes)
    }
}

impl<C: PairingCurve> Wire for PinErrorHelpers<C> {
    fn encode(&self) -> Vec<u8> {
        encode_parts(&[&C::gt_to_bytes(&self.e), &C::gt_to_bytes(&self.f)])
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        let parts = dec_tuple(bytes, 2)?;
        Ok(PinErrorHelpers {
            e: C::gt_from_bytes(&parts[0])?,
            f: C::gt_from_bytes(&parts[1])?,
        })
    }
}
