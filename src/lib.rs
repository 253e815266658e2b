#![forbid(unsafe_code)]

pub mod aead;
pub mod client;
pub mod curve;
pub mod dvs;
pub mod encoding;
pub mod full;
pub mod identity;
pub mod kangaroo;
pub mod kdf;
pub mod logging;
pub mod rng;
pub mod secret;
pub mod server;
pub mod sharing;
pub mod token;
pub mod transcript;
pub mod types;
mod wire_impls;

pub use crate::client::{AuthRequest, ClientInput, ClientProof, Pass1Message};
pub use crate::curve::{Bls12381, CurveConfig, PairingCurve};
pub use crate::identity::{HashedId, ServerIdentity, hash_id};
pub use crate::rng::Nonce;
pub use crate::secret::{SecretScalar, SessionKey};
pub use crate::server::{AuthStatus, PinErrorHelpers, Verification, VerifyOptions};
pub use crate::token::{Token, extract_pin};
pub use crate::types::{EpochDate, Error, Params, PartyId, Wire};
