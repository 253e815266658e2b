use mpin::client::{self, AuthRequest, ClientInput, Pass1Message};
use mpin::identity::{HashedId, ServerIdentity, hash_id};
use mpin::rng::{Nonce, create_csprng};
use mpin::secret::SecretScalar;
use mpin::server::{self, VerifyOptions};
use mpin::sharing::{
    ClientSecret, MasterSecretShare, ServerSecret, share_client_secret, share_server_secret,
};
use mpin::token::{Token, extract_pin};
use mpin::types::{Error, Params, Wire};
use mpin::{Bls12381, PairingCurve};

type C = Bls12381;

const ID: &[u8] = b"grace@example.com";

fn setup(params: &Params) -> (ServerSecret<C>, ClientSecret<C>) {
    let mut rng = create_csprng(b"negative");
    let masters: Vec<MasterSecretShare<C>> = (1..=params.authorities)
        .map(|id| MasterSecretShare::random(id, &mut rng).expect("master share"))
        .collect();
    let hid = hash_id(ID);
    let server_shares: Vec<_> = masters.iter().map(share_server_secret).collect();
    let client_shares: Vec<_> = masters.iter().map(|m| share_client_secret(m, &hid)).collect();
    (
        ServerSecret::from_shares(params, &server_shares).expect("server secret"),
        ClientSecret::from_shares(params, &client_shares).expect("client secret"),
    )
}

#[test]
fn pin_out_of_range_rejected_at_extraction() {
    let params = Params::default();
    let (_, client_secret) = setup(&params);
    let res = extract_pin(&params, ID, params.max_pin, client_secret);
    assert!(matches!(res, Err(Error::InvalidParams)));
}

#[test]
fn pin_out_of_range_rejected_by_client() {
    let params = Params::default();
    let (_, client_secret) = setup(&params);
    let token = extract_pin(&params, ID, 0, client_secret).expect("extract pin");
    let input = ClientInput {
        id: ID,
        pin: params.max_pin + 3,
        token: &token,
        permit: None,
    };
    let mut rng = create_csprng(b"client");
    let res = client::one_pass(&params, &input, None, 0, Nonce::Draw(&mut rng));
    assert!(matches!(res, Err(Error::InvalidParams)));
}

#[test]
fn server_rejects_invalid_params() {
    let params = Params::default();
    let (server_secret, client_secret) = setup(&params);
    let token = extract_pin(&params, ID, 9, client_secret).expect("extract pin");
    let input = ClientInput {
        id: ID,
        pin: 9,
        token: &token,
        permit: None,
    };
    let mut rng = create_csprng(b"params");
    let proof = client::one_pass(&params, &input, None, 0, Nonce::Draw(&mut rng)).expect("proof");
    let res = server::one_pass(
        &Params::with_authorities(0),
        &server_secret,
        ServerIdentity::Plain(ID),
        None,
        &proof.request,
        &VerifyOptions::default(),
    );
    assert!(matches!(res, Err(Error::InvalidParams)));
}

#[test]
fn wrong_length_encodings_rejected() {
    let cfg = C::CONFIG;
    assert_eq!(
        Token::<C>::decode(&vec![0u8; cfg.g1_bytes - 1]).unwrap_err(),
        Error::MalformedInput
    );
    assert_eq!(
        ServerSecret::<C>::decode(&vec![0u8; cfg.g2_bytes + 1]).unwrap_err(),
        Error::MalformedInput
    );
    assert_eq!(
        HashedId::decode(&[0u8; 31]).unwrap_err(),
        Error::MalformedInput
    );
    assert!(matches!(
        SecretScalar::<C>::from_bytes(&[1u8; 31]),
        Err(Error::MalformedInput)
    ));
}

#[test]
fn off_curve_point_rejected() {
    // Compressed flag set, x = 0xff..ff is not a valid field element.
    let mut bytes = vec![0xffu8; C::CONFIG.g1_bytes];
    bytes[0] = 0x9f;
    assert!(matches!(Token::<C>::decode(&bytes), Err(Error::MalformedInput)));
    assert_eq!(C::g1_from_bytes(&bytes).unwrap_err(), Error::MalformedInput);
}

#[test]
fn non_canonical_scalar_rejected() {
    let bytes = [0xffu8; 32];
    assert!(matches!(
        SecretScalar::<C>::from_bytes(&bytes),
        Err(Error::MalformedInput)
    ));
}

#[test]
fn truncated_messages_rejected() {
    let params = Params::default();
    let (_, client_secret) = setup(&params);
    let token = extract_pin(&params, ID, 77, client_secret).expect("extract pin");
    let input = ClientInput {
        id: ID,
        pin: 77,
        token: &token,
        permit: None,
    };
    let mut rng = create_csprng(b"truncate");
    let proof = client::one_pass(&params, &input, None, 0, Nonce::Draw(&mut rng)).expect("proof");
    let bytes = proof.request.encode();
    assert_eq!(
        AuthRequest::<C>::decode(&bytes[..bytes.len() - 1]).unwrap_err(),
        Error::MalformedInput
    );

    let (_, msg) = client::first_pass(&params, &input, Nonce::Draw(&mut rng)).expect("pass 1");
    let bytes = msg.encode();
    assert_eq!(
        Pass1Message::<C>::decode(&bytes[4..]).unwrap_err(),
        Error::MalformedInput
    );
}

#[test]
fn curve_sizes_match_encodings() {
    let cfg = C::CONFIG;
    let g1 = <C as PairingCurve>::hash_to_g1(b"sample", b"SIZE-CHECK");
    assert_eq!(C::g1_to_bytes(&g1).len(), cfg.g1_bytes);
    let scalar = <C as PairingCurve>::Scalar::from(5u64);
    assert_eq!(C::scalar_to_bytes(&scalar).len(), cfg.scalar_bytes);
    let gt = C::pairing(&g1, &group::Group::generator());
    assert_eq!(C::gt_to_bytes(&gt).len(), cfg.gt_bytes);
    assert_eq!(C::gt_from_bytes(&C::gt_to_bytes(&gt)), Ok(gt));
}

#[test]
fn gt_identity_has_fixed_encoding() {
    let identity = <<C as PairingCurve>::Gt as group::Group>::identity();
    let bytes = C::gt_to_bytes(&identity);
    assert_eq!(bytes, vec![0u8; C::CONFIG.gt_bytes]);
    assert_eq!(C::gt_from_bytes(&bytes), Ok(identity));
}
