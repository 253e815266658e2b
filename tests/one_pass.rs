use mpin::client::{self, AuthRequest, ClientInput};
use mpin::identity::{ServerIdentity, hash_id};
use mpin::rng::{Nonce, create_csprng};
use mpin::secret::SecretScalar;
use mpin::server::{self, AuthStatus, VerifyOptions};
use mpin::sharing::{
    ClientSecret, MasterSecretShare, ServerSecret, TimePermit, share_client_secret,
    share_server_secret, share_time_permit,
};
use mpin::token::{Token, extract_pin};
use mpin::types::{EpochDate, Error, Params, Wire};
use mpin::{Bls12381, PairingCurve};

type C = Bls12381;

const ID: &[u8] = b"alice@example.com";
const PIN: u32 = 1234;
const DATE: EpochDate = 19_700;
const NOW: u64 = 1_702_080_000;

struct Enrolled {
    params: Params,
    server: ServerSecret<C>,
    token: Token<C>,
    permit: TimePermit<C>,
}

fn enrol(seed: &[u8]) -> Enrolled {
    let params = Params::default();
    let mut rng = create_csprng(seed);
    let masters: Vec<MasterSecretShare<C>> = (1..=params.authorities)
        .map(|id| MasterSecretShare::random(id, &mut rng).expect("master share"))
        .collect();
    let hid = hash_id(ID);
    let server_shares: Vec<_> = masters.iter().map(share_server_secret).collect();
    let client_shares: Vec<_> = masters.iter().map(|m| share_client_secret(m, &hid)).collect();
    let permit_shares: Vec<_> = masters
        .iter()
        .map(|m| share_time_permit(m, DATE, &hid))
        .collect();

    let server = ServerSecret::from_shares(&params, &server_shares).expect("server secret");
    let client_secret = ClientSecret::from_shares(&params, &client_shares).expect("client secret");
    let permit = TimePermit::from_shares(&params, &permit_shares).expect("time permit");
    let token = extract_pin(&params, ID, PIN, client_secret).expect("extract pin");
    Enrolled {
        params,
        server,
        token,
        permit,
    }
}

fn request(
    e: &Enrolled,
    pin: u32,
    permit: Option<&TimePermit<C>>,
    message: Option<&[u8]>,
    seed: &[u8],
) -> AuthRequest<C> {
    let input = ClientInput {
        id: ID,
        pin,
        token: &e.token,
        permit,
    };
    let mut rng = create_csprng(seed);
    client::one_pass(&e.params, &input, message, NOW, Nonce::Draw(&mut rng))
        .expect("client proof")
        .request
}

fn verify(
    e: &Enrolled,
    date: Option<EpochDate>,
    req: &AuthRequest<C>,
    message: Option<&[u8]>,
) -> AuthStatus {
    let options = VerifyOptions {
        message,
        ..VerifyOptions::default()
    };
    server::one_pass(&e.params, &e.server, ServerIdentity::Plain(ID), date, req, &options)
        .expect("verify")
        .status
}

#[test]
fn correct_pin_with_time_permit_succeeds() {
    let e = enrol(b"permit");
    let req = request(&e, PIN, Some(&e.permit), None, b"x1");
    assert_eq!(req.date, Some(DATE));
    assert!(req.ut.is_some());
    assert_eq!(verify(&e, Some(DATE), &req, None), AuthStatus::Success);
}

#[test]
fn correct_pin_without_time_permit_succeeds() {
    let e = enrol(b"plain");
    let req = request(&e, PIN, None, None, b"x2");
    assert_eq!(req.date, None);
    assert_eq!(verify(&e, None, &req, None), AuthStatus::Success);
}

#[test]
fn wrong_pin_is_bad_pin() {
    let e = enrol(b"wrong");
    let req = request(&e, PIN + 1, Some(&e.permit), None, b"x3");
    assert_eq!(verify(&e, Some(DATE), &req, None), AuthStatus::BadPin);
}

#[test]
fn other_date_is_bad_time_permit() {
    let e = enrol(b"date");
    let req = request(&e, PIN, Some(&e.permit), None, b"x4");
    assert_eq!(
        verify(&e, Some(DATE + 1), &req, None),
        AuthStatus::BadTimePermitOrDate
    );
}

#[test]
fn permit_presence_must_match_server_mode() {
    let e = enrol(b"mode");
    let with_permit = request(&e, PIN, Some(&e.permit), None, b"x5");
    assert_eq!(
        verify(&e, None, &with_permit, None),
        AuthStatus::BadTimePermitOrDate
    );
    let without_permit = request(&e, PIN, None, None, b"x6");
    assert_eq!(
        verify(&e, Some(DATE), &without_permit, None),
        AuthStatus::BadTimePermitOrDate
    );
}

#[test]
fn stripped_commitment_is_bad_time_permit() {
    let e = enrol(b"strip");
    let mut req = request(&e, PIN, Some(&e.permit), None, b"x7");
    req.ut = None;
    assert_eq!(
        verify(&e, Some(DATE), &req, None),
        AuthStatus::BadTimePermitOrDate
    );
}

#[test]
fn signed_message_is_bound() {
    let e = enrol(b"sign");
    let req = request(&e, PIN, Some(&e.permit), Some(b"pay 10".as_slice()), b"x8");
    assert_eq!(
        verify(&e, Some(DATE), &req, Some(b"pay 10".as_slice())),
        AuthStatus::Success
    );
    assert_eq!(
        verify(&e, Some(DATE), &req, Some(b"pay 99".as_slice())),
        AuthStatus::BadPin
    );
    assert_eq!(verify(&e, Some(DATE), &req, None), AuthStatus::BadPin);
}

#[test]
fn replayed_request_with_other_time_fails() {
    let e = enrol(b"time");
    let mut req = request(&e, PIN, None, None, b"x9");
    req.epoch_time += 1;
    assert_eq!(verify(&e, None, &req, None), AuthStatus::BadPin);
}

#[test]
fn hashed_identity_mode_matches_plain() {
    let e = enrol(b"anon");
    let req = request(&e, PIN, Some(&e.permit), None, b"x10");
    let hid = hash_id(ID);
    let v = server::one_pass(
        &e.params,
        &e.server,
        ServerIdentity::Hashed(&hid),
        Some(DATE),
        &req,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.status, AuthStatus::Success);
    assert!(v.into_result().is_ok());
}

#[test]
fn other_identity_fails() {
    let e = enrol(b"imposter");
    let req = request(&e, PIN, None, None, b"x11");
    let v = server::one_pass(
        &e.params,
        &e.server,
        ServerIdentity::Plain(b"mallory@example.com"),
        None,
        &req,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.into_result().unwrap_err(), Error::BadPin);
}

#[test]
fn token_from_other_master_secret_fails() {
    let e = enrol(b"master-a");
    let other = enrol(b"master-b");
    let req = request(&other, PIN, None, None, b"x12");
    assert_eq!(verify(&e, None, &req, None), AuthStatus::BadPin);
}

#[test]
fn provided_nonce_is_deterministic() {
    let e = enrol(b"fixed");
    let input = ClientInput {
        id: ID,
        pin: PIN,
        token: &e.token,
        permit: Some(&e.permit),
    };
    let x = <C as PairingCurve>::Scalar::from(42u64);
    let a = client::one_pass(&e.params, &input, None, NOW, Nonce::Provided(SecretScalar::new(x)))
        .expect("first");
    let b = client::one_pass(&e.params, &input, None, NOW, Nonce::Provided(SecretScalar::new(x)))
        .expect("second");
    assert_eq!(a.request, b.request);
    assert_eq!(a.y, b.y);
    assert_eq!(*a.x.expose(), x);
}

#[test]
fn encoded_request_verifies() {
    let e = enrol(b"encoded");
    let req = request(&e, PIN, Some(&e.permit), None, b"x13");
    let v = server::one_pass_encoded(
        &e.params,
        &e.server,
        ServerIdentity::Plain(ID),
        Some(DATE),
        &req.encode(),
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.status, AuthStatus::Success);
}

#[test]
fn garbage_request_is_malformed() {
    let e = enrol(b"garbage");
    let req = request(&e, PIN, None, None, b"x14");
    let mut bytes = req.encode();
    bytes.push(0);
    let v = server::one_pass_encoded(
        &e.params,
        &e.server,
        ServerIdentity::Plain(ID),
        None,
        &bytes,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.status, AuthStatus::MalformedInput);
    assert_eq!(v.into_result().unwrap_err(), Error::MalformedInput);
}

#[test]
fn two_pass_round_trip() {
    let e = enrol(b"two-pass");
    let input = ClientInput {
        id: ID,
        pin: PIN,
        token: &e.token,
        permit: Some(&e.permit),
    };
    let mut client_rng = create_csprng(b"client");
    let mut server_rng = create_csprng(b"server");

    let (state, msg) =
        client::first_pass(&e.params, &input, Nonce::Draw(&mut client_rng)).expect("pass 1");
    let msg = client::Pass1Message::<C>::decode(&msg.encode()).expect("transport");
    let pass1 = server::first_pass::<C>(Some(DATE), ServerIdentity::Plain(ID));
    let y = server::challenge::<C>(&mut server_rng);
    let answer = client::second_pass(state, &y).expect("pass 2");

    let v = server::second_pass(
        &e.params,
        &e.server,
        &pass1,
        &msg,
        &y,
        &answer.v,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.status, AuthStatus::Success);
    assert_eq!(v.y, y);
}

#[test]
fn two_pass_rejects_answer_to_other_challenge() {
    let e = enrol(b"two-pass-bad");
    let input = ClientInput {
        id: ID,
        pin: PIN,
        token: &e.token,
        permit: None,
    };
    let mut rng = create_csprng(b"both");
    let (state, msg) =
        client::first_pass(&e.params, &input, Nonce::Draw(&mut rng)).expect("pass 1");
    let pass1 = server::first_pass::<C>(None, ServerIdentity::Plain(ID));
    let y = server::challenge::<C>(&mut rng);
    let other = server::challenge::<C>(&mut rng);
    let answer = client::second_pass(state, &other).expect("pass 2");
    let v = server::second_pass(
        &e.params,
        &e.server,
        &pass1,
        &msg,
        &y,
        &answer.v,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(v.status, AuthStatus::BadPin);
}
