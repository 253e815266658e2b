//! End-to-end M-Pin walk-through on BLS12-381.
//!
//! 1. **Enrolment**:
//!    - Two authorities each draw a master share `sᵢ`.
//!    - Each issues `sᵢ·Q` to the server, `sᵢ·A` to the client (`A = map(H(ID))`)
//!      and a time permit `sᵢ·map(date ‖ H(ID))` for today.
//!    - The client combines its shares and removes the PIN: `Token = s·A − PIN·A`.
//! 2. **One-pass authentication**:
//!    - The client commits to `x`, derives `y` from the clock and signs with
//!      `V = −(x + y)·SEC`.
//!    - The server checks a pairing product against `sQ`.
//! 3. **Wrong PIN**:
//!    - The server returns helpers `E`, `F`; the kangaroo walk recovers the
//!      offset between the entered and the enrolled PIN.
//! 4. **M-Pin Full**:
//!    - Both sides derive a session key from `Z = r·A`, `T = w·HTID` and the
//!      transcript hash, then exchange an AEAD-sealed message.

use mpin::aead;
use mpin::client::{self, ClientInput};
use mpin::full;
use mpin::identity::{ServerIdentity, hash_id, map_id};
use mpin::kangaroo;
use mpin::rng::{Nonce, os_csprng};
use mpin::server::{self, AuthStatus, VerifyOptions};
use mpin::sharing::{
    ClientSecret, MasterSecretShare, ServerSecret, TimePermit, share_client_secret,
    share_server_secret, share_time_permit,
};
use mpin::token::extract_pin;
use mpin::transcript::hash_all;
use mpin::types::{Params, epoch_time, today};
use mpin::Bls12381;

type C = Bls12381;

fn main() {
    mpin::logging::init_tracing(Some("mpin=debug"));

    let params = Params::default();
    let id = b"demo@example.com";
    let pin = 4242;
    let date = today();
    let mut rng = os_csprng();

    // Enrolment.
    let masters: Vec<MasterSecretShare<C>> = (1..=params.authorities)
        .map(|a| MasterSecretShare::random(a, &mut rng).expect("master share"))
        .collect();
    let hid = hash_id(id);
    let server_shares: Vec<_> = masters.iter().map(share_server_secret).collect();
    let client_shares: Vec<_> = masters.iter().map(|m| share_client_secret(m, &hid)).collect();
    let permit_shares: Vec<_> = masters
        .iter()
        .map(|m| share_time_permit(m, date, &hid))
        .collect();

    let server_secret = ServerSecret::from_shares(&params, &server_shares).expect("server secret");
    let client_secret = ClientSecret::from_shares(&params, &client_shares).expect("client secret");
    let permit = TimePermit::from_shares(&params, &permit_shares).expect("time permit");
    let token = extract_pin(&params, id, pin, client_secret).expect("extract pin");

    // One-pass authentication with the right PIN.
    let input = ClientInput {
        id,
        pin,
        token: &token,
        permit: Some(&permit),
    };
    let proof = client::one_pass(&params, &input, None, epoch_time(), Nonce::Draw(&mut rng))
        .expect("client proof");
    let verification = server::one_pass(
        &params,
        &server_secret,
        ServerIdentity::Plain(id),
        Some(date),
        &proof.request,
        &VerifyOptions::default(),
    )
    .expect("verify");
    assert_eq!(verification.status, AuthStatus::Success);
    println!("correct pin: {:?}", verification.status);

    // Wrong PIN, with helpers for error recovery.
    let wrong = ClientInput {
        pin: pin + 17,
        ..input
    };
    let bad = client::one_pass(&params, &wrong, None, epoch_time(), Nonce::Draw(&mut rng))
        .expect("client proof");
    let options = VerifyOptions {
        want_helpers: true,
        ..VerifyOptions::default()
    };
    let rejected = server::one_pass(
        &params,
        &server_secret,
        ServerIdentity::Plain(id),
        Some(date),
        &bad.request,
        &options,
    )
    .expect("verify");
    let helpers = rejected.helpers.expect("helpers");
    let error = kangaroo::recover(&params, &helpers).expect("recover");
    println!("wrong pin: {:?}, off by {error}", rejected.status);

    // M-Pin Full.
    let pre = full::precompute(&token, id, None).expect("precompute");
    let (r, z) = full::g1_multiple(Nonce::Draw(&mut rng), &map_id::<C>(&hid));
    let htid = verification.htid.expect("permit in use");
    let (w, t) = full::g1_multiple(Nonce::Draw(&mut rng), &htid);
    let req = &proof.request;
    let hm = hash_all::<C>(&hid, &req.u, req.ut.as_ref(), &req.v, &proof.y, &z, &t);

    let server_key = full::server_key(
        &z,
        &server_secret,
        &w,
        &hm,
        &verification.hid,
        &req.u,
        req.ut.as_ref(),
    )
    .expect("server key");
    let client_key = full::client_key(&params, &pre, pin, &r, &proof.x, &hm, &t).expect("client key");

    let sealed = aead::seal(&client_key, &mut rng, b"hello", b"mpin-demo").expect("seal");
    let opened = aead::open(&server_key, &sealed, b"mpin-demo").expect("open");
    assert_eq!(opened, b"hello");
    println!("ok: {}", String::from_utf8_lossy(&opened));
}
