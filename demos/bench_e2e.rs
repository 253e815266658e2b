//! End-to-end timing: enrolment, a burst of one-pass authentications, PIN
//! recovery and key agreement.

use std::time::Instant;

use mpin::client::{self, AuthRequest, ClientInput};
use mpin::full;
use mpin::identity::{ServerIdentity, hash_id, map_id};
use mpin::kangaroo;
use mpin::rng::{Nonce, create_csprng};
use mpin::server::{self, BatchItem, VerifyOptions};
use mpin::sharing::{
    ClientSecret, MasterSecretShare, ServerSecret, TimePermit, share_client_secret,
    share_server_secret, share_time_permit,
};
use mpin::token::{Token, extract_pin};
use mpin::transcript::hash_all;
use mpin::types::{Params, today};
use mpin::Bls12381;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type C = Bls12381;

struct User {
    id: Vec<u8>,
    pin: u32,
    token: Token<C>,
    permit: TimePermit<C>,
}

fn main() {
    let params = Params::with_authorities(5);
    let users = 64u32;
    let attempts = 1024u32;
    let date = today();

    println!(
        "e2e timing: authorities={}, users={users}, attempts={attempts}",
        params.authorities
    );
    println!();

    let start = Instant::now();
    let mut rng = create_csprng(b"bench-e2e");
    let masters: Vec<MasterSecretShare<C>> = (1..=params.authorities)
        .map(|a| MasterSecretShare::random(a, &mut rng).expect("master share"))
        .collect();
    let server_shares: Vec<_> = masters.iter().map(share_server_secret).collect();
    let server_secret = ServerSecret::from_shares(&params, &server_shares).expect("server secret");
    println!("setup.server_secret: {:?}", start.elapsed());

    let start = Instant::now();
    let enrol = |n: u32| {
        let id = format!("user-{n}").into_bytes();
        let hid = hash_id(&id);
        let cs: Vec<_> = masters.iter().map(|m| share_client_secret(m, &hid)).collect();
        let tp: Vec<_> = masters
            .iter()
            .map(|m| share_time_permit(m, date, &hid))
            .collect();
        let client_secret = ClientSecret::from_shares(&params, &cs).expect("client secret");
        let pin = n % params.max_pin;
        User {
            token: extract_pin(&params, &id, pin, client_secret).expect("extract pin"),
            permit: TimePermit::from_shares(&params, &tp).expect("time permit"),
            id,
            pin,
        }
    };
    #[cfg(feature = "parallel")]
    let users: Vec<User> = (0..users).into_par_iter().map(enrol).collect();
    #[cfg(not(feature = "parallel"))]
    let users: Vec<User> = (0..users).map(enrol).collect();
    println!("setup.enrol_users: {:?}", start.elapsed());

    let start = Instant::now();
    let build = |n: u32| {
        let user = &users[(n as usize) % users.len()];
        let mut rng = create_csprng(&n.to_be_bytes());
        let input = ClientInput {
            id: &user.id,
            pin: user.pin,
            token: &user.token,
            permit: Some(&user.permit),
        };
        client::one_pass(&params, &input, None, u64::from(n), Nonce::Draw(&mut rng))
            .expect("client proof")
            .request
    };
    #[cfg(feature = "parallel")]
    let requests: Vec<AuthRequest<C>> = (0..attempts).into_par_iter().map(build).collect();
    #[cfg(not(feature = "parallel"))]
    let requests: Vec<AuthRequest<C>> = (0..attempts).map(build).collect();
    println!("client.one_pass x{attempts}: {:?}", start.elapsed());

    let items: Vec<BatchItem<'_, C>> = requests
        .iter()
        .enumerate()
        .map(|(n, request)| BatchItem {
            identity: ServerIdentity::Plain(&users[n % users.len()].id),
            request,
            options: VerifyOptions::default(),
        })
        .collect();
    let start = Instant::now();
    let results =
        server::verify_batch(&params, &server_secret, Some(date), &items).expect("verify batch");
    let accepted = results.iter().filter(|v| v.status.is_success()).count();
    println!(
        "server.verify_batch x{attempts}: {:?} ({accepted} accepted)",
        start.elapsed()
    );

    let user = &users[1];
    let input = ClientInput {
        id: &user.id,
        pin: user.pin + 999,
        token: &user.token,
        permit: Some(&user.permit),
    };
    let bad = client::one_pass(&params, &input, None, 0, Nonce::Draw(&mut rng)).expect("proof");
    let options = VerifyOptions {
        want_helpers: true,
        ..VerifyOptions::default()
    };
    let rejected = server::one_pass(
        &params,
        &server_secret,
        ServerIdentity::Plain(&user.id),
        Some(date),
        &bad.request,
        &options,
    )
    .expect("verify");
    let helpers = rejected.helpers.expect("helpers");
    let start = Instant::now();
    let error = kangaroo::recover(&params, &helpers).expect("recover");
    println!("kangaroo.recover ({error}): {:?}", start.elapsed());

    let start = Instant::now();
    let input = ClientInput {
        pin: user.pin,
        ..input
    };
    let proof = client::one_pass(&params, &input, None, 1, Nonce::Draw(&mut rng)).expect("proof");
    let v = server::one_pass(
        &params,
        &server_secret,
        ServerIdentity::Plain(&user.id),
        Some(date),
        &proof.request,
        &VerifyOptions::default(),
    )
    .expect("verify");
    let hid = hash_id(&user.id);
    let pre = full::precompute(&user.token, &user.id, None).expect("precompute");
    let (r, z) = full::g1_multiple(Nonce::Draw(&mut rng), &map_id::<C>(&hid));
    let (w, t) = full::g1_multiple(Nonce::Draw(&mut rng), &v.htid.unwrap_or(v.hid));
    let req = &proof.request;
    let hm = hash_all::<C>(&hid, &req.u, req.ut.as_ref(), &req.v, &proof.y, &z, &t);
    let server_key =
        full::server_key(&z, &server_secret, &w, &hm, &v.hid, &req.u, req.ut.as_ref())
            .expect("server key");
    let client_key =
        full::client_key(&params, &pre, user.pin, &r, &proof.x, &hm, &t).expect("client key");
    assert_eq!(server_key, client_key);
    println!("full.key_agreement: {:?}", start.elapsed());
}
