use mpin::identity::hash_id;
use mpin::rng::create_csprng;
use mpin::sharing::{
    ClientSecretShare, Combine, MasterSecretShare, ServerSecret, ServerSecretShare, TimePermit,
    TimePermitShare, combine_all, share_client_secret, share_server_secret, share_time_permit,
};
use mpin::types::{Error, Params, Wire};
use mpin::Bls12381;

type C = Bls12381;

fn masters(n: u32, seed: &[u8]) -> Vec<MasterSecretShare<C>> {
    let mut rng = create_csprng(seed);
    (1..=n)
        .map(|id| MasterSecretShare::random(id, &mut rng).expect("master share"))
        .collect()
}

#[test]
fn server_secret_is_order_independent() {
    let params = Params::with_authorities(3);
    let masters = masters(3, b"order");
    let shares: Vec<ServerSecretShare<C>> = masters.iter().map(share_server_secret).collect();
    let forward = ServerSecret::from_shares(&params, &shares).expect("forward");
    let reversed: Vec<_> = shares.iter().rev().cloned().collect();
    let backward = ServerSecret::from_shares(&params, &reversed).expect("backward");
    assert_eq!(forward, backward);

    let nested = shares[2]
        .combine(&shares[0].combine(&shares[1]).expect("inner"))
        .expect("outer");
    assert_eq!(nested.contributors, vec![1, 2, 3]);
    assert_eq!(nested.value, *forward.point());
}

#[test]
fn client_shares_combine_in_any_order() {
    let masters = masters(2, b"client");
    let hid = hash_id(b"alice@example.com");
    let a = share_client_secret(&masters[0], &hid);
    let b = share_client_secret(&masters[1], &hid);
    let ab = a.combine(&b).expect("ab");
    let ba = b.combine(&a).expect("ba");
    assert_eq!(ab.encode(), ba.encode());
}

#[test]
fn duplicate_share_rejected() {
    let masters = masters(2, b"dup");
    let share = share_server_secret(&masters[0]);
    assert_eq!(share.combine(&share).unwrap_err(), Error::InvalidShare);

    let params = Params::with_authorities(2);
    let res = ServerSecret::from_shares(&params, &[share.clone(), share]);
    assert_eq!(res.unwrap_err(), Error::InvalidShare);
}

#[test]
fn missing_authority_rejected() {
    let params = Params::with_authorities(3);
    let masters = masters(3, b"partial");
    let shares: Vec<ServerSecretShare<C>> =
        masters.iter().take(2).map(share_server_secret).collect();
    assert_eq!(
        ServerSecret::from_shares(&params, &shares).unwrap_err(),
        Error::InvalidShare
    );
}

#[test]
fn empty_share_set_rejected() {
    let shares: Vec<ClientSecretShare<C>> = Vec::new();
    assert!(matches!(combine_all(&shares), Err(Error::InvalidShare)));
}

#[test]
fn permit_dates_must_agree() {
    let params = Params::with_authorities(2);
    let masters = masters(2, b"dates");
    let hid = hash_id(b"bob");
    let shares = vec![
        share_time_permit(&masters[0], 19_000, &hid),
        share_time_permit(&masters[1], 19_001, &hid),
    ];
    assert_eq!(
        TimePermit::from_shares(&params, &shares).unwrap_err(),
        Error::BadTimePermitOrDate
    );
}

#[test]
fn authority_zero_rejected() {
    let mut rng = create_csprng(b"zero");
    assert!(matches!(
        MasterSecretShare::<C>::random(0, &mut rng),
        Err(Error::InvalidParams)
    ));
}

#[test]
fn share_encoding_survives_transport() {
    let masters = masters(2, b"wire");
    let hid = hash_id(b"carol");
    let share = share_time_permit(&masters[1], 20_000, &hid);
    let decoded = TimePermitShare::<C>::decode(&share.encode()).expect("decode");
    assert_eq!(decoded.contributors, vec![2]);
    assert_eq!(decoded.date, 20_000);
    assert_eq!(decoded.value, share.value);

    let mut bad = share.encode();
    bad.truncate(bad.len() - 1);
    assert_eq!(
        TimePermitShare::<C>::decode(&bad).unwrap_err(),
        Error::MalformedInput
    );
}

#[test]
fn server_secret_debug_is_redacted() {
    let params = Params::with_authorities(2);
    let shares: Vec<_> = masters(2, b"redact").iter().map(share_server_secret).collect();
    let secret = ServerSecret::from_shares(&params, &shares).expect("server secret");
    let printed = format!("{secret:?}");
    assert_eq!(printed, "ServerSecret(..)");
    assert!(!printed.contains(&format!("{:?}", secret.point())));
}
