use mpin::encoding::{dec_tuple, enc_len, enc_tuple};
use mpin::rng::create_csprng;
use mpin::types::{Error, Params, Wire, epoch_time, today, validate_params};
use rand_core::RngCore;

#[test]
fn enc_len_rejects_oversize() {
    let big = (u32::MAX as usize) + 1;
    assert!(enc_len(big).is_err());
}

#[test]
fn dec_tuple_rejects_trailing_bytes() {
    let mut bytes = enc_tuple(&[b"a".as_slice(), b"bc".as_slice()]).expect("encode");
    assert_eq!(dec_tuple(&bytes, 2).expect("decode"), vec![b"a".to_vec(), b"bc".to_vec()]);
    bytes.push(0);
    assert_eq!(dec_tuple(&bytes, 2).unwrap_err(), Error::MalformedInput);
    assert_eq!(dec_tuple(&bytes[..3], 1).unwrap_err(), Error::MalformedInput);
}

#[test]
fn invalid_params_rejected() {
    assert!(validate_params(Params::default()).is_ok());
    for params in [
        Params::with_authorities(0),
        Params {
            max_pin: 1,
            ..Params::default()
        },
        Params {
            kangaroo_table: 33,
            ..Params::default()
        },
        Params {
            kangaroo_trap: 0,
            ..Params::default()
        },
    ] {
        assert_eq!(validate_params(params), Err(Error::InvalidParams));
    }
}

#[test]
fn params_load_from_json_and_wire() {
    let json = r#"{"authorities":3,"max_pin":100000,"kangaroo_table":7,"kangaroo_trap":4000}"#;
    let params: Params = serde_json::from_str(json).expect("json");
    assert_eq!(params.authorities, 3);
    assert_eq!(Params::decode(&params.encode()), Ok(params));
}

#[test]
fn seeded_csprng_is_deterministic() {
    let mut a = create_csprng(b"seed");
    let mut b = create_csprng(b"seed");
    let mut c = create_csprng(b"other seed");
    let (x, y, z) = (a.next_u64(), b.next_u64(), c.next_u64());
    assert_eq!(x, y);
    assert_ne!(x, z);
}

#[test]
fn today_follows_clock() {
    let day = u64::from(today());
    let now = epoch_time();
    assert!(day == now / 86_400 || day + 1 == now / 86_400);
}
