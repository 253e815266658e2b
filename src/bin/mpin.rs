use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use mpin::client::{self, ClientInput};
use mpin::identity::{ServerIdentity, hash_id};
use mpin::kangaroo;
use mpin::rng::{Nonce, os_csprng};
use mpin::server::{self, PinErrorHelpers, VerifyOptions};
use mpin::sharing::{
    ClientSecret, ClientSecretShare, MasterSecretShare, ServerSecret, ServerSecretShare,
    TimePermit, TimePermitShare, share_client_secret, share_server_secret, share_time_permit,
};
use mpin::token::{Token, extract_pin};
use mpin::types::{EpochDate, Error, Params, Wire, epoch_time, today};
use mpin::{Bls12381, PairingCurve};
use serde::{Deserialize, Serialize};

type C = Bls12381;

#[derive(Debug, Serialize, Deserialize)]
struct VerificationJson {
    status: String,
    date: Option<EpochDate>,
    y_b64: String,
    helpers_b64: Option<String>,
}

fn main() {
    mpin::logging::init_tracing(None);

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        usage();
        return;
    }
    let cmd = &args[0];
    let rest = &args[1..];

    match cmd.as_str() {
        "master-secret" => cmd_master_secret(rest),
        "server-secret" => cmd_server_secret(rest),
        "client-secret" => cmd_client_secret(rest),
        "time-permit" => cmd_time_permit(rest),
        "combine-server" => cmd_combine_server(rest),
        "combine-client" => cmd_combine_client(rest),
        "combine-permit" => cmd_combine_permit(rest),
        "extract-pin" => cmd_extract_pin(rest),
        "client" => cmd_client(rest),
        "server" => cmd_server(rest),
        "kangaroo" => cmd_kangaroo(rest),
        _ => usage(),
    }
}

fn usage() {
    eprintln!("mpin <cmd> [args]\n");
    eprintln!("Every command accepts --params <json> (or --n <authorities>).\n");
    eprintln!("Commands:");
    eprintln!("  master-secret --id <id> --out <file>");
    eprintln!("  server-secret --master <file> --out <file>");
    eprintln!("  client-secret --master <file> --identity <id> --out <file>");
    eprintln!("  time-permit --master <file> --identity <id> [--date <day>] --out <file>");
    eprintln!("  combine-server --shares <dir> --out <file>");
    eprintln!("  combine-client --shares <dir> --out <file>");
    eprintln!("  combine-permit --shares <dir> --out <file>");
    eprintln!("  extract-pin --identity <id> --pin <pin> --client-secret <file> --out <file>");
    eprintln!(
        "  client --identity <id> --pin <pin> --token <file> [--permit <file>] [--message <m>] --out <file>"
    );
    eprintln!(
        "  server --identity <id> --server-secret <file> --request <file> (--date <day> | --no-permit) [--message <m>] [--helpers <file>]"
    );
    eprintln!("  kangaroo --helpers <file>");
}

fn cmd_master_secret(args: &[String]) {
    let id = get_u32(args, "--id").unwrap_or(1);
    let out_path = get_path(args, "--out").expect("--out");

    let mut rng = os_csprng();
    let master = MasterSecretShare::<C>::random(id, &mut rng).expect("master share");
    write_b64(&out_path, &master.encode()).expect("write master share");
}

fn cmd_server_secret(args: &[String]) {
    let master = load_master(args);
    let out_path = get_path(args, "--out").expect("--out");

    let share = share_server_secret(&master);
    write_b64(&out_path, &share.encode()).expect("write server share");
}

fn cmd_client_secret(args: &[String]) {
    let master = load_master(args);
    let identity = get_str(args, "--identity").expect("--identity");
    let out_path = get_path(args, "--out").expect("--out");

    let share = share_client_secret(&master, &hash_id(identity.as_bytes()));
    write_b64(&out_path, &share.encode()).expect("write client share");
}

fn cmd_time_permit(args: &[String]) {
    let master = load_master(args);
    let identity = get_str(args, "--identity").expect("--identity");
    let date = get_u32(args, "--date").unwrap_or_else(today);
    let out_path = get_path(args, "--out").expect("--out");

    let share = share_time_permit(&master, date, &hash_id(identity.as_bytes()));
    write_b64(&out_path, &share.encode()).expect("write permit share");
}

fn cmd_combine_server(args: &[String]) {
    let params = load_params(args);
    let shares: Vec<ServerSecretShare<C>> = read_shares(args);
    let secret = ServerSecret::from_shares(&params, &shares).expect("combine server secret");
    write_b64(&get_path(args, "--out").expect("--out"), &secret.encode()).expect("write");
}

fn cmd_combine_client(args: &[String]) {
    let params = load_params(args);
    let shares: Vec<ClientSecretShare<C>> = read_shares(args);
    let secret = ClientSecret::from_shares(&params, &shares).expect("combine client secret");
    write_b64(&get_path(args, "--out").expect("--out"), &secret.encode()).expect("write");
}

fn cmd_combine_permit(args: &[String]) {
    let params = load_params(args);
    let shares: Vec<TimePermitShare<C>> = read_shares(args);
    let permit = TimePermit::from_shares(&params, &shares).expect("combine time permit");
    write_b64(&get_path(args, "--out").expect("--out"), &permit.encode()).expect("write");
}

fn cmd_extract_pin(args: &[String]) {
    let params = load_params(args);
    let identity = get_str(args, "--identity").expect("--identity");
    let pin = get_u32(args, "--pin").expect("--pin");
    let cs_path = get_path(args, "--client-secret").expect("--client-secret");
    let out_path = get_path(args, "--out").expect("--out");

    let client_secret: ClientSecret<C> = read_b64(&cs_path).expect("client secret");
    let token = extract_pin(&params, identity.as_bytes(), pin, client_secret).expect("extract pin");
    write_b64(&out_path, &token.encode()).expect("write token");
}

fn cmd_client(args: &[String]) {
    let params = load_params(args);
    let identity = get_str(args, "--identity").expect("--identity");
    let pin = get_u32(args, "--pin").expect("--pin");
    let token: Token<C> = read_b64(&get_path(args, "--token").expect("--token")).expect("token");
    let permit: Option<TimePermit<C>> =
        get_path(args, "--permit").map(|p| read_b64(&p).expect("time permit"));
    let message = get_str(args, "--message");
    let out_path = get_path(args, "--out").expect("--out");

    let input = ClientInput {
        id: identity.as_bytes(),
        pin,
        token: &token,
        permit: permit.as_ref(),
    };
    let mut rng = os_csprng();
    let proof = client::one_pass(
        &params,
        &input,
        message.as_deref().map(str::as_bytes),
        epoch_time(),
        Nonce::Draw(&mut rng),
    )
    .expect("client proof");
    write_b64(&out_path, &proof.request.encode()).expect("write request");
}

/// The server alone decides whether a permit is required: `--date <day>`
/// demands one for that day, `--no-permit` runs without permits.
fn expected_date(args: &[String]) -> Result<Option<EpochDate>, &'static str> {
    let no_permit = args.iter().any(|a| a == "--no-permit");
    match (get_u32(args, "--date"), no_permit) {
        (Some(date), false) => Ok(Some(date)),
        (None, true) => Ok(None),
        (Some(_), true) => Err("--date and --no-permit are mutually exclusive"),
        (None, false) => Err("server needs --date <day> or --no-permit"),
    }
}

fn cmd_server(args: &[String]) {
    let date = match expected_date(args) {
        Ok(date) => date,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };
    let params = load_params(args);
    let identity = get_str(args, "--identity").expect("--identity");
    let secret: ServerSecret<C> =
        read_b64(&get_path(args, "--server-secret").expect("--server-secret")).expect("secret");
    let request_b64 = read_string(&get_path(args, "--request").expect("--request"));
    let request = STANDARD.decode(request_b64.trim()).unwrap_or_default();
    let message = get_str(args, "--message");
    let helpers_path = get_path(args, "--helpers");

    let options = VerifyOptions {
        message: message.as_deref().map(str::as_bytes),
        public_key: None,
        want_helpers: helpers_path.is_some(),
    };
    let verification = server::one_pass_encoded(
        &params,
        &secret,
        ServerIdentity::Plain(identity.as_bytes()),
        date,
        &request,
        &options,
    )
    .expect("verify");

    let helpers_b64 = verification.helpers.as_ref().map(|h| STANDARD.encode(h.encode()));
    if let (Some(path), Some(helpers)) = (helpers_path, verification.helpers.as_ref()) {
        write_b64(&path, &helpers.encode()).expect("write helpers");
    }
    let json = serde_json::to_string_pretty(&VerificationJson {
        status: format!("{:?}", verification.status),
        date,
        y_b64: STANDARD.encode(C::scalar_to_bytes(&verification.y)),
        helpers_b64,
    })
    .expect("json");
    println!("{json}");
}

fn cmd_kangaroo(args: &[String]) {
    let params = load_params(args);
    let helpers: PinErrorHelpers<C> =
        read_b64(&get_path(args, "--helpers").expect("--helpers")).expect("helpers");
    match kangaroo::recover(&params, &helpers) {
        Ok(error) => println!("{error}"),
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn load_params(args: &[String]) -> Params {
    if let Some(path) = get_path(args, "--params") {
        let json = read_string(&path);
        return serde_json::from_str(&json).expect("params json");
    }
    let mut params = Params::default();
    if let Some(n) = get_u32(args, "--n") {
        params.authorities = n;
    }
    if let Some(max_pin) = get_u32(args, "--max-pin") {
        params.max_pin = max_pin;
    }
    params
}

fn load_master(args: &[String]) -> MasterSecretShare<C> {
    let path = get_path(args, "--master").expect("--master");
    read_b64(&path).expect("master share")
}

fn read_shares<S: Wire>(args: &[String]) -> Vec<S> {
    let dir = get_path(args, "--shares").expect("--shares");
    let mut shares = Vec::new();
    for entry in fs::read_dir(dir).expect("shares").flatten() {
        match read_b64(&entry.path()) {
            Ok(share) => shares.push(share),
            Err(err) => eprintln!("skipping {}: {err}", entry.path().display()),
        }
    }
    shares
}

fn read_string(path: &Path) -> String {
    let mut s = String::new();
    File::open(path)
        .expect("open")
        .read_to_string(&mut s)
        .expect("read");
    s
}

fn read_b64<T: Wire>(path: &Path) -> Result<T, Error> {
    let b64 = read_string(path);
    let bytes = STANDARD
        .decode(b64.trim().as_bytes())
        .map_err(|_| Error::MalformedInput)?;
    T::decode(&bytes)
}

fn write_b64(path: &Path, bytes: &[u8]) -> Result<(), Error> {
    let mut f = File::create(path).map_err(|_| Error::MalformedInput)?;
    f.write_all(STANDARD.encode(bytes).as_bytes())
        .map_err(|_| Error::MalformedInput)?;
    Ok(())
}

fn get_u32(args: &[String], key: &str) -> Option<u32> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn get_str(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|v| v.to_string())
}

fn get_path(args: &[String], key: &str) -> Option<PathBuf> {
    get_str(args, key).map(PathBuf::from)
}
