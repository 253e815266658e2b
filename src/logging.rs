//! Tracing setup for the `mpin` binary and demos.
//!
//! Protocol events are emitted under the `mpin::<module>` targets: `debug` for
//! accepted proofs and combined secrets, `warn` for rejected authentications.
//! No event carries secret material.

use tracing_subscriber::{EnvFilter, fmt};

/// Used when neither an explicit filter nor `RUST_LOG` is given.
pub const DEFAULT_FILTER: &str = "mpin=info,warn";

/// Install a global subscriber filtered by `filter`, else `RUST_LOG`, else
/// [`DEFAULT_FILTER`]. Returns `false` if a subscriber was already installed.
pub fn init_tracing(filter: Option<&str>) -> bool {
    let filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}
