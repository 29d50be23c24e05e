//! Log subscriber setup.

use tracing_subscriber::EnvFilter;

/// Installs a compact subscriber on stderr so stdout stays pure JSON.
///
/// `RUST_LOG` wins when set; otherwise `-v` raises the level from `warn`.
pub fn setup_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
