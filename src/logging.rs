// Logging setup shared by both binaries.

use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout only carries program lists and responses.
/// `RUST_LOG` wins over `verbose` when set.
pub fn init(verbose: bool) {
    let default = if verbose {
        "esp_schedule_tools=debug"
    } else {
        "esp_schedule_tools=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
