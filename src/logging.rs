use std::sync::Once;

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Installs the global fmt subscriber, honoring `RUST_LOG`. Safe to call more than once.
pub fn init() {
    static LOGGING: Once = Once::new();

    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        if let Err(err) = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
        {
            eprintln!("tracing subscriber already installed: {err}");
        }
    });
}
