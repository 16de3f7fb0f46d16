use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::config::ReaderConfig;

static INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber once, later calls are ignored
pub fn init(default_filter: &str) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .finish();

        // the host app may have installed its own
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            return;
        }

        if let Err(error) = tracing_log::LogTracer::init() {
            tracing::warn!("unable to forward log records to tracing: {error}");
        }
    });
}

#[uniffi::export]
fn init_logging(config: ReaderConfig) {
    init(&config.log_filter)
}
