//! Tracing setup for the binary.

use std::sync::Once;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "INDUS_XLIT_LOG";
const DEFAULT_FILTER: &str = "indus_xlit=info,xlit_core=info";

static INIT: Once = Once::new();

/// Installs a stderr fmt subscriber filtered by `INDUS_XLIT_LOG`, falling
/// back to info level. Later calls are no-ops.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
