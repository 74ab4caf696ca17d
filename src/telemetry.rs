//! Tracing subscriber setup for binaries and demos embedding the library

use tracing_subscriber::EnvFilter;

use crate::types::*;

/// Install a global fmt subscriber; `RUST_LOG` takes precedence over `log_level`
pub fn init_tracing(log_level: &str) -> LedgerResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .map_err(|e| LedgerError::Config(format!("invalid log level '{}': {}", log_level, e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| LedgerError::Config(format!("tracing already initialised: {}", e)))
}
