//! Reconciliation configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::types::*;

/// Default cap on days one observation may add, roughly a century
pub const DEFAULT_MAX_EXTENSION_DAYS: u32 = 36_600;

/// Settings controlling batch reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Stop a batch at the first failed observation; remaining ones are skipped
    pub halt_on_failure: bool,
    /// Reject observations that would add more than this many days to a
    /// ledger. `None` lifts the cap, so a single far-off date can allocate
    /// one entry per day up to it.
    pub max_extension_days: Option<u32>,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            halt_on_failure: false,
            max_extension_days: Some(DEFAULT_MAX_EXTENSION_DAYS),
            log_level: "info".to_string(),
        }
    }
}

impl ReconciliationConfig {
    /// Load from `RECONCILE_HALT_ON_FAILURE`, `RECONCILE_MAX_EXTENSION_DAYS` and `LOG_LEVEL`.
    ///
    /// `RECONCILE_MAX_EXTENSION_DAYS=off` lifts the extension cap.
    pub fn from_env() -> LedgerResult<Self> {
        let defaults = Self::default();
        let max_extension_days = match env::var("RECONCILE_MAX_EXTENSION_DAYS") {
            Ok(raw) if raw.trim().eq_ignore_ascii_case("off") => None,
            _ => parse_var("RECONCILE_MAX_EXTENSION_DAYS")?.or(defaults.max_extension_days),
        };

        Ok(Self {
            halt_on_failure: parse_var("RECONCILE_HALT_ON_FAILURE")?
                .unwrap_or(defaults.halt_on_failure),
            max_extension_days,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Stop batches at their first failure
    pub fn with_halt_on_failure(mut self, halt: bool) -> Self {
        self.halt_on_failure = halt;
        self
    }

    /// Cap the number of days one observation may add
    pub fn with_max_extension_days(mut self, days: u32) -> Self {
        self.max_extension_days = Some(days);
        self
    }

    /// Remove the extension cap
    pub fn without_extension_limit(mut self) -> Self {
        self.max_extension_days = None;
        self
    }

    /// Default tracing filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

fn parse_var<T: FromStr>(name: &str) -> LedgerResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| LedgerError::Config(format!("{} has invalid value '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}
