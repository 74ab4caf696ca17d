//! # Card Ledger Core
//!
//! Daily balance ledgers for credit cards, and the reconciliation of those
//! ledgers when balance readings arrive late, early or out of order.
//!
//! ## Features
//!
//! - **Gap filling**: sparse stored histories are densified by carrying the
//!   last known balance forward
//! - **Reconciliation**: backward and forward extension of a ledger, and
//!   correction of a known day with the delta shifted onto every later day
//! - **Batch processing**: per-observation outcomes, per-card serialization
//! - **Accounts**: users and cards over the same storage traits
//! - **Storage abstraction**: database-agnostic design with trait-based storage
//!
//! ## Quick Start
//!
//! ```rust
//! use card_ledger_core::{apply, BalanceEntry, Ledger, Observation};
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
//! let stored = Ledger::from_entries(vec![
//!     BalanceEntry::new(day(10), 100),
//!     BalanceEntry::new(day(12), 110),
//! ])
//! .unwrap();
//!
//! let ledger = apply(stored, &Observation::new("4111", day(11), 110)).unwrap();
//! assert_eq!(ledger.balance_on(day(12)).unwrap().minor_units(), 120);
//! ```

pub mod accounts;
pub mod config;
pub mod ledger;
pub mod reconciliation;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use accounts::AccountService;
pub use config::ReconciliationConfig;
pub use ledger::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
