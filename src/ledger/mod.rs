//! Ledger module containing the balance history value type, gap filling and reconciliation

pub mod gap_filler;
pub mod history;
pub mod reconciler;

pub use gap_filler::densify;
pub use history::*;
pub use reconciler::{apply, apply_with_effect, extension_days, ReconcileEffect};
