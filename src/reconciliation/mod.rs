//! Batch reconciliation of balance observations against stored card ledgers

mod locks;
pub mod report;
pub mod service;

pub use report::*;
pub use service::*;
