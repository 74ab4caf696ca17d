//! Per-card mutual exclusion for read-modify-write ledger cycles

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::types::*;

/// Idle locks are dropped once the table grows past this many cards
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug, Default)]
pub(crate) struct CardLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CardLocks {
    /// Lock shared by every reconciliation of `card_number`
    pub(crate) fn lock_for(&self, card_number: &str) -> LedgerResult<Arc<AsyncMutex<()>>> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LedgerError::Storage("card lock table poisoned".to_string()))?;

        if locks.len() >= PRUNE_THRESHOLD {
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        }

        Ok(locks
            .entry(card_number.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone())
    }
}
