//! Merging a single balance observation into a contiguous ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::Ledger;
use crate::types::*;

/// Which reconciliation case an observation triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileEffect {
    /// The ledger was empty and now holds the observation alone
    Bootstrapped,
    /// Days were prepended before the earliest known day at the observed balance
    ExtendedBackward { days: u64 },
    /// Days were appended after the latest known day; `delta` is the change
    /// applied to the observed day relative to the carried balance
    ExtendedForward { days: u64, delta: Amount },
    /// A known day was corrected and `delta` shifted onto every later day
    Adjusted { delta: Amount },
    /// The observation matched the stored balance
    Unchanged,
}

impl ReconcileEffect {
    /// Whether the ledger needs to be written back
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ReconcileEffect::Unchanged)
    }
}

/// Apply `observation` to `ledger` and return the reconciled ledger
pub fn apply(ledger: Ledger, observation: &Observation) -> LedgerResult<Ledger> {
    apply_with_effect(ledger, observation).map(|(ledger, _)| ledger)
}

/// Apply `observation` to `ledger`, also reporting which case fired.
///
/// A sparse ledger is densified first, so the result is always contiguous.
/// Fails with [`LedgerError::BalanceOverflow`] when the correction or a
/// shifted balance does not fit in minor units; the input is consumed either way.
/// Range extension is unbounded here, callers cap it through
/// [`extension_days`].
pub fn apply_with_effect(
    ledger: Ledger,
    observation: &Observation,
) -> LedgerResult<(Ledger, ReconcileEffect)> {
    let ledger = ledger.densify();
    let (date, balance) = (observation.date, observation.balance);

    let Some((min, max)) = ledger.range() else {
        let bootstrapped = Ledger::from_sorted(vec![BalanceEntry::new(date, balance)]);
        return Ok((bootstrapped, ReconcileEffect::Bootstrapped));
    };

    if date < min {
        Ok(extend_backward(ledger, date, balance, min))
    } else if date > max {
        extend_forward(ledger, date, balance, max)
    } else {
        adjust_in_range(ledger, date, balance)
    }
}

/// Number of days `date` lies outside the ledger's range, 0 when inside or empty
pub fn extension_days(ledger: &Ledger, date: NaiveDate) -> u64 {
    match ledger.range() {
        Some((min, _)) if date < min => (min - date).num_days() as u64,
        Some((_, max)) if date > max => (date - max).num_days() as u64,
        _ => 0,
    }
}

fn extend_backward(
    ledger: Ledger,
    date: NaiveDate,
    balance: Amount,
    min: NaiveDate,
) -> (Ledger, ReconcileEffect) {
    let days = (min - date).num_days() as u64;
    let mut entries = Vec::with_capacity(days as usize + ledger.len());
    entries.extend(
        date.iter_days()
            .take_while(|d| *d < min)
            .map(|d| BalanceEntry::new(d, balance)),
    );
    entries.extend(ledger.into_entries());

    (
        Ledger::from_sorted(entries),
        ReconcileEffect::ExtendedBackward { days },
    )
}

fn extend_forward(
    mut ledger: Ledger,
    date: NaiveDate,
    balance: Amount,
    max: NaiveDate,
) -> LedgerResult<(Ledger, ReconcileEffect)> {
    let days = (date - max).num_days() as u64;
    let carried = ledger.entries()[ledger.len() - 1].balance;
    let delta = balance
        .checked_sub(carried)
        .ok_or(LedgerError::BalanceOverflow(date))?;

    let entries = ledger.entries_mut();
    entries.reserve(days as usize);
    entries.extend(
        max.iter_days()
            .skip(1)
            .take_while(|d| *d <= date)
            .map(|d| BalanceEntry::new(d, carried)),
    );

    if !delta.is_zero() {
        let pivot = entries.len() - 1;
        propagate(&mut entries[pivot..], delta)?;
    }

    Ok((ledger, ReconcileEffect::ExtendedForward { days, delta }))
}

fn adjust_in_range(
    mut ledger: Ledger,
    date: NaiveDate,
    balance: Amount,
) -> LedgerResult<(Ledger, ReconcileEffect)> {
    // contiguous, so every in-range day has an entry
    let pivot = ledger
        .position(date)
        .ok_or(LedgerError::EntryNotFound(date))?;

    let delta = balance
        .checked_sub(ledger.entries()[pivot].balance)
        .ok_or(LedgerError::BalanceOverflow(date))?;
    if delta.is_zero() {
        return Ok((ledger, ReconcileEffect::Unchanged));
    }

    propagate(&mut ledger.entries_mut()[pivot..], delta)?;
    Ok((ledger, ReconcileEffect::Adjusted { delta }))
}

fn propagate(entries: &mut [BalanceEntry], delta: Amount) -> LedgerResult<()> {
    for entry in entries {
        entry.balance = entry
            .balance
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow(entry.date))?;
    }
    Ok(())
}
