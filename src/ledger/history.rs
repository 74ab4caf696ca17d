//! Per-card balance ledger value type

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::gap_filler;
use crate::types::*;

/// Date-ordered daily closing balances of one card.
///
/// Entries are always unique per date and ascending. A ledger built from
/// stored data may still have gaps; [`Ledger::densify`] and the reconciler
/// always produce a contiguous one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<BalanceEntry>", into = "Vec<BalanceEntry>")]
pub struct Ledger {
    entries: Vec<BalanceEntry>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from stored entries, which may be sparse but must be
    /// unique per date and ascending
    pub fn from_entries(entries: Vec<BalanceEntry>) -> Result<Self, OrderViolation> {
        check_order(&entries)?;
        Ok(Self { entries })
    }

    /// Wrap entries already known to be unique and ascending
    pub(crate) fn from_sorted(entries: Vec<BalanceEntry>) -> Self {
        debug_assert!(check_order(&entries).is_ok());
        Self { entries }
    }

    /// All entries in ascending date order
    pub fn entries(&self) -> &[BalanceEntry] {
        &self.entries
    }

    /// Consume the ledger, returning its entries
    pub fn into_entries(self) -> Vec<BalanceEntry> {
        self.entries
    }

    /// Number of days with an entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no balance has been recorded yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Closing balance on `date`
    pub fn balance_on(&self, date: NaiveDate) -> LedgerResult<Amount> {
        self.position(date)
            .map(|idx| self.entries[idx].balance)
            .ok_or(LedgerError::EntryNotFound(date))
    }

    /// First and last date present, or `None` for an empty ledger
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.entries.first(), self.entries.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// True when there is one entry for every day between the first and last date
    pub fn is_contiguous(&self) -> bool {
        match self.range() {
            Some((min, max)) => (max - min).num_days() + 1 == self.entries.len() as i64,
            None => true,
        }
    }

    /// Fill every missing day by carrying the previous balance forward
    pub fn densify(self) -> Self {
        if self.is_contiguous() {
            return self;
        }
        Self {
            entries: gap_filler::densify(&self.entries),
        }
    }

    pub(crate) fn position(&self, date: NaiveDate) -> Option<usize> {
        self.entries.binary_search_by_key(&date, |e| e.date).ok()
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<BalanceEntry> {
        &mut self.entries
    }
}

impl TryFrom<Vec<BalanceEntry>> for Ledger {
    type Error = OrderViolation;

    fn try_from(entries: Vec<BalanceEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<Ledger> for Vec<BalanceEntry> {
    fn from(ledger: Ledger) -> Self {
        ledger.entries
    }
}

/// Check that entries are unique per date and strictly ascending
pub fn check_order(entries: &[BalanceEntry]) -> Result<(), OrderViolation> {
    for pair in entries.windows(2) {
        let (previous, next) = (pair[0].date, pair[1].date);
        if previous == next {
            return Err(OrderViolation::DuplicateDate(next));
        }
        if previous > next {
            return Err(OrderViolation::OutOfOrder { previous, next });
        }
    }
    Ok(())
}
