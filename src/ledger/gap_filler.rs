//! Gap filling for sparse balance histories

use crate::types::*;

/// Turn a sparse, ascending, unique-per-date sequence into one entry per day.
///
/// Each missing day takes the balance of the nearest earlier entry. Input
/// ordering is not re-checked here.
pub fn densify(sparse: &[BalanceEntry]) -> Vec<BalanceEntry> {
    let (first, last) = match (sparse.first(), sparse.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Vec::new(),
    };

    let span = (last.date - first.date).num_days().max(0) as usize + 1;
    let mut dense = Vec::with_capacity(span);
    dense.push(*first);

    for entry in &sparse[1..] {
        let carried = dense[dense.len() - 1];
        let mut date = carried.date;
        while let Some(next) = date.succ_opt() {
            if next >= entry.date {
                break;
            }
            dense.push(BalanceEntry::new(next, carried.balance));
            date = next;
        }
        dense.push(*entry);
    }

    dense
}
