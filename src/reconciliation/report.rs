//! Per-observation outcomes of a reconciliation batch

use crate::ledger::ReconcileEffect;
use crate::types::*;

/// What happened to one observation of a batch
#[derive(Debug)]
pub enum OutcomeStatus {
    /// Reconciled and persisted
    Applied(ReconcileEffect),
    /// Rejected; nothing was written for this observation
    Failed(LedgerError),
    /// Not attempted because an earlier observation failed and the batch halted
    Skipped,
}

/// One observation of a batch together with its status
#[derive(Debug)]
pub struct ObservationOutcome {
    pub observation: Observation,
    pub status: OutcomeStatus,
}

impl ObservationOutcome {
    /// Whether the observation was reconciled and persisted
    pub fn is_applied(&self) -> bool {
        matches!(self.status, OutcomeStatus::Applied(_))
    }

    /// Error that rejected the observation, if any
    pub fn error(&self) -> Option<&LedgerError> {
        match &self.status {
            OutcomeStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Outcomes of a batch, in batch order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ObservationOutcome>,
}

impl BatchReport {
    /// True only when every observation was applied
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ObservationOutcome::is_applied)
    }

    /// Number of observations applied
    pub fn applied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_applied()).count()
    }

    /// Failed observations with their errors
    pub fn failures(&self) -> impl Iterator<Item = (&Observation, &LedgerError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error().map(|err| (&o.observation, err)))
    }

    /// Number of observations skipped after a halt
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Skipped))
            .count()
    }
}
