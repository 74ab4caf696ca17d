//! Reconciliation service orchestrating gap filling and reconciliation per card

use tracing::{debug, info, instrument, warn};

use crate::config::ReconciliationConfig;
use crate::ledger::{apply_with_effect, extension_days, Ledger, ReconcileEffect};
use crate::reconciliation::locks::CardLocks;
use crate::reconciliation::report::*;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Applies balance observations to the ledgers held by a record store.
///
/// Share it behind an `Arc` to reconcile from several tasks: observations
/// for the same card are serialized, different cards proceed in parallel.
pub struct ReconciliationService<S: RecordStore> {
    store: S,
    config: ReconciliationConfig,
    validator: Box<dyn ObservationValidator>,
    locks: CardLocks,
}

impl<S: RecordStore> ReconciliationService<S> {
    /// Create a new service with the default configuration
    pub fn new(store: S) -> Self {
        Self::with_config(store, ReconciliationConfig::default())
    }

    /// Create a new service with the given configuration
    pub fn with_config(store: S, config: ReconciliationConfig) -> Self {
        Self::with_validator(store, config, Box::new(DefaultObservationValidator))
    }

    /// Create a new service with a custom observation validator
    pub fn with_validator(
        store: S,
        config: ReconciliationConfig,
        validator: Box<dyn ObservationValidator>,
    ) -> Self {
        Self {
            store,
            config,
            validator,
            locks: CardLocks::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &ReconciliationConfig {
        &self.config
    }

    /// Underlying record store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reconcile every observation in batch order.
    ///
    /// A failed observation does not undo earlier ones. Unless
    /// `halt_on_failure` is set, processing continues with the next one.
    #[instrument(skip_all, fields(batch_size = observations.len()))]
    pub async fn reconcile_batch(&self, observations: &[Observation]) -> BatchReport {
        let mut report = BatchReport::default();
        let mut halted = false;

        for observation in observations {
            let status = if halted {
                OutcomeStatus::Skipped
            } else {
                match self.reconcile_observation(observation).await {
                    Ok(effect) => OutcomeStatus::Applied(effect),
                    Err(err) => {
                        warn!(
                            card = %observation.card_number,
                            date = %observation.date,
                            error = %err,
                            "Observation rejected"
                        );
                        halted = self.config.halt_on_failure;
                        OutcomeStatus::Failed(err)
                    }
                }
            };

            report.outcomes.push(ObservationOutcome {
                observation: observation.clone(),
                status,
            });
        }

        info!(
            applied = report.applied_count(),
            skipped = report.skipped_count(),
            success = report.is_success(),
            "Batch reconciled"
        );
        report
    }

    /// Reconcile one observation: load, densify, apply and persist its card's ledger
    #[instrument(skip_all, fields(card = %observation.card_number, date = %observation.date))]
    pub async fn reconcile_observation(
        &self,
        observation: &Observation,
    ) -> LedgerResult<ReconcileEffect> {
        self.validator.validate_observation(observation)?;

        let lock = self.locks.lock_for(&observation.card_number)?;
        let _guard = lock.lock().await;

        let card = self
            .store
            .find_card_by_number(&observation.card_number)
            .await?
            .ok_or_else(|| LedgerError::CardNotFound(observation.card_number.clone()))?;

        let stored = self.store.load_ledger(&card).await?;
        validation::validate_ledger_entries(&card.number, &stored)?;
        let ledger = Ledger::from_sorted(stored);

        if let Some(limit) = self.config.max_extension_days {
            let requested = extension_days(&ledger, observation.date);
            if requested > u64::from(limit) {
                return Err(LedgerError::ExtensionTooLarge { requested, limit });
            }
        }

        let stored_len = ledger.len();
        let dense = ledger.densify();
        let filled = dense.len() - stored_len;
        if filled > 0 {
            debug!(filled, "Filled gaps in stored ledger");
        }

        let (reconciled, effect) = apply_with_effect(dense, observation)?;

        if effect.is_mutation() || filled > 0 {
            self.store.save_ledger(&card, reconciled.entries()).await?;
        }

        info!(?effect, entries = reconciled.len(), "Observation reconciled");
        Ok(effect)
    }
}
