//! Traits for storage abstraction and extensibility

use async_trait::async_trait;

use crate::types::*;
use crate::utils::validation;

/// Record store consumed by reconciliation
///
/// The store owns card identity and the card → ledger relationship; the
/// reconciliation core only reads and replaces whole ledgers. Methods take
/// `&self` so one store can serve concurrent reconciliations.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Find a card by its number
    async fn find_card_by_number(&self, number: &str) -> LedgerResult<Option<Card>>;

    /// Load the stored, possibly sparse, balance entries of a card
    async fn load_ledger(&self, card: &Card) -> LedgerResult<Vec<BalanceEntry>>;

    /// Replace the stored balance entries of a card
    async fn save_ledger(&self, card: &Card, entries: &[BalanceEntry]) -> LedgerResult<()>;

    /// Get the id of the user owning a card
    async fn find_card_owner(&self, card: &Card) -> LedgerResult<UserId>;
}

/// Storage for users and cards
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Save a user
    async fn save_user(&self, user: &User) -> LedgerResult<()>;

    /// Get a user by ID
    async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>>;

    /// Delete a user together with their cards and ledgers
    async fn delete_user(&self, user_id: UserId) -> LedgerResult<()>;

    /// Save a card; card numbers must stay unique
    async fn save_card(&self, card: &Card) -> LedgerResult<()>;

    /// List all cards owned by a user
    async fn list_cards_for_user(&self, user_id: UserId) -> LedgerResult<Vec<Card>>;
}

/// Trait for implementing custom observation checks run before reconciliation
pub trait ObservationValidator: Send + Sync {
    fn validate_observation(&self, observation: &Observation) -> LedgerResult<()>;
}

/// Trait for implementing custom user and card rules
pub trait AccountValidator: Send + Sync {
    /// Validate a user before saving
    fn validate_user(&self, user: &User) -> LedgerResult<()>;

    /// Validate a card before saving
    fn validate_card(&self, card: &Card) -> LedgerResult<()>;
}

/// Default observation validator: a blank card number can never resolve to a card
pub struct DefaultObservationValidator;

impl ObservationValidator for DefaultObservationValidator {
    fn validate_observation(&self, observation: &Observation) -> LedgerResult<()> {
        validation::validate_card_number(&observation.card_number)
            .map_err(|_| LedgerError::CardNotFound(observation.card_number.clone()))
    }
}

/// Default account validator with basic rules
pub struct DefaultAccountValidator;

impl AccountValidator for DefaultAccountValidator {
    fn validate_user(&self, user: &User) -> LedgerResult<()> {
        validation::validate_user_name(&user.name)?;
        validation::validate_email(&user.email)
    }

    fn validate_card(&self, card: &Card) -> LedgerResult<()> {
        // any format is accepted, as long as there is one
        validation::validate_card_number(&card.number)
    }
}
