//! User and card management over the record store

use tracing::{info, instrument};

use crate::ledger::Ledger;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Account service for users, their cards and card balance histories
pub struct AccountService<S: AccountStore + RecordStore> {
    store: S,
    validator: Box<dyn AccountValidator>,
}

impl<S: AccountStore + RecordStore> AccountService<S> {
    /// Create a new account service
    pub fn new(store: S) -> Self {
        Self {
            store,
            validator: Box::new(DefaultAccountValidator),
        }
    }

    /// Create a new account service with custom validator
    pub fn with_validator(store: S, validator: Box<dyn AccountValidator>) -> Self {
        Self { store, validator }
    }

    /// Create and store a new user
    #[instrument(skip(self, email))]
    pub async fn create_user(&self, name: String, email: String) -> LedgerResult<User> {
        let user = User::new(name, email);
        self.validator.validate_user(&user)?;
        self.store.save_user(&user).await?;

        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Delete a user together with their cards and balance histories
    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: UserId) -> LedgerResult<()> {
        self.store.delete_user(user_id).await?;
        info!("User deleted");
        Ok(())
    }

    /// Issue a card to an existing user
    #[instrument(skip(self, number))]
    pub async fn add_card(
        &self,
        user_id: UserId,
        issuance_bank: String,
        number: String,
    ) -> LedgerResult<Card> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(LedgerError::UserNotFound(user_id));
        }

        let card = Card::new(number, issuance_bank, user_id);
        self.validator.validate_card(&card)?;

        if self.store.find_card_by_number(&card.number).await?.is_some() {
            return Err(LedgerError::Validation(format!(
                "Card with number '{}' already exists",
                card.number
            )));
        }

        self.store.save_card(&card).await?;
        info!(card_id = %card.id, "Card added");
        Ok(card)
    }

    /// Cards of a user; empty when the user is unknown or has none
    pub async fn list_cards(&self, user_id: UserId) -> LedgerResult<Vec<CardView>> {
        if self.store.get_user(user_id).await?.is_none() {
            return Ok(Vec::new());
        }

        let cards = self.store.list_cards_for_user(user_id).await?;
        Ok(cards.iter().map(CardView::from).collect())
    }

    /// Owner of the card with the given number
    pub async fn user_id_for_card(&self, number: &str) -> LedgerResult<UserId> {
        let card = self.card_required(number).await?;
        self.store.find_card_owner(&card).await
    }

    /// Stored balance history of a card, as persisted
    pub async fn balance_history(&self, number: &str) -> LedgerResult<Ledger> {
        let card = self.card_required(number).await?;
        let entries = self.store.load_ledger(&card).await?;
        validation::validate_ledger_entries(&card.number, &entries)?;
        Ok(Ledger::from_sorted(entries))
    }

    async fn card_required(&self, number: &str) -> LedgerResult<Card> {
        self.store
            .find_card_by_number(number)
            .await?
            .ok_or_else(|| LedgerError::CardNotFound(number.to_string()))
    }
}
