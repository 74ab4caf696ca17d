//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct Records {
    users: HashMap<UserId, User>,
    cards: HashMap<CardId, Card>,
    ledgers: HashMap<CardId, Vec<BalanceEntry>>,
}

impl Records {
    fn card_by_number(&self, number: &str) -> Option<&Card> {
        self.cards.values().find(|card| card.number == number)
    }
}

/// In-memory record store for testing and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Records>>,
}

impl MemoryStore {
    /// Create a new memory store instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> LedgerResult<()> {
        *self.write()? = Records::default();
        Ok(())
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|_| LedgerError::Storage("record lock poisoned".to_string()))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|_| LedgerError::Storage("record lock poisoned".to_string()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find_card_by_number(&self, number: &str) -> LedgerResult<Option<Card>> {
        Ok(self.read()?.card_by_number(number).cloned())
    }

    async fn load_ledger(&self, card: &Card) -> LedgerResult<Vec<BalanceEntry>> {
        let records = self.read()?;
        if !records.cards.contains_key(&card.id) {
            return Err(LedgerError::CardNotFound(card.number.clone()));
        }
        Ok(records.ledgers.get(&card.id).cloned().unwrap_or_default())
    }

    async fn save_ledger(&self, card: &Card, entries: &[BalanceEntry]) -> LedgerResult<()> {
        let mut records = self.write()?;
        if !records.cards.contains_key(&card.id) {
            return Err(LedgerError::CardNotFound(card.number.clone()));
        }
        records.ledgers.insert(card.id, entries.to_vec());
        Ok(())
    }

    async fn find_card_owner(&self, card: &Card) -> LedgerResult<UserId> {
        self.read()?
            .cards
            .get(&card.id)
            .map(|stored| stored.owner)
            .ok_or_else(|| LedgerError::CardNotFound(card.number.clone()))
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn save_user(&self, user: &User) -> LedgerResult<()> {
        self.write()?.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn get_user(&self, user_id: UserId) -> LedgerResult<Option<User>> {
        Ok(self.read()?.users.get(&user_id).cloned())
    }

    async fn delete_user(&self, user_id: UserId) -> LedgerResult<()> {
        let mut records = self.write()?;
        if records.users.remove(&user_id).is_none() {
            return Err(LedgerError::UserNotFound(user_id));
        }

        let owned: Vec<CardId> = records
            .cards
            .values()
            .filter(|card| card.owner == user_id)
            .map(|card| card.id)
            .collect();
        for card_id in owned {
            records.cards.remove(&card_id);
            records.ledgers.remove(&card_id);
        }
        Ok(())
    }

    async fn save_card(&self, card: &Card) -> LedgerResult<()> {
        let mut records = self.write()?;
        if !records.users.contains_key(&card.owner) {
            return Err(LedgerError::UserNotFound(card.owner));
        }
        if let Some(existing) = records.card_by_number(&card.number) {
            if existing.id != card.id {
                return Err(LedgerError::Validation(format!(
                    "Card with number '{}' already exists",
                    card.number
                )));
            }
        }
        records.cards.insert(card.id, card.clone());
        Ok(())
    }

    async fn list_cards_for_user(&self, user_id: UserId) -> LedgerResult<Vec<Card>> {
        let records = self.read()?;
        let mut cards: Vec<Card> = records
            .cards
            .values()
            .filter(|card| card.owner == user_id)
            .cloned()
            .collect();
        cards.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(cards)
    }
}
