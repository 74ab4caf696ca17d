//! Core types and data structures for card balance ledgers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of a user in the record store
pub type UserId = Uuid;

/// Identifier of a card in the record store
pub type CardId = Uuid;

/// Signed amount in minor currency units (cents, paise, ...)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Create an amount from minor units
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Raw value in minor units
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Whether the amount is exactly zero
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Sum, or `None` if it does not fit in minor units
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Difference, or `None` if it does not fit in minor units
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Closing balance of a card at the end of one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BalanceEntry {
    /// Calendar day the balance closes
    pub date: NaiveDate,
    /// End-of-day balance
    pub balance: Amount,
}

impl BalanceEntry {
    /// Create a new balance entry
    pub fn new(date: NaiveDate, balance: impl Into<Amount>) -> Self {
        Self {
            date,
            balance: balance.into(),
        }
    }
}

/// A balance reading for one card, to be merged into its ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// Number of the card the reading belongs to
    pub card_number: String,
    /// Day the reading applies to
    pub date: NaiveDate,
    /// Observed closing balance for that day
    pub balance: Amount,
}

impl Observation {
    /// Create a new observation
    pub fn new(card_number: impl Into<String>, date: NaiveDate, balance: impl Into<Amount>) -> Self {
        Self {
            card_number: card_number.into(),
            date,
            balance: balance.into(),
        }
    }
}

/// Account holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl User {
    /// Create a new user with a fresh identifier
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
        }
    }
}

/// Credit card owned by a user; owns exactly one balance ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    /// Card number, unique across the store
    pub number: String,
    pub issuance_bank: String,
    pub owner: UserId,
}

impl Card {
    /// Create a new card with a fresh identifier
    pub fn new(number: String, issuance_bank: String, owner: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            issuance_bank,
            owner,
        }
    }
}

/// Public view of a card, without store identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardView {
    pub issuance_bank: String,
    pub number: String,
}

impl From<&Card> for CardView {
    fn from(card: &Card) -> Self {
        Self {
            issuance_bank: card.issuance_bank.clone(),
            number: card.number.clone(),
        }
    }
}

/// Errors that can occur while managing or reconciling ledgers
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Card not found: {0}")]
    CardNotFound(String),
    #[error("User not found: {0}")]
    UserNotFound(UserId),
    #[error("No balance entry on {0}")]
    EntryNotFound(NaiveDate),
    #[error("Malformed ledger for card {card}: {reason}")]
    MalformedLedger { card: String, reason: String },
    #[error("Observation extends ledger by {requested} days, limit is {limit}")]
    ExtensionTooLarge { requested: u64, limit: u32 },
    #[error("Balance arithmetic overflows on {0}")]
    BalanceOverflow(NaiveDate),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ordering violation found in a sequence of balance entries
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderViolation {
    #[error("duplicate entry for {0}")]
    DuplicateDate(NaiveDate),
    #[error("entry for {next} follows entry for {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        next: NaiveDate,
    },
}
