//! Validation utilities

use crate::ledger::check_order;
use crate::types::*;

/// Validate that a card number is present
pub fn validate_card_number(number: &str) -> LedgerResult<()> {
    if number.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Card number cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate that a user name is valid
pub fn validate_user_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        return Err(LedgerError::Validation(
            "User name cannot be empty".to_string(),
        ));
    }

    if name.len() > 100 {
        return Err(LedgerError::Validation(
            "User name cannot exceed 100 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate that an email address looks plausible
pub fn validate_email(email: &str) -> LedgerResult<()> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(LedgerError::Validation(format!(
            "Invalid email address: '{}'",
            email
        )));
    }

    Ok(())
}

/// Validate that stored ledger entries of `card_number` are unique per date and ascending
pub fn validate_ledger_entries(card_number: &str, entries: &[BalanceEntry]) -> LedgerResult<()> {
    check_order(entries).map_err(|violation| LedgerError::MalformedLedger {
        card: card_number.to_string(),
        reason: violation.to_string(),
    })
}
