//! Balance reconciliation walkthrough

use card_ledger_core::telemetry::init_tracing;
use card_ledger_core::utils::MemoryStore;
use card_ledger_core::{
    AccountService, BalanceEntry, Observation, OutcomeStatus, ReconciliationConfig,
    ReconciliationService, RecordStore,
};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ReconciliationConfig::from_env()?;
    init_tracing(&config.log_level)?;

    println!("💳 Card Ledger Core - Reconciliation Example\n");

    let store = MemoryStore::new();
    let accounts = AccountService::new(store.clone());

    // 1. A user with one card
    let user = accounts
        .create_user("Ada Lovelace".to_string(), "ada@example.com".to_string())
        .await?;
    let card = accounts
        .add_card(user.id, "Analytical Bank".to_string(), "4111-0000".to_string())
        .await?;
    println!("  ✓ Issued card {} to {}", card.number, user.name);

    // 2. A sparse history, as an older system might have stored it
    let day = |d| NaiveDate::from_ymd_opt(2024, 4, d).ok_or("invalid date");
    store
        .save_ledger(
            &card,
            &[
                BalanceEntry::new(day(10)?, 100),
                BalanceEntry::new(day(12)?, 110),
            ],
        )
        .await?;

    // 3. Late and early readings, plus one for a card that does not exist
    let service = ReconciliationService::with_config(store.clone(), config);
    let report = service
        .reconcile_batch(&[
            Observation::new("4111-0000", day(11)?, 110),
            Observation::new("4111-0000", day(8)?, 90),
            Observation::new("4111-0000", day(14)?, 150),
            Observation::new("9999-0000", day(11)?, 1),
        ])
        .await;

    println!("\n📋 Batch outcome (success = {}):", report.is_success());
    for outcome in &report.outcomes {
        let obs = &outcome.observation;
        match &outcome.status {
            OutcomeStatus::Applied(effect) => {
                println!("  ✓ {} {} → {:?}", obs.card_number, obs.date, effect)
            }
            OutcomeStatus::Failed(err) => println!("  ✗ {} {} → {}", obs.card_number, obs.date, err),
            OutcomeStatus::Skipped => println!("  - {} {} skipped", obs.card_number, obs.date),
        }
    }

    // 4. The reconciled, gap-free ledger
    println!("\n📈 Ledger for {}:", card.number);
    for entry in accounts.balance_history(&card.number).await?.entries() {
        println!("  {}  {:>6}", entry.date, entry.balance);
    }

    Ok(())
}
