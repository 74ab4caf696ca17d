//! Integration tests for card-ledger-core

use std::sync::Arc;

use card_ledger_core::{
    config::DEFAULT_MAX_EXTENSION_DAYS, utils::MemoryStore, AccountService, Amount, BalanceEntry,
    Card, LedgerError, Observation, OutcomeStatus, ReconcileEffect, ReconciliationConfig,
    ReconciliationService, RecordStore,
};
use chrono::NaiveDate;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn entries(values: &[(NaiveDate, i64)]) -> Vec<BalanceEntry> {
    values
        .iter()
        .map(|(date, balance)| BalanceEntry::new(*date, *balance))
        .collect()
}

/// Store with one user holding one card per given number
async fn store_with_cards(numbers: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    let accounts = AccountService::new(store.clone());
    let user = accounts
        .create_user("Ada Lovelace".to_string(), "ada@example.com".to_string())
        .await
        .unwrap();
    for number in numbers {
        accounts
            .add_card(user.id, "Analytical Bank".to_string(), number.to_string())
            .await
            .unwrap();
    }
    store
}

async fn card(store: &MemoryStore, number: &str) -> Card {
    store.find_card_by_number(number).await.unwrap().unwrap()
}

async fn seed(store: &MemoryStore, number: &str, values: &[(NaiveDate, i64)]) {
    let card = card(store, number).await;
    store.save_ledger(&card, &entries(values)).await.unwrap();
}

async fn stored(store: &MemoryStore, number: &str) -> Vec<BalanceEntry> {
    let card = card(store, number).await;
    store.load_ledger(&card).await.unwrap()
}

#[tokio::test]
async fn test_sparse_ledger_is_densified_and_corrected() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(4, 10), 100), (day(4, 12), 110)]).await;
    let service = ReconciliationService::new(store.clone());

    let effect = service
        .reconcile_observation(&Observation::new("4111", day(4, 11), 110))
        .await
        .unwrap();

    assert_eq!(
        effect,
        ReconcileEffect::Adjusted {
            delta: Amount::from(10)
        }
    );
    assert_eq!(
        stored(&store, "4111").await,
        entries(&[(day(4, 10), 100), (day(4, 11), 110), (day(4, 12), 120)])
    );
}

#[tokio::test]
async fn test_first_observation_bootstraps_ledger() {
    let store = store_with_cards(&["4111"]).await;
    let service = ReconciliationService::new(store.clone());

    let report = service
        .reconcile_batch(&[Observation::new("4111", day(5, 1), 50)])
        .await;

    assert!(report.is_success());
    assert_eq!(stored(&store, "4111").await, entries(&[(day(5, 1), 50)]));
}

#[tokio::test]
async fn test_backward_then_forward_extension() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(5, 1), 50)]).await;
    let service = ReconciliationService::new(store.clone());

    service
        .reconcile_observation(&Observation::new("4111", day(4, 29), 40))
        .await
        .unwrap();
    assert_eq!(
        stored(&store, "4111").await,
        entries(&[(day(4, 29), 40), (day(4, 30), 40), (day(5, 1), 50)])
    );

    service
        .reconcile_observation(&Observation::new("4111", day(5, 3), 70))
        .await
        .unwrap();
    assert_eq!(
        stored(&store, "4111").await,
        entries(&[
            (day(4, 29), 40),
            (day(4, 30), 40),
            (day(5, 1), 50),
            (day(5, 2), 50),
            (day(5, 3), 70),
        ])
    );
}

#[tokio::test]
async fn test_unknown_card_fails_batch_but_keeps_earlier_writes() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(5, 1), 50)]).await;
    let service = ReconciliationService::new(store.clone());

    let report = service
        .reconcile_batch(&[
            Observation::new("4111", day(5, 3), 70),
            Observation::new("0000", day(5, 3), 10),
        ])
        .await;

    assert!(!report.is_success());
    assert_eq!(report.applied_count(), 1);
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0.card_number, "0000");
    assert!(matches!(failures[0].1, LedgerError::CardNotFound(n) if n == "0000"));

    assert_eq!(
        stored(&store, "4111").await,
        entries(&[(day(5, 1), 50), (day(5, 2), 50), (day(5, 3), 70)])
    );
}

#[tokio::test]
async fn test_batch_continues_after_failure() {
    let store = store_with_cards(&["4111"]).await;
    let service = ReconciliationService::new(store.clone());

    let report = service
        .reconcile_batch(&[
            Observation::new("0000", day(5, 1), 10),
            Observation::new("4111", day(5, 1), 50),
        ])
        .await;

    assert!(!report.is_success());
    assert!(report.outcomes[1].is_applied());
    assert_eq!(stored(&store, "4111").await, entries(&[(day(5, 1), 50)]));
}

#[tokio::test]
async fn test_halt_on_failure_skips_remaining() {
    let store = store_with_cards(&["4111"]).await;
    let config = ReconciliationConfig::default().with_halt_on_failure(true);
    let service = ReconciliationService::with_config(store.clone(), config);

    let report = service
        .reconcile_batch(&[
            Observation::new("0000", day(5, 1), 10),
            Observation::new("4111", day(5, 1), 50),
        ])
        .await;

    assert!(!report.is_success());
    assert_eq!(report.skipped_count(), 1);
    assert!(matches!(report.outcomes[1].status, OutcomeStatus::Skipped));
    assert!(stored(&store, "4111").await.is_empty());
}

#[tokio::test]
async fn test_malformed_stored_ledger_is_rejected_untouched() {
    let store = store_with_cards(&["4111"]).await;
    // descending order, as an inconsistent store might hand back
    let malformed = [(day(4, 12), 110), (day(4, 10), 100)];
    seed(&store, "4111", &malformed).await;
    let service = ReconciliationService::new(store.clone());

    let result = service
        .reconcile_observation(&Observation::new("4111", day(4, 11), 110))
        .await;

    assert!(matches!(
        result,
        Err(LedgerError::MalformedLedger { ref card, .. }) if card == "4111"
    ));
    assert_eq!(stored(&store, "4111").await, entries(&malformed));
}

#[tokio::test]
async fn test_extension_limit() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(5, 1), 50)]).await;
    let config = ReconciliationConfig::default().with_max_extension_days(30);
    let service = ReconciliationService::with_config(store.clone(), config);

    let far = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
    let result = service
        .reconcile_observation(&Observation::new("4111", far, 10))
        .await;
    assert!(matches!(
        result,
        Err(LedgerError::ExtensionTooLarge {
            requested: 365,
            limit: 30
        })
    ));
    assert_eq!(stored(&store, "4111").await, entries(&[(day(5, 1), 50)]));

    service
        .reconcile_observation(&Observation::new("4111", day(5, 31), 10))
        .await
        .unwrap();
    assert_eq!(stored(&store, "4111").await.len(), 31);
}

#[tokio::test]
async fn test_matching_observation_leaves_contiguous_ledger_alone() {
    let store = store_with_cards(&["4111"]).await;
    let contiguous = [(day(6, 1), 10), (day(6, 2), 20), (day(6, 3), 30)];
    seed(&store, "4111", &contiguous).await;
    let service = ReconciliationService::new(store.clone());

    let effect = service
        .reconcile_observation(&Observation::new("4111", day(6, 2), 20))
        .await
        .unwrap();

    assert_eq!(effect, ReconcileEffect::Unchanged);
    assert_eq!(stored(&store, "4111").await, entries(&contiguous));
}

#[tokio::test]
async fn test_empty_card_number_is_rejected() {
    let store = store_with_cards(&["4111"]).await;
    let service = ReconciliationService::new(store);

    let result = service
        .reconcile_observation(&Observation::new("  ", day(6, 2), 20))
        .await;
    assert!(matches!(result, Err(LedgerError::CardNotFound(n)) if n == "  "));
}

#[tokio::test]
async fn test_default_config_caps_far_future_observation() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(5, 1), 50)]).await;
    let service = ReconciliationService::new(store.clone());

    let result = service
        .reconcile_observation(&Observation::new("4111", NaiveDate::MAX, 10))
        .await;

    assert!(matches!(
        result,
        Err(LedgerError::ExtensionTooLarge {
            limit: DEFAULT_MAX_EXTENSION_DAYS,
            ..
        })
    ));
    assert_eq!(stored(&store, "4111").await, entries(&[(day(5, 1), 50)]));
}

#[tokio::test]
async fn test_overflowing_observation_fails_only_its_item() {
    let store = store_with_cards(&["4111", "4222"]).await;
    seed(&store, "4111", &[(day(5, 1), -1)]).await;
    let service = ReconciliationService::new(store.clone());

    let report = service
        .reconcile_batch(&[
            Observation::new("4111", day(5, 1), i64::MAX),
            Observation::new("4222", day(5, 1), 75),
        ])
        .await;

    assert!(!report.is_success());
    assert!(matches!(
        report.outcomes[0].error(),
        Some(LedgerError::BalanceOverflow(d)) if *d == day(5, 1)
    ));
    assert!(report.outcomes[1].is_applied());
    assert_eq!(stored(&store, "4111").await, entries(&[(day(5, 1), -1)]));
    assert_eq!(stored(&store, "4222").await, entries(&[(day(5, 1), 75)]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reconciliation_across_cards() {
    let numbers = ["4111", "4222", "4333", "4444"];
    let store = store_with_cards(&numbers).await;
    let service = Arc::new(ReconciliationService::new(store.clone()));

    let mut handles = Vec::new();
    for (i, number) in numbers.iter().enumerate() {
        let service = Arc::clone(&service);
        let observation = Observation::new(*number, day(7, 1 + i as u32), 100 * (i as i64 + 1));
        handles.push(tokio::spawn(async move {
            service.reconcile_observation(&observation).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for (i, number) in numbers.iter().enumerate() {
        assert_eq!(
            stored(&store, number).await,
            entries(&[(day(7, 1 + i as u32), 100 * (i as i64 + 1))])
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_same_card_observations_are_serialized() {
    let store = store_with_cards(&["4111"]).await;
    seed(&store, "4111", &[(day(7, 1), 500)]).await;
    let service = Arc::new(ReconciliationService::new(store.clone()));

    // every day carries 500, so any processing order ends at the same ledger
    let mut handles = Vec::new();
    for d in 2..=20 {
        let service = Arc::clone(&service);
        let observation = Observation::new("4111", day(7, d), 500);
        handles.push(tokio::spawn(async move {
            service.reconcile_observation(&observation).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ledger = stored(&store, "4111").await;
    assert_eq!(ledger.len(), 20);
    assert_eq!(ledger.first().map(|e| e.date), Some(day(7, 1)));
    assert_eq!(ledger.last().map(|e| e.date), Some(day(7, 20)));
    assert!(ledger.iter().all(|e| e.balance == Amount::from(500)));
}

#[tokio::test]
async fn test_account_management() {
    let store = MemoryStore::new();
    let accounts = AccountService::new(store.clone());

    let user = accounts
        .create_user("Grace Hopper".to_string(), "grace@example.com".to_string())
        .await
        .unwrap();
    accounts
        .add_card(user.id, "Navy Federal".to_string(), "5500".to_string())
        .await
        .unwrap();
    accounts
        .add_card(user.id, "Cobol Bank".to_string(), "4111".to_string())
        .await
        .unwrap();

    let cards = accounts.list_cards(user.id).await.unwrap();
    let numbers: Vec<_> = cards.iter().map(|c| c.number.as_str()).collect();
    assert_eq!(numbers, vec!["4111", "5500"]);
    assert_eq!(accounts.user_id_for_card("5500").await.unwrap(), user.id);

    let duplicate = accounts
        .add_card(user.id, "Other".to_string(), "5500".to_string())
        .await;
    assert!(matches!(duplicate, Err(LedgerError::Validation(_))));

    let stranger = uuid::Uuid::new_v4();
    assert!(accounts.list_cards(stranger).await.unwrap().is_empty());
    assert!(matches!(
        accounts
            .add_card(stranger, "Bank".to_string(), "9999".to_string())
            .await,
        Err(LedgerError::UserNotFound(id)) if id == stranger
    ));
    assert!(matches!(
        accounts.user_id_for_card("9999").await,
        Err(LedgerError::CardNotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_user_cascades_cards_and_ledgers() {
    let store = store_with_cards(&["4111"]).await;
    let accounts = AccountService::new(store.clone());
    let service = ReconciliationService::new(store.clone());
    service
        .reconcile_observation(&Observation::new("4111", day(5, 1), 50))
        .await
        .unwrap();
    assert_eq!(accounts.balance_history("4111").await.unwrap().len(), 1);

    let owner = accounts.user_id_for_card("4111").await.unwrap();
    accounts.delete_user(owner).await.unwrap();

    assert!(store.find_card_by_number("4111").await.unwrap().is_none());
    assert!(matches!(
        accounts.delete_user(owner).await,
        Err(LedgerError::UserNotFound(_))
    ));
    let report = service
        .reconcile_batch(&[Observation::new("4111", day(5, 2), 60)])
        .await;
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_invalid_user_is_rejected() {
    let accounts = AccountService::new(MemoryStore::new());
    let result = accounts
        .create_user("".to_string(), "nobody@example.com".to_string())
        .await;
    assert!(matches!(result, Err(LedgerError::Validation(_))));
}

#[test]
fn test_observation_payload_json() {
    let payload = r#"[{"card_number":"4111","date":"2024-04-11","balance":110}]"#;
    let observations: Vec<Observation> = serde_json::from_str(payload).unwrap();

    assert_eq!(observations, vec![Observation::new("4111", day(4, 11), 110)]);
    assert_eq!(
        serde_json::to_string(&observations).unwrap(),
        payload.to_string()
    );
}
