use sea_orm::Database;

use engine::{Engine, EngineError, WalletTransactionKind};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn wallet_is_created_on_first_access() {
    let engine = engine_with_db().await;

    let wallet = engine.wallet("alice").await.unwrap();
    assert_eq!(wallet.owner_id, "alice");
    assert_eq!(wallet.balance_minor, 0);

    // A second access returns the same wallet rather than a new one.
    engine.deposit("alice", 500).await.unwrap();
    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 500);
}

#[tokio::test]
async fn deposit_and_withdraw_keep_a_ledger() {
    let engine = engine_with_db().await;

    let wallet = engine.deposit("alice", 10_000).await.unwrap();
    assert_eq!(wallet.balance_minor, 10_000);
    let wallet = engine.withdraw("alice", 2_500).await.unwrap();
    assert_eq!(wallet.balance_minor, 7_500);

    let txs = engine.wallet_transactions("alice").await.unwrap();
    assert_eq!(txs.len(), 2);
    let deposits: i64 = txs
        .iter()
        .filter(|tx| tx.kind == WalletTransactionKind::Deposit)
        .map(|tx| tx.amount_minor)
        .sum();
    let withdrawals: i64 = txs
        .iter()
        .filter(|tx| tx.kind == WalletTransactionKind::Withdraw)
        .map(|tx| tx.amount_minor)
        .sum();
    assert_eq!(deposits - withdrawals, 7_500);
}

#[tokio::test]
async fn withdraw_more_than_balance_changes_nothing() {
    let engine = engine_with_db().await;

    engine.deposit("alice", 10_000).await.unwrap();
    let err = engine.withdraw("alice", 15_000).await.unwrap_err();
    assert!(matches!(err, EngineError::InsufficientFunds(_)));

    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 10_000);
    assert_eq!(engine.wallet_transactions("alice").await.unwrap().len(), 1);

    // Exactly the balance is allowed.
    let wallet = engine.withdraw("alice", 10_000).await.unwrap();
    assert_eq!(wallet.balance_minor, 0);
}

#[tokio::test]
async fn withdraw_without_wallet_is_not_found() {
    let engine = engine_with_db().await;

    let err = engine.withdraw("alice", 1).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let engine = engine_with_db().await;

    for amount in [0, -100] {
        let err = engine.deposit("alice", amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
        let err = engine.withdraw("alice", amount).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
    assert!(engine.wallet_transactions("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn wallets_are_per_owner() {
    let engine = engine_with_db().await;

    engine.deposit("alice", 700).await.unwrap();
    assert_eq!(engine.wallet("bob").await.unwrap().balance_minor, 0);
    assert!(engine.wallet_transactions("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn deposit_that_would_overflow_is_rejected() {
    let engine = engine_with_db().await;

    engine.deposit("alice", i64::MAX).await.unwrap();
    let err = engine.deposit("alice", 1).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, i64::MAX);
    assert_eq!(engine.wallet_transactions("alice").await.unwrap().len(), 1);
}
