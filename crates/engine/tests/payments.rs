use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use sea_orm::Database;

use engine::{
    CreditTarget, Currency, Engine, EngineError, GatewayOrder, GatewayOrderStatus,
    GoalActivityKind, OrderRequest, PaymentGateway, PaymentOrderState, PaymentPurpose,
    ResultEngine, WalletTransactionKind,
};
use migration::MigratorTrait;
use uuid::Uuid;

/// In-memory gateway; tests decide what `fetch_order` reports.
#[derive(Debug, Default)]
struct FakeGateway {
    orders: Mutex<HashMap<String, GatewayOrder>>,
    receipts: Mutex<Vec<String>>,
}

impl FakeGateway {
    fn set(&self, order_id: &str, status: GatewayOrderStatus, amount_minor: i64) {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(order_id).unwrap();
        order.status = status;
        order.amount_minor = amount_minor;
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: &OrderRequest) -> ResultEngine<GatewayOrder> {
        self.receipts.lock().unwrap().push(request.receipt.clone());
        let order = GatewayOrder {
            id: format!("order_{}", Uuid::new_v4().simple()),
            amount_minor: request.amount_minor,
            currency: request.currency,
            status: GatewayOrderStatus::Created,
        };
        self.orders
            .lock()
            .unwrap()
            .insert(order.id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, order_id: &str) -> ResultEngine<GatewayOrder> {
        self.orders
            .lock()
            .unwrap()
            .get(order_id)
            .cloned()
            .ok_or_else(|| EngineError::Upstream(format!("no order {order_id}")))
    }
}

async fn engine_with_gateway() -> (Engine, Arc<FakeGateway>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let gateway = Arc::new(FakeGateway::default());
    let engine = Engine::builder()
        .database(db)
        .payment_gateway(gateway.clone())
        .build()
        .await
        .unwrap();
    (engine, gateway)
}

#[tokio::test]
async fn create_order_persists_a_pending_order() {
    let (engine, gateway) = engine_with_gateway().await;

    let order = engine
        .create_payment_order("alice", 2_000, PaymentPurpose::Wallet)
        .await
        .unwrap();
    assert_eq!(order.state, PaymentOrderState::Created);
    assert_eq!(order.currency, Currency::Inr);
    assert_eq!(order.payment_id, None);

    let stored = engine.payment_order("alice", &order.order_id).await.unwrap();
    assert_eq!(stored.order_id, order.order_id);
    assert_eq!(stored.amount_minor, 2_000);

    let receipts = gateway.receipts.lock().unwrap();
    assert_eq!(receipts.len(), 1);
    assert!(receipts[0].starts_with("rcpt_"));
    assert_eq!(receipts[0].len(), "rcpt_".len() + 8);
}

#[tokio::test]
async fn create_order_validates_amount_and_goal() {
    let (engine, gateway) = engine_with_gateway().await;

    let err = engine
        .create_payment_order("alice", 0, PaymentPurpose::Wallet)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_payment_order(
            "alice",
            100,
            PaymentPurpose::Goal {
                goal_id: Uuid::new_v4(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(gateway.receipts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unpaid_order_is_not_credited() {
    let (engine, gateway) = engine_with_gateway().await;

    let order = engine
        .create_payment_order("alice", 2_000, PaymentPurpose::Wallet)
        .await
        .unwrap();

    let err = engine
        .confirm_payment("alice", &order.order_id, "pay_1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentNotConfirmed(_)));

    gateway.set(&order.order_id, GatewayOrderStatus::Attempted, 2_000);
    let err = engine
        .confirm_payment("alice", &order.order_id, "pay_1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentNotConfirmed(_)));

    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn paid_amount_must_match_the_order() {
    let (engine, gateway) = engine_with_gateway().await;

    let order = engine
        .create_payment_order("alice", 2_000, PaymentPurpose::Wallet)
        .await
        .unwrap();
    gateway.set(&order.order_id, GatewayOrderStatus::Paid, 1_000);

    let err = engine
        .confirm_payment("alice", &order.order_id, "pay_1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::PaymentNotConfirmed(_)));
    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn paid_wallet_order_is_credited_once() {
    let (engine, gateway) = engine_with_gateway().await;

    let order = engine
        .create_payment_order("alice", 2_000, PaymentPurpose::Wallet)
        .await
        .unwrap();
    gateway.set(&order.order_id, GatewayOrderStatus::Paid, 2_000);

    let credit = engine
        .confirm_payment("alice", &order.order_id, "pay_1")
        .await
        .unwrap();
    assert!(credit.newly_credited);
    assert_eq!(credit.order.state, PaymentOrderState::Credited);
    assert_eq!(credit.order.payment_id.as_deref(), Some("pay_1"));
    assert!(credit.order.credited_at.is_some());
    match &credit.target {
        CreditTarget::Wallet(wallet) => assert_eq!(wallet.balance_minor, 2_000),
        other => panic!("unexpected target: {other:?}"),
    }

    let again = engine
        .confirm_payment("alice", &order.order_id, "pay_1")
        .await
        .unwrap();
    assert!(!again.newly_credited);
    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 2_000);

    let txs = engine.wallet_transactions("alice").await.unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, WalletTransactionKind::Deposit);
    assert_eq!(txs[0].payment_id.as_deref(), Some("pay_1"));

    let err = engine
        .confirm_payment("alice", &order.order_id, "pay_2")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));
}

#[tokio::test]
async fn paid_goal_order_funds_the_goal() {
    let (engine, gateway) = engine_with_gateway().await;

    let goal = engine.create_goal("alice", "Bike", 3_000).await.unwrap();
    let order = engine
        .create_payment_order("alice", 3_000, PaymentPurpose::Goal { goal_id: goal.id })
        .await
        .unwrap();
    gateway.set(&order.order_id, GatewayOrderStatus::Paid, 3_000);

    let credit = engine
        .confirm_payment("alice", &order.order_id, "pay_goal")
        .await
        .unwrap();
    match &credit.target {
        CreditTarget::Goal(goal) => {
            assert_eq!(goal.saved_minor, 3_000);
            assert!(goal.reached());
        }
        other => panic!("unexpected target: {other:?}"),
    }

    let activity = engine.goal_activity("alice").await.unwrap();
    assert_eq!(activity.len(), 1);
    assert_eq!(activity[0].kind, GoalActivityKind::Add);
    assert_eq!(activity[0].payment_id.as_deref(), Some("pay_goal"));
    assert_eq!(engine.wallet("alice").await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn payment_for_a_deleted_goal_lands_in_the_wallet() {
    let (engine, gateway) = engine_with_gateway().await;

    let goal = engine.create_goal("alice", "Gone", 3_000).await.unwrap();
    let order = engine
        .create_payment_order("alice", 1_500, PaymentPurpose::Goal { goal_id: goal.id })
        .await
        .unwrap();
    engine
        .delete_goal_and_transfer("alice", goal.id)
        .await
        .unwrap();
    gateway.set(&order.order_id, GatewayOrderStatus::Paid, 1_500);

    let credit = engine
        .confirm_payment("alice", &order.order_id, "pay_late")
        .await
        .unwrap();
    match &credit.target {
        CreditTarget::Wallet(wallet) => assert_eq!(wallet.balance_minor, 1_500),
        other => panic!("unexpected target: {other:?}"),
    }
}

#[tokio::test]
async fn orders_are_scoped_to_their_owner() {
    let (engine, gateway) = engine_with_gateway().await;

    let order = engine
        .create_payment_order("alice", 500, PaymentPurpose::Wallet)
        .await
        .unwrap();
    gateway.set(&order.order_id, GatewayOrderStatus::Paid, 500);

    let err = engine
        .confirm_payment("bob", &order.order_id, "pay_1")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert_eq!(engine.wallet("bob").await.unwrap().balance_minor, 0);
}

#[tokio::test]
async fn payments_need_a_configured_gateway() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();

    let err = engine
        .create_payment_order("alice", 500, PaymentPurpose::Wallet)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Upstream(_)));
}
