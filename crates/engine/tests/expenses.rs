use chrono::{Duration, Utc};
use sea_orm::Database;

use engine::{Engine, EngineError, ExpenseFilter};
use migration::MigratorTrait;
use uuid::Uuid;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn create_expense_normalizes_text() {
    let engine = engine_with_db().await;

    let expense = engine
        .create_expense("alice", 1_250, "  Food ", Some("   "))
        .await
        .unwrap();
    assert_eq!(expense.category, "Food");
    assert_eq!(expense.note, None);

    let err = engine
        .create_expense("alice", 0, "Food", None)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));
    let err = engine
        .create_expense("alice", 100, "  ", None)
        .await
        .unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn list_filters_by_category_substring() {
    let engine = engine_with_db().await;

    engine.create_expense("alice", 100, "Food", None).await.unwrap();
    engine
        .create_expense("alice", 200, "Fast food", Some("burger"))
        .await
        .unwrap();
    engine.create_expense("alice", 300, "Rent", None).await.unwrap();
    engine.create_expense("bob", 400, "Food", None).await.unwrap();

    let all = engine
        .list_expenses("alice", &ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 3);

    let food = engine
        .list_expenses(
            "alice",
            &ExpenseFilter {
                category: Some("FOOD".to_string()),
                ..ExpenseFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(food.len(), 2);
    assert!(food.iter().all(|e| e.owner_id == "alice"));
}

#[tokio::test]
async fn list_filters_by_date_range() {
    let engine = engine_with_db().await;

    engine.create_expense("alice", 100, "Food", None).await.unwrap();

    let future = ExpenseFilter {
        from: Some(Utc::now() + Duration::days(1)),
        ..ExpenseFilter::default()
    };
    assert!(engine.list_expenses("alice", &future).await.unwrap().is_empty());

    let around_now = ExpenseFilter {
        from: Some(Utc::now() - Duration::days(1)),
        to: Some(Utc::now() + Duration::days(1)),
        ..ExpenseFilter::default()
    };
    assert_eq!(engine.list_expenses("alice", &around_now).await.unwrap().len(), 1);

    let inverted = ExpenseFilter {
        from: Some(Utc::now()),
        to: Some(Utc::now() - Duration::days(1)),
        ..ExpenseFilter::default()
    };
    let err = engine.list_expenses("alice", &inverted).await.unwrap_err();
    assert!(err.is_validation());
}

#[tokio::test]
async fn summary_groups_by_month_and_category() {
    let engine = engine_with_db().await;

    let rent = engine.create_expense("alice", 1_000, "Rent", None).await.unwrap();
    engine.create_expense("alice", 250, "Food", None).await.unwrap();
    engine.create_expense("alice", 750, "Food", None).await.unwrap();

    let summary = engine
        .expense_summary("alice", &ExpenseFilter::default())
        .await
        .unwrap();
    assert_eq!(summary.total_minor, 2_000);
    assert_eq!(summary.count, 3);
    assert_eq!(
        summary.by_category,
        vec![("Food".to_string(), 1_000), ("Rent".to_string(), 1_000)]
    );
    assert_eq!(summary.monthly.len(), 1);
    assert_eq!(summary.monthly[0].0, rent.month_key());
    assert_eq!(summary.monthly[0].1, 2_000);
}

#[tokio::test]
async fn delete_expense_is_owner_scoped() {
    let engine = engine_with_db().await;

    let expense = engine.create_expense("alice", 100, "Food", None).await.unwrap();

    let err = engine.delete_expense("bob", expense.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    let err = engine
        .delete_expense("alice", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    engine.delete_expense("alice", expense.id).await.unwrap();
    assert!(
        engine
            .list_expenses("alice", &ExpenseFilter::default())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn summary_rejects_totals_that_overflow() {
    let engine = engine_with_db().await;

    let half = i64::MAX / 2 + 1;
    engine.create_expense("alice", half, "Rent", None).await.unwrap();
    engine.create_expense("alice", half, "Rent", None).await.unwrap();

    let err = engine
        .expense_summary("alice", &ExpenseFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    // Listing still works, only the aggregate is out of range.
    assert_eq!(
        engine
            .list_expenses("alice", &ExpenseFilter::default())
            .await
            .unwrap()
            .len(),
        2
    );
}
