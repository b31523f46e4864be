use sea_orm::Database;

use engine::{Engine, EngineError};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

#[tokio::test]
async fn issued_token_authenticates_until_revoked() {
    let engine = engine_with_db().await;

    engine.create_user("alice").await.unwrap();
    let token = engine.issue_token("alice").await.unwrap();
    assert_eq!(engine.authenticate(&token).await.unwrap(), "alice");

    engine.revoke_token(&token).await.unwrap();
    let err = engine.authenticate(&token).await.unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    let err = engine.revoke_token(&token).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn unknown_tokens_are_rejected() {
    let engine = engine_with_db().await;

    for token in ["", "   ", "not-a-token"] {
        let err = engine.authenticate(token).await.unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized(_)));
    }
}

#[tokio::test]
async fn users_are_unique_and_tokens_need_a_user() {
    let engine = engine_with_db().await;

    engine.create_user("alice").await.unwrap();
    let err = engine.create_user("alice").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let err = engine.issue_token("bob").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn each_token_is_distinct() {
    let engine = engine_with_db().await;

    engine.create_user("alice").await.unwrap();
    let first = engine.issue_token("alice").await.unwrap();
    let second = engine.issue_token("alice").await.unwrap();
    assert_ne!(first, second);

    engine.revoke_token(&first).await.unwrap();
    assert_eq!(engine.authenticate(&second).await.unwrap(), "alice");
}

#[tokio::test]
async fn user_ids_are_trimmed_for_users_and_tokens() {
    let engine = engine_with_db().await;

    let user_id = engine.create_user(" bob ").await.unwrap();
    assert_eq!(user_id, "bob");

    let token = engine.issue_token(" bob ").await.unwrap();
    assert_eq!(engine.authenticate(&token).await.unwrap(), "bob");

    let err = engine.issue_token("   ").await.unwrap_err();
    assert!(err.is_validation());
}
