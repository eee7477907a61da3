use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    CategoryKind, Engine, EngineError, TransactionKind,
    commands::{CategoryPatch, NewCategoryCmd, NewRecipientCmd, NewTransactionCmd, RecipientPatch},
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (id, username, password, created_at) VALUES (?, ?, ?, ?)",
        vec![
            "alice".into(),
            "alice".into(),
            "password".into(),
            Utc::now().into(),
        ],
    ))
    .await
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 2, d).unwrap()
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

#[tokio::test]
async fn duplicate_names_are_rejected_case_insensitively() {
    let (engine, _db) = engine_with_db().await;

    engine
        .create_recipient(NewRecipientCmd::new("alice", "Zomato"))
        .await
        .unwrap();
    let err = engine
        .create_recipient(NewRecipientCmd::new("alice", "zomato"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateName(_)));
}

#[tokio::test]
async fn duplicate_against_seeded_default_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_category(CategoryKind::Income, NewCategoryCmd::new("alice", "salary"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::DuplicateName(_)));
}

#[tokio::test]
async fn seeded_default_rows_are_immutable() {
    let (engine, _db) = engine_with_db().await;

    let (salary, _) = engine
        .list_categories(CategoryKind::Income, "alice")
        .await
        .unwrap()
        .into_iter()
        .find(|(c, _)| c.name == "Salary")
        .unwrap();
    assert!(salary.is_default);

    let err = engine
        .update_category(
            CategoryKind::Income,
            salary.id,
            "alice",
            CategoryPatch::new().name("Wages"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .delete_category(CategoryKind::Income, salary.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn another_users_row_cannot_be_modified() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Landlord"))
        .await
        .unwrap();
    let err = engine
        .update_recipient(recipient.id, "bob", RecipientPatch::new().name("Mine"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn delete_is_blocked_while_referenced() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Zomato"))
        .await
        .unwrap();
    let expense = engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Expense, "alice", 25000, day(10), noon())
                .counterparty_id(recipient.id),
        )
        .await
        .unwrap();

    let err = engine
        .delete_recipient(recipient.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    engine
        .delete_transaction(TransactionKind::Expense, expense.id, "alice")
        .await
        .unwrap();
    engine.delete_recipient(recipient.id, "alice").await.unwrap();

    let names: Vec<String> = engine
        .list_recipients("alice")
        .await
        .unwrap()
        .into_iter()
        .map(|(r, _)| r.name)
        .collect();
    assert!(!names.contains(&"Zomato".to_string()));
}

#[tokio::test]
async fn deleted_reference_cannot_back_new_transactions() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Old Cafe"))
        .await
        .unwrap();
    engine.delete_recipient(recipient.id, "alice").await.unwrap();

    let err = engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Expense, "alice", 1000, day(10), noon())
                .counterparty_id(recipient.id),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn rename_to_own_name_is_allowed() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Cafe"))
        .await
        .unwrap();
    let updated = engine
        .update_recipient(recipient.id, "alice", RecipientPatch::new().name("Cafe"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Cafe");
}

#[tokio::test]
async fn empty_name_is_a_validation_error() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_recipient(NewRecipientCmd::new("alice", "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
