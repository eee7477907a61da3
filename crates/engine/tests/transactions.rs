use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CategoryKind, Engine, EngineError, LedgerFilter, PaymentMethod, TransactionKind,
    commands::{CategoryPatch, NewCategoryCmd, NewTransactionCmd, UpdateTransactionCmd},
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
async fn record_applies_home_currency_default() {
    let (engine, _db) = engine_with_db().await;

    let record = engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Expense,
            "alice",
            15000,
            day(10),
            noon(),
        ))
        .await
        .unwrap();
    assert_eq!(record.currency, "INR");
    assert_eq!(record.payment_method, PaymentMethod::Other);
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Expense,
            "alice",
            0,
            day(10),
            noon(),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn unknown_category_reference_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Expense, "alice", 1000, day(10), noon())
                .category_id(Uuid::new_v4()),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn partial_update_retains_unset_fields() {
    let (engine, _db) = engine_with_db().await;

    let record = engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Expense, "alice", 1000, day(10), noon())
                .notes("lunch")
                .tags(vec!["work".to_string()]),
        )
        .await
        .unwrap();

    let updated = engine
        .update_transaction(
            UpdateTransactionCmd::new(TransactionKind::Expense, record.id, "alice")
                .amount_minor(2500),
        )
        .await
        .unwrap();
    assert_eq!(updated.amount_minor, 2500);
    assert_eq!(updated.notes.as_deref(), Some("lunch"));
    assert_eq!(updated.tags, vec!["work".to_string()]);
    assert_eq!(updated.date, day(10));
}

#[tokio::test]
async fn update_by_non_owner_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let record = engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Income,
            "alice",
            1000,
            day(10),
            noon(),
        ))
        .await
        .unwrap();

    let err = engine
        .update_transaction(
            UpdateTransactionCmd::new(TransactionKind::Income, record.id, "bob").amount_minor(1),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn delete_is_hard_and_idempotence_fails() {
    let (engine, _db) = engine_with_db().await;

    let record = engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Expense,
            "alice",
            1000,
            day(10),
            noon(),
        ))
        .await
        .unwrap();

    engine
        .delete_transaction(TransactionKind::Expense, record.id, "alice")
        .await
        .unwrap();
    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert!(entries.is_empty());

    let err = engine
        .delete_transaction(TransactionKind::Expense, record.id, "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn monthly_summary_sums_only_the_month() {
    let (engine, _db) = engine_with_db().await;

    engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Income,
            "alice",
            100_000,
            day(1),
            noon(),
        ))
        .await
        .unwrap();
    engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Expense,
            "alice",
            30_000,
            day(28),
            noon(),
        ))
        .await
        .unwrap();
    engine
        .record_transaction(NewTransactionCmd::new(
            TransactionKind::Expense,
            "alice",
            99_000,
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            noon(),
        ))
        .await
        .unwrap();

    let summary = engine.monthly_summary("alice", 2026, 2).await.unwrap();
    assert_eq!(summary.total_income_minor, 100_000);
    assert_eq!(summary.total_expense_minor, 30_000);
    assert_eq!(summary.net_minor(), 70_000);
}

#[tokio::test]
async fn invalid_month_is_a_validation_error() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.monthly_summary("alice", 2026, 13).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn used_payment_methods_reflect_recorded_transactions() {
    let (engine, _db) = engine_with_db().await;

    assert!(engine.used_payment_methods("alice").await.unwrap().is_empty());

    engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Expense, "alice", 100, day(10), noon())
                .payment_method(PaymentMethod::Cash),
        )
        .await
        .unwrap();
    engine
        .record_transaction(
            NewTransactionCmd::new(TransactionKind::Income, "alice", 100, day(10), noon())
                .payment_method(PaymentMethod::Upi),
        )
        .await
        .unwrap();

    let methods = engine.used_payment_methods("alice").await.unwrap();
    assert_eq!(methods, vec![PaymentMethod::Upi, PaymentMethod::Cash]);
}

#[tokio::test]
async fn income_category_budget_field_is_ignored() {
    let (engine, _db) = engine_with_db().await;

    let category = engine
        .create_category(
            CategoryKind::Income,
            NewCategoryCmd::new("alice", "Freelance").monthly_budget_limit_minor(5_000),
        )
        .await
        .unwrap();
    assert_eq!(category.monthly_budget_limit_minor, None);

    let updated = engine
        .update_category(
            CategoryKind::Income,
            category.id,
            "alice",
            CategoryPatch::new().monthly_budget_limit_minor(9_000),
        )
        .await
        .unwrap();
    assert_eq!(updated.monthly_budget_limit_minor, None);
}
