use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, LedgerFilter, LedgerKind, PaymentMethod, TransactionKind,
    commands::{NewRecipientCmd, NewTransactionCmd},
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

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn expense(amount: i64, d: u32, h: u32) -> NewTransactionCmd {
    NewTransactionCmd::new(TransactionKind::Expense, "alice", amount, day(d), at(h, 0))
}

fn income(amount: i64, d: u32, h: u32) -> NewTransactionCmd {
    NewTransactionCmd::new(TransactionKind::Income, "alice", amount, day(d), at(h, 0))
}

#[tokio::test]
async fn ledger_merges_both_tables_newest_first() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 10, 9)).await.unwrap();
    engine.record_transaction(income(200, 12, 9)).await.unwrap();
    engine.record_transaction(expense(300, 11, 9)).await.unwrap();

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    let amounts: Vec<i64> = entries.iter().map(|e| e.amount_minor).collect();
    assert_eq!(amounts, vec![200, 300, 100]);
}

#[tokio::test]
async fn same_instant_orders_income_before_expense() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 10, 9)).await.unwrap();
    engine.record_transaction(income(200, 10, 9)).await.unwrap();

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries[0].kind, TransactionKind::Income);
    assert_eq!(entries[1].kind, TransactionKind::Expense);
}

#[tokio::test]
async fn date_bounds_are_inclusive() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 9, 9)).await.unwrap();
    engine.record_transaction(expense(200, 10, 9)).await.unwrap();
    engine.record_transaction(expense(300, 12, 9)).await.unwrap();
    engine.record_transaction(expense(400, 13, 9)).await.unwrap();

    let filter = LedgerFilter::new().date_range(Some(day(10)), Some(day(12)));
    let entries = engine.list_transactions("alice", &filter).await.unwrap();
    let amounts: Vec<i64> = entries.iter().map(|e| e.amount_minor).collect();
    assert_eq!(amounts, vec![300, 200]);
}

#[tokio::test]
async fn time_bounds_are_inclusive() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 10, 8)).await.unwrap();
    engine.record_transaction(expense(200, 10, 10)).await.unwrap();
    engine.record_transaction(expense(300, 10, 12)).await.unwrap();
    engine.record_transaction(expense(400, 10, 14)).await.unwrap();

    let filter = LedgerFilter {
        time_from: Some(at(10, 0)),
        time_to: Some(at(12, 0)),
        ..LedgerFilter::default()
    };
    let entries = engine.list_transactions("alice", &filter).await.unwrap();
    let amounts: Vec<i64> = entries.iter().map(|e| e.amount_minor).collect();
    assert_eq!(amounts, vec![300, 200]);
}

#[tokio::test]
async fn kind_filter_drops_the_other_table() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 10, 9)).await.unwrap();
    engine.record_transaction(income(200, 10, 9)).await.unwrap();

    let filter = LedgerFilter::new().kind(LedgerKind::Income);
    let entries = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, TransactionKind::Income);
}

#[tokio::test]
async fn amount_and_payment_method_filters_apply() {
    let (engine, _db) = engine_with_db().await;

    engine
        .record_transaction(expense(100, 10, 9).payment_method(PaymentMethod::Upi))
        .await
        .unwrap();
    engine
        .record_transaction(expense(500, 10, 10).payment_method(PaymentMethod::Cash))
        .await
        .unwrap();
    engine
        .record_transaction(expense(900, 10, 11).payment_method(PaymentMethod::Upi))
        .await
        .unwrap();

    let filter = LedgerFilter::new()
        .amount_range(Some(200), None)
        .payment_method(PaymentMethod::Upi);
    let entries = engine.list_transactions("alice", &filter).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount_minor, 900);
}

#[tokio::test]
async fn recipient_filter_constrains_expenses_only() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Zomato"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(100, 10, 9).counterparty_id(recipient.id))
        .await
        .unwrap();
    engine.record_transaction(expense(150, 10, 10)).await.unwrap();
    engine.record_transaction(income(200, 10, 9)).await.unwrap();

    let filter = LedgerFilter {
        recipient_id: Some(recipient.id),
        ..LedgerFilter::default()
    };
    let entries = engine.list_transactions("alice", &filter).await.unwrap();
    // Income rows are untouched by an expense-side filter in a both query.
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].kind, TransactionKind::Income);
    assert_eq!(entries[1].kind, TransactionKind::Expense);
    assert_eq!(entries[1].counterparty_name.as_deref(), Some("Zomato"));
}

#[tokio::test]
async fn search_matches_notes_and_names_case_insensitively() {
    let (engine, _db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Zomato"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(100, 10, 9).counterparty_id(recipient.id))
        .await
        .unwrap();
    engine
        .record_transaction(expense(200, 10, 10).notes("train ticket"))
        .await
        .unwrap();
    engine.record_transaction(expense(300, 10, 11)).await.unwrap();

    let entries = engine
        .list_transactions("alice", &LedgerFilter::new().search("ZOMA"))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount_minor, 100);

    let entries = engine
        .list_transactions("alice", &LedgerFilter::new().search("Ticket"))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount_minor, 200);
}

#[tokio::test]
async fn soft_deleted_reference_renders_placeholder() {
    let (engine, db) = engine_with_db().await;

    let recipient = engine
        .create_recipient(NewRecipientCmd::new("alice", "Old Cafe"))
        .await
        .unwrap();
    engine
        .record_transaction(expense(100, 10, 9).counterparty_id(recipient.id))
        .await
        .unwrap();

    // Deactivate behind the engine's back; the API refuses while referenced.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE recipients SET is_active = 0 WHERE id = ?",
        vec![recipient.id.into()],
    ))
    .await
    .unwrap();

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries[0].counterparty_name.as_deref(), Some("(deleted)"));
}

#[tokio::test]
async fn other_users_transactions_are_invisible() {
    let (engine, _db) = engine_with_db().await;

    engine.record_transaction(expense(100, 10, 9)).await.unwrap();

    let entries = engine
        .list_transactions("bob", &LedgerFilter::default())
        .await
        .unwrap();
    assert!(entries.is_empty());
}
