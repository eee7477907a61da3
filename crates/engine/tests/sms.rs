use chrono::{NaiveDate, NaiveTime, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    CategoryKind, Engine, EngineError, LedgerFilter, ParsedSms, PaymentMethod, SmsOutcome,
    TransactionKind,
    commands::{NewCategoryCmd, NewRecipientCmd, NewSourceCmd},
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

fn debit_sms(identifier: Option<&str>) -> ParsedSms {
    ParsedSms {
        is_transaction: true,
        transaction_direction: Some("debit".to_string()),
        amount: Some("150.00".to_string()),
        payment_identifier: identifier.map(ToString::to_string),
        transaction_reference: Some("UPI/123456".to_string()),
        date: NaiveDate::from_ymd_opt(2026, 2, 10),
        time: NaiveTime::from_hms_opt(12, 30, 0),
        payment_method: Some("upi".to_string()),
        bank_sender: Some("HDFCBK".to_string()),
    }
}

#[tokio::test]
async fn non_transaction_sms_is_skipped() {
    let (engine, _db) = engine_with_db().await;

    let sms = ParsedSms {
        is_transaction: false,
        ..debit_sms(None)
    };
    let outcome = engine.record_parsed_sms("alice", sms).await.unwrap();
    assert_eq!(outcome, SmsOutcome::Skipped);

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn unmatched_debit_lands_in_fallback_buckets() {
    let (engine, _db) = engine_with_db().await;

    let outcome = engine
        .record_parsed_sms("alice", debit_sms(Some("pay@unknown")))
        .await
        .unwrap();
    let SmsOutcome::Recorded(recorded) = outcome else {
        panic!("expected a recorded outcome");
    };
    assert_eq!(recorded.kind, TransactionKind::Expense);
    assert_eq!(recorded.amount_minor, 15000);
    assert!(recorded.is_unmatched);
    assert_eq!(recorded.counterparty_name, "pay@unknown");

    let fallbacks = engine.fallbacks();
    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category_id, Some(fallbacks.expense_category_id));
    assert_eq!(entries[0].counterparty_id, Some(fallbacks.recipient_id));
    assert_eq!(entries[0].tags, vec!["sms-auto".to_string()]);
    assert_eq!(entries[0].payment_method, PaymentMethod::Upi);
}

#[tokio::test]
async fn matched_recipient_adopts_its_default_category() {
    let (engine, _db) = engine_with_db().await;

    let category = engine
        .create_category(CategoryKind::Expense, NewCategoryCmd::new("alice", "Eating out"))
        .await
        .unwrap();
    let recipient = engine
        .create_recipient(
            NewRecipientCmd::new("alice", "Zomato")
                .payment_identifier("ZOMATO@ybl")
                .default_category_id(category.id),
        )
        .await
        .unwrap();

    let outcome = engine
        .record_parsed_sms("alice", debit_sms(Some("zomato@YBL")))
        .await
        .unwrap();
    let SmsOutcome::Recorded(recorded) = outcome else {
        panic!("expected a recorded outcome");
    };
    assert!(!recorded.is_unmatched);
    assert_eq!(recorded.counterparty_name, "Zomato");

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries[0].category_id, Some(category.id));
    assert_eq!(entries[0].counterparty_id, Some(recipient.id));
}

#[tokio::test]
async fn credit_sms_matches_sources() {
    let (engine, _db) = engine_with_db().await;

    let source = engine
        .create_source(
            NewSourceCmd::new("alice", "Acme Corp").source_identifier("ACMEPAY"),
        )
        .await
        .unwrap();

    let sms = ParsedSms {
        transaction_direction: Some("credit".to_string()),
        payment_identifier: Some("acmepay".to_string()),
        amount: Some("50000".to_string()),
        ..debit_sms(None)
    };
    let outcome = engine.record_parsed_sms("alice", sms).await.unwrap();
    let SmsOutcome::Recorded(recorded) = outcome else {
        panic!("expected a recorded outcome");
    };
    assert_eq!(recorded.kind, TransactionKind::Income);
    assert_eq!(recorded.amount_minor, 5_000_000);
    assert!(!recorded.is_unmatched);

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries[0].counterparty_id, Some(source.id));
    // No default category on the source, so the fallback bucket applies.
    assert_eq!(
        entries[0].category_id,
        Some(engine.fallbacks().income_category_id)
    );
}

#[tokio::test]
async fn unknown_payment_method_degrades_to_other() {
    let (engine, _db) = engine_with_db().await;

    let sms = ParsedSms {
        payment_method: Some("imps-wire".to_string()),
        ..debit_sms(None)
    };
    let outcome = engine.record_parsed_sms("alice", sms).await.unwrap();
    assert!(matches!(outcome, SmsOutcome::Recorded(_)));

    let entries = engine
        .list_transactions("alice", &LedgerFilter::default())
        .await
        .unwrap();
    assert_eq!(entries[0].payment_method, PaymentMethod::Other);
}

#[tokio::test]
async fn missing_amount_or_date_is_a_validation_error() {
    let (engine, _db) = engine_with_db().await;

    let sms = ParsedSms {
        amount: None,
        ..debit_sms(None)
    };
    let err = engine.record_parsed_sms("alice", sms).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));

    let sms = ParsedSms {
        date: None,
        ..debit_sms(None)
    };
    let err = engine.record_parsed_sms("alice", sms).await.unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn unmatched_sender_without_identifier_uses_bank_sender() {
    let (engine, _db) = engine_with_db().await;

    let outcome = engine
        .record_parsed_sms("alice", debit_sms(None))
        .await
        .unwrap();
    let SmsOutcome::Recorded(recorded) = outcome else {
        panic!("expected a recorded outcome");
    };
    assert!(recorded.is_unmatched);
    assert_eq!(recorded.counterparty_name, "HDFCBK");
}
