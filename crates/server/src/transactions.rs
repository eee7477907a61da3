//! Transaction API endpoints: the unified ledger plus per-table CRUD.

use api_types::ledger::{LedgerEntryView, LedgerKind as ApiLedgerKind, LedgerQuery, LedgerResponse};
use api_types::transaction::{ExpenseNew, ExpenseUpdate, IncomeNew, IncomeUpdate, TransactionView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser};
use engine::{
    LedgerFilter, LedgerKind, PaymentMethod, TransactionKind, TransactionRecord,
    commands::{NewTransactionCmd, UpdateTransactionCmd},
};

pub(crate) fn map_kind_out(kind: TransactionKind) -> api_types::TransactionKind {
    match kind {
        TransactionKind::Income => api_types::TransactionKind::Income,
        TransactionKind::Expense => api_types::TransactionKind::Expense,
    }
}

pub(crate) fn map_method_in(method: api_types::PaymentMethod) -> PaymentMethod {
    match method {
        api_types::PaymentMethod::Upi => PaymentMethod::Upi,
        api_types::PaymentMethod::CreditCard => PaymentMethod::CreditCard,
        api_types::PaymentMethod::DebitCard => PaymentMethod::DebitCard,
        api_types::PaymentMethod::NetBanking => PaymentMethod::NetBanking,
        api_types::PaymentMethod::Wallet => PaymentMethod::Wallet,
        api_types::PaymentMethod::Cash => PaymentMethod::Cash,
        api_types::PaymentMethod::Other => PaymentMethod::Other,
    }
}

pub(crate) fn map_method_out(method: PaymentMethod) -> api_types::PaymentMethod {
    match method {
        PaymentMethod::Upi => api_types::PaymentMethod::Upi,
        PaymentMethod::CreditCard => api_types::PaymentMethod::CreditCard,
        PaymentMethod::DebitCard => api_types::PaymentMethod::DebitCard,
        PaymentMethod::NetBanking => api_types::PaymentMethod::NetBanking,
        PaymentMethod::Wallet => api_types::PaymentMethod::Wallet,
        PaymentMethod::Cash => api_types::PaymentMethod::Cash,
        PaymentMethod::Other => api_types::PaymentMethod::Other,
    }
}

fn record_view(record: TransactionRecord) -> TransactionView {
    TransactionView {
        id: record.id,
        kind: map_kind_out(record.kind),
        date: record.date,
        time: record.time,
        amount_minor: record.amount_minor,
        currency: record.currency,
        category_id: record.category_id,
        counterparty_id: record.counterparty_id,
        payment_method: map_method_out(record.payment_method),
        transaction_reference: record.transaction_reference,
        notes: record.notes,
        tags: record.tags,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub async fn list(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<LedgerQuery>,
) -> Result<Json<LedgerResponse>, ServerError> {
    let filter = LedgerFilter {
        kind: match query.kind.unwrap_or_default() {
            ApiLedgerKind::Income => LedgerKind::Income,
            ApiLedgerKind::Expense => LedgerKind::Expense,
            ApiLedgerKind::Both => LedgerKind::Both,
        },
        date_from: query.date_from,
        date_to: query.date_to,
        time_from: query.time_from,
        time_to: query.time_to,
        amount_min_minor: query.amount_min_minor,
        amount_max_minor: query.amount_max_minor,
        payment_method: query.payment_method.map(map_method_in),
        category_id: query.category_id,
        recipient_id: query.recipient_id,
        source_id: query.source_id,
        search: query.search,
    };

    let transactions = state
        .engine
        .list_transactions(&account.id, &filter)
        .await?
        .into_iter()
        .map(|entry| LedgerEntryView {
            id: entry.id,
            kind: map_kind_out(entry.kind),
            date: entry.date,
            time: entry.time,
            amount_minor: entry.amount_minor,
            currency: entry.currency,
            category_id: entry.category_id,
            category_name: entry.category_name,
            category_icon: entry.category_icon,
            category_color: entry.category_color,
            counterparty_id: entry.counterparty_id,
            counterparty_name: entry.counterparty_name,
            payment_method: map_method_out(entry.payment_method),
            transaction_reference: entry.transaction_reference,
            notes: entry.notes,
            tags: entry.tags,
            created_at: entry.created_at,
        })
        .collect();
    Ok(Json(LedgerResponse { transactions }))
}

pub async fn expense_new(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = NewTransactionCmd::new(
        TransactionKind::Expense,
        &account.id,
        payload.amount_minor,
        payload.date,
        payload.time,
    );
    cmd.currency = payload.currency;
    cmd.category_id = payload.category_id;
    cmd.counterparty_id = payload.recipient_id;
    cmd.payment_method = payload
        .payment_method
        .map(map_method_in)
        .unwrap_or(PaymentMethod::Other);
    cmd.transaction_reference = payload.transaction_reference;
    cmd.notes = payload.notes;
    cmd.tags = payload.tags.unwrap_or_default();

    let record = state.engine.record_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(record_view(record))))
}

pub async fn income_new(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = NewTransactionCmd::new(
        TransactionKind::Income,
        &account.id,
        payload.amount_minor,
        payload.date,
        payload.time,
    );
    cmd.currency = payload.currency;
    cmd.category_id = payload.category_id;
    cmd.counterparty_id = payload.source_id;
    cmd.payment_method = payload
        .payment_method
        .map(map_method_in)
        .unwrap_or(PaymentMethod::Other);
    cmd.transaction_reference = payload.transaction_reference;
    cmd.notes = payload.notes;
    cmd.tags = payload.tags.unwrap_or_default();

    let record = state.engine.record_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(record_view(record))))
}

pub async fn expense_update(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(TransactionKind::Expense, id, &account.id);
    cmd.date = payload.date;
    cmd.time = payload.time;
    cmd.amount_minor = payload.amount_minor;
    cmd.category_id = payload.category_id;
    cmd.counterparty_id = payload.recipient_id;
    cmd.payment_method = payload.payment_method.map(map_method_in);
    cmd.transaction_reference = payload.transaction_reference;
    cmd.notes = payload.notes;
    cmd.tags = payload.tags;

    let record = state.engine.update_transaction(cmd).await?;
    Ok(Json(record_view(record)))
}

pub async fn income_update(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IncomeUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(TransactionKind::Income, id, &account.id);
    cmd.date = payload.date;
    cmd.time = payload.time;
    cmd.amount_minor = payload.amount_minor;
    cmd.category_id = payload.category_id;
    cmd.counterparty_id = payload.source_id;
    cmd.payment_method = payload.payment_method.map(map_method_in);
    cmd.transaction_reference = payload.transaction_reference;
    cmd.notes = payload.notes;
    cmd.tags = payload.tags;

    let record = state.engine.update_transaction(cmd).await?;
    Ok(Json(record_view(record)))
}

pub async fn expense_delete(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(TransactionKind::Expense, id, &account.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn income_delete(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(TransactionKind::Income, id, &account.id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
