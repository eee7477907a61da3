//! SMS recording endpoint.

use api_types::sms::{SmsRecord, SmsResponse};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState, transactions::map_kind_out, user::AuthUser};
use engine::{ParsedSms, SmsOutcome};

pub async fn record(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<SmsRecord>,
) -> Result<(StatusCode, Json<SmsResponse>), ServerError> {
    let parsed = ParsedSms {
        is_transaction: payload.is_transaction,
        transaction_direction: payload.transaction_direction,
        amount: payload.amount,
        payment_identifier: payload.payment_identifier,
        transaction_reference: payload.transaction_reference,
        date: payload.date,
        time: payload.time,
        payment_method: payload.payment_method,
        bank_sender: payload.bank_sender,
    };

    match state.engine.record_parsed_sms(&account.id, parsed).await? {
        SmsOutcome::Skipped => Ok((
            StatusCode::OK,
            Json(SmsResponse {
                recorded: false,
                kind: None,
                transaction_id: None,
                amount_minor: None,
                counterparty_name: None,
                is_unmatched: None,
            }),
        )),
        SmsOutcome::Recorded(recorded) => Ok((
            StatusCode::CREATED,
            Json(SmsResponse {
                recorded: true,
                kind: Some(map_kind_out(recorded.kind)),
                transaction_id: Some(recorded.transaction_id),
                amount_minor: Some(recorded.amount_minor),
                counterparty_name: Some(recorded.counterparty_name),
                is_unmatched: Some(recorded.is_unmatched),
            }),
        )),
    }
}
