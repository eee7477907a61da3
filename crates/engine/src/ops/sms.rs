//! Recording pre-parsed bank SMS notifications.
//!
//! The engine receives the parsed payload, matches the payment identifier
//! against the user's recipients or sources, and records a transaction.
//! Unmatched payloads land in the fallback buckets.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, PaymentMethod, ResultEngine, TransactionKind, commands::NewTransactionCmd, util,
};

use super::Engine;

const SMS_TAG: &str = "sms-auto";

/// A bank SMS after parsing, as submitted by the client.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParsedSms {
    /// False for OTPs, promotions and balance alerts.
    pub is_transaction: bool,
    /// "credit" or "debit". Anything else is treated as a debit.
    pub transaction_direction: Option<String>,
    /// Decimal major-unit amount, e.g. "150.00".
    pub amount: Option<String>,
    /// UPI id, account fragment or similar counterparty handle.
    pub payment_identifier: Option<String>,
    pub transaction_reference: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub payment_method: Option<String>,
    /// Sender header of the SMS, e.g. "HDFCBK".
    pub bank_sender: Option<String>,
}

/// What the pipeline did with one payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum SmsOutcome {
    /// Not a transaction; nothing recorded.
    Skipped,
    Recorded(SmsRecorded),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SmsRecorded {
    pub kind: TransactionKind,
    pub transaction_id: Uuid,
    pub amount_minor: i64,
    /// Matched counterparty name, or the raw identifier when unmatched.
    pub counterparty_name: String,
    pub is_unmatched: bool,
}

impl Engine {
    /// Record one parsed SMS for the user.
    ///
    /// A missing amount, date or time is a validation error; a missing or
    /// unknown payment method degrades to [`PaymentMethod::Other`]. A failed
    /// identifier lookup is logged and treated as no match.
    pub async fn record_parsed_sms(
        &self,
        user_id: &str,
        sms: ParsedSms,
    ) -> ResultEngine<SmsOutcome> {
        if !sms.is_transaction {
            return Ok(SmsOutcome::Skipped);
        }

        let kind = match sms.transaction_direction.as_deref() {
            Some("credit") => TransactionKind::Income,
            _ => TransactionKind::Expense,
        };
        let amount_minor = util::parse_amount_minor(
            sms.amount
                .as_deref()
                .ok_or_else(|| EngineError::Validation("sms amount missing".to_string()))?,
        )?;
        let date = sms
            .date
            .ok_or_else(|| EngineError::Validation("sms date missing".to_string()))?;
        let time = sms
            .time
            .ok_or_else(|| EngineError::Validation("sms time missing".to_string()))?;
        let payment_method = match sms.payment_method.as_deref() {
            None => PaymentMethod::Other,
            Some(raw) => PaymentMethod::try_from(raw).unwrap_or_else(|_| {
                tracing::warn!(method = %raw, "unknown payment method in sms, using other");
                PaymentMethod::Other
            }),
        };

        let matched = self.match_counterparty(kind, &sms, user_id).await;
        let fallbacks = self.fallbacks();
        let (counterparty_id, category_id, counterparty_name, is_unmatched) = match matched {
            Some((id, default_category_id, name)) => {
                let category_id = default_category_id.unwrap_or(match kind {
                    TransactionKind::Income => fallbacks.income_category_id,
                    TransactionKind::Expense => fallbacks.expense_category_id,
                });
                (id, category_id, name, false)
            }
            None => {
                let (counterparty_id, category_id) = match kind {
                    TransactionKind::Income => {
                        (fallbacks.source_id, fallbacks.income_category_id)
                    }
                    TransactionKind::Expense => {
                        (fallbacks.recipient_id, fallbacks.expense_category_id)
                    }
                };
                let name = sms
                    .payment_identifier
                    .clone()
                    .or_else(|| sms.bank_sender.clone())
                    .unwrap_or_else(|| "Unknown".to_string());
                (counterparty_id, category_id, name, true)
            }
        };

        let mut cmd = NewTransactionCmd::new(kind, user_id, amount_minor, date, time)
            .category_id(category_id)
            .counterparty_id(counterparty_id)
            .payment_method(payment_method)
            .notes(format!("{date} {time} {counterparty_name}"))
            .tags(vec![SMS_TAG.to_string()]);
        if let Some(reference) = sms.transaction_reference {
            cmd = cmd.transaction_reference(reference);
        }
        let record = self.record_transaction(cmd).await?;

        Ok(SmsOutcome::Recorded(SmsRecorded {
            kind,
            transaction_id: record.id,
            amount_minor,
            counterparty_name,
            is_unmatched,
        }))
    }

    /// Identifier lookup for the matching counterparty table. A storage
    /// error here only costs the match, never the whole recording.
    async fn match_counterparty(
        &self,
        kind: TransactionKind,
        sms: &ParsedSms,
        user_id: &str,
    ) -> Option<(Uuid, Option<Uuid>, String)> {
        let identifier = sms.payment_identifier.as_deref()?;
        match kind {
            TransactionKind::Expense => {
                match self.lookup_recipient_by_identifier(identifier, user_id).await {
                    Ok(hit) => hit.map(|r| (r.id, r.default_category_id, r.name)),
                    Err(err) => {
                        tracing::warn!(error = %err, "recipient lookup failed, recording unmatched");
                        None
                    }
                }
            }
            TransactionKind::Income => {
                match self.lookup_source_by_identifier(identifier, user_id).await {
                    Ok(hit) => hit.map(|s| (s.id, s.default_category_id, s.name)),
                    Err(err) => {
                        tracing::warn!(error = %err, "source lookup failed, recording unmatched");
                        None
                    }
                }
            }
        }
    }
}
