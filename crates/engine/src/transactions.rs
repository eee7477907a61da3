//! Transaction domain types.
//!
//! Expenses and income live in two parallel tables; [`TransactionKind`] tags
//! which table a record came from, and [`LedgerEntry`] is the unified row
//! shape returned by the ledger query.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sea_orm::entity::prelude::Uuid;
use serde::{Deserialize, Serialize};

use crate::{EngineError, PaymentMethod, expenses, income, util};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// A single transaction row as stored, independent of table.
///
/// `counterparty_id` is the recipient for expenses and the source for income.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<Uuid>,
    pub counterparty_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<expenses::Model> for TransactionRecord {
    type Error = EngineError;

    fn try_from(model: expenses::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: TransactionKind::Expense,
            date: model.date,
            time: model.time,
            amount_minor: model.amount_minor,
            currency: model.currency,
            category_id: model.category_id,
            counterparty_id: model.recipient_id,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            transaction_reference: model.transaction_reference,
            notes: model.notes,
            tags: util::decode_tags(&model.tags),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl TryFrom<income::Model> for TransactionRecord {
    type Error = EngineError;

    fn try_from(model: income::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            kind: TransactionKind::Income,
            date: model.date,
            time: model.time,
            amount_minor: model.amount_minor,
            currency: model.currency,
            category_id: model.category_id,
            counterparty_id: model.source_id,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            transaction_reference: model.transaction_reference,
            notes: model.notes,
            tags: util::decode_tags(&model.tags),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// One row of the unified ledger: a transaction with its reference names
/// resolved for display.
///
/// A name is `None` when the transaction has no reference of that kind, and
/// the literal `"(deleted)"` when the referenced row has been soft-deleted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub amount_minor: i64,
    pub currency: String,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,
    pub counterparty_id: Option<Uuid>,
    pub counterparty_name: Option<String>,
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}
