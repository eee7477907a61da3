//! Transaction CRUD, the monthly summary, and the used-payment-method list.
//!
//! Transactions are hard-deleted, unlike reference rows. A transaction id
//! that exists but belongs to another user is reported as not found.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryFilter, Statement, TransactionTrait,
    prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, PaymentMethod, ResultEngine, TransactionKind, TransactionRecord,
    commands::{NewTransactionCmd, UpdateTransactionCmd}, expenses, income,
    util::encode_tags,
};

use super::{Engine, normalize_optional_text, with_tx};

/// Income and expense totals for one calendar month, in minor units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlySummary {
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
}

impl MonthlySummary {
    pub fn net_minor(&self) -> i64 {
        self.total_income_minor - self.total_expense_minor
    }
}

impl Engine {
    pub async fn record_transaction(
        &self,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<TransactionRecord> {
        if cmd.amount_minor <= 0 {
            return Err(EngineError::Validation(
                "amount must be positive".to_string(),
            ));
        }
        let currency = cmd
            .currency
            .clone()
            .unwrap_or_else(|| self.home_currency.clone());

        with_tx!(self, |db_tx| {
            match cmd.kind {
                TransactionKind::Expense => {
                    if let Some(category_id) = cmd.category_id {
                        self.require_expense_category_visible(&db_tx, category_id, &cmd.user_id)
                            .await?;
                    }
                    if let Some(recipient_id) = cmd.counterparty_id {
                        self.require_recipient_visible(&db_tx, recipient_id, &cmd.user_id)
                            .await?;
                    }
                    let now = Utc::now();
                    let model = expenses::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(cmd.user_id),
                        date: Set(cmd.date),
                        time: Set(cmd.time),
                        amount_minor: Set(cmd.amount_minor),
                        currency: Set(currency),
                        category_id: Set(cmd.category_id),
                        recipient_id: Set(cmd.counterparty_id),
                        payment_method: Set(cmd.payment_method.as_str().to_string()),
                        transaction_reference: Set(normalize_optional_text(
                            cmd.transaction_reference.as_deref(),
                        )),
                        notes: Set(normalize_optional_text(cmd.notes.as_deref())),
                        tags: Set(encode_tags(&cmd.tags)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&db_tx)
                    .await?;
                    TransactionRecord::try_from(model)
                }
                TransactionKind::Income => {
                    if let Some(category_id) = cmd.category_id {
                        self.require_income_category_visible(&db_tx, category_id, &cmd.user_id)
                            .await?;
                    }
                    if let Some(source_id) = cmd.counterparty_id {
                        self.require_source_visible(&db_tx, source_id, &cmd.user_id)
                            .await?;
                    }
                    let now = Utc::now();
                    let model = income::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        user_id: Set(cmd.user_id),
                        date: Set(cmd.date),
                        time: Set(cmd.time),
                        amount_minor: Set(cmd.amount_minor),
                        currency: Set(currency),
                        category_id: Set(cmd.category_id),
                        source_id: Set(cmd.counterparty_id),
                        payment_method: Set(cmd.payment_method.as_str().to_string()),
                        transaction_reference: Set(normalize_optional_text(
                            cmd.transaction_reference.as_deref(),
                        )),
                        notes: Set(normalize_optional_text(cmd.notes.as_deref())),
                        tags: Set(encode_tags(&cmd.tags)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&db_tx)
                    .await?;
                    TransactionRecord::try_from(model)
                }
            }
        })
    }

    /// Partial update of one of the caller's transactions. Changed references
    /// are re-validated; unset fields keep their stored values.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<TransactionRecord> {
        if let Some(amount) = cmd.amount_minor {
            if amount <= 0 {
                return Err(EngineError::Validation(
                    "amount must be positive".to_string(),
                ));
            }
        }

        with_tx!(self, |db_tx| {
            match cmd.kind {
                TransactionKind::Expense => {
                    let model = expenses::Entity::find_by_id(cmd.transaction_id)
                        .filter(expenses::Column::UserId.eq(&*cmd.user_id))
                        .one(&db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound(format!("expense {}", cmd.transaction_id))
                        })?;
                    if let Some(category_id) = cmd.category_id {
                        self.require_expense_category_visible(&db_tx, category_id, &cmd.user_id)
                            .await?;
                    }
                    if let Some(recipient_id) = cmd.counterparty_id {
                        self.require_recipient_visible(&db_tx, recipient_id, &cmd.user_id)
                            .await?;
                    }

                    let mut active: expenses::ActiveModel = model.into();
                    if let Some(date) = cmd.date {
                        active.date = Set(date);
                    }
                    if let Some(time) = cmd.time {
                        active.time = Set(time);
                    }
                    if let Some(amount) = cmd.amount_minor {
                        active.amount_minor = Set(amount);
                    }
                    if let Some(category_id) = cmd.category_id {
                        active.category_id = Set(Some(category_id));
                    }
                    if let Some(recipient_id) = cmd.counterparty_id {
                        active.recipient_id = Set(Some(recipient_id));
                    }
                    if let Some(method) = cmd.payment_method {
                        active.payment_method = Set(method.as_str().to_string());
                    }
                    if let Some(reference) = cmd.transaction_reference {
                        active.transaction_reference =
                            Set(normalize_optional_text(Some(&reference)));
                    }
                    if let Some(notes) = cmd.notes {
                        active.notes = Set(normalize_optional_text(Some(&notes)));
                    }
                    if let Some(tags) = cmd.tags {
                        active.tags = Set(encode_tags(&tags));
                    }
                    active.updated_at = Set(Utc::now());

                    let model = active.update(&db_tx).await?;
                    TransactionRecord::try_from(model)
                }
                TransactionKind::Income => {
                    let model = income::Entity::find_by_id(cmd.transaction_id)
                        .filter(income::Column::UserId.eq(&*cmd.user_id))
                        .one(&db_tx)
                        .await?
                        .ok_or_else(|| {
                            EngineError::NotFound(format!("income {}", cmd.transaction_id))
                        })?;
                    if let Some(category_id) = cmd.category_id {
                        self.require_income_category_visible(&db_tx, category_id, &cmd.user_id)
                            .await?;
                    }
                    if let Some(source_id) = cmd.counterparty_id {
                        self.require_source_visible(&db_tx, source_id, &cmd.user_id)
                            .await?;
                    }

                    let mut active: income::ActiveModel = model.into();
                    if let Some(date) = cmd.date {
                        active.date = Set(date);
                    }
                    if let Some(time) = cmd.time {
                        active.time = Set(time);
                    }
                    if let Some(amount) = cmd.amount_minor {
                        active.amount_minor = Set(amount);
                    }
                    if let Some(category_id) = cmd.category_id {
                        active.category_id = Set(Some(category_id));
                    }
                    if let Some(source_id) = cmd.counterparty_id {
                        active.source_id = Set(Some(source_id));
                    }
                    if let Some(method) = cmd.payment_method {
                        active.payment_method = Set(method.as_str().to_string());
                    }
                    if let Some(reference) = cmd.transaction_reference {
                        active.transaction_reference =
                            Set(normalize_optional_text(Some(&reference)));
                    }
                    if let Some(notes) = cmd.notes {
                        active.notes = Set(normalize_optional_text(Some(&notes)));
                    }
                    if let Some(tags) = cmd.tags {
                        active.tags = Set(encode_tags(&tags));
                    }
                    active.updated_at = Set(Utc::now());

                    let model = active.update(&db_tx).await?;
                    TransactionRecord::try_from(model)
                }
            }
        })
    }

    /// Hard delete. Reference rows are soft-deleted instead, but a removed
    /// transaction is gone for good.
    pub async fn delete_transaction(
        &self,
        kind: TransactionKind,
        id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = match kind {
                TransactionKind::Expense => {
                    expenses::Entity::delete_many()
                        .filter(expenses::Column::Id.eq(id))
                        .filter(expenses::Column::UserId.eq(user_id))
                        .exec(&db_tx)
                        .await?
                        .rows_affected
                }
                TransactionKind::Income => {
                    income::Entity::delete_many()
                        .filter(income::Column::Id.eq(id))
                        .filter(income::Column::UserId.eq(user_id))
                        .exec(&db_tx)
                        .await?
                        .rows_affected
                }
            };
            if deleted == 0 {
                return Err(EngineError::NotFound(format!("{} {id}", kind.as_str())));
            }
            Ok(())
        })
    }

    /// Income and expense totals for one calendar month of the caller.
    pub async fn monthly_summary(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<MonthlySummary> {
        let from = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::Validation(format!("invalid month {year}-{month:02}")))?;
        let to = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| EngineError::Validation(format!("invalid month {year}-{month:02}")))?;

        let total_income_minor = self.sum_between(user_id, "income", from, to).await?;
        let total_expense_minor = self.sum_between(user_id, "expenses", from, to).await?;
        Ok(MonthlySummary {
            total_income_minor,
            total_expense_minor,
        })
    }

    async fn sum_between(
        &self,
        user_id: &str,
        table: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT COALESCE(SUM(amount_minor), 0) AS total \
                 FROM {table} \
                 WHERE user_id = ? AND date >= ? AND date < ?"
            ),
            vec![user_id.into(), from.into(), to.into()],
        );
        let row = self
            .database
            .query_one(stmt)
            .await?
            .ok_or_else(|| EngineError::Validation("summary query returned no row".to_string()))?;
        Ok(row.try_get("", "total")?)
    }

    /// Payment methods the user has actually recorded, in canonical order.
    pub async fn used_payment_methods(&self, user_id: &str) -> ResultEngine<Vec<PaymentMethod>> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT payment_method FROM expenses WHERE user_id = ? \
             UNION \
             SELECT payment_method FROM income WHERE user_id = ?",
            vec![user_id.into(), user_id.into()],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut seen = Vec::new();
        for row in rows {
            let raw: String = row.try_get("", "payment_method")?;
            match PaymentMethod::try_from(raw.as_str()) {
                Ok(method) => seen.push(method),
                Err(_) => tracing::warn!(method = %raw, "unknown payment method in store"),
            }
        }
        Ok(PaymentMethod::ALL
            .into_iter()
            .filter(|m| seen.contains(m))
            .collect())
    }
}
