//! The unified ledger query: both transaction tables filtered, resolved
//! against their reference rows and merged into one ordered list.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    LedgerEntry, PaymentMethod, ResultEngine, TransactionKind, TransactionRecord, expenses, income,
};

use super::{Engine, with_tx};

/// Which side of the ledger to return.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LedgerKind {
    Income,
    Expense,
    #[default]
    Both,
}

/// Filters for the ledger query. All bounds are inclusive; unset fields do
/// not constrain the result.
///
/// `recipient_id` only applies to expenses and `source_id` only to income:
/// for the other kind the field is inapplicable and ignored.
#[derive(Clone, Debug, Default)]
pub struct LedgerFilter {
    pub kind: LedgerKind,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub amount_min_minor: Option<i64>,
    pub amount_max_minor: Option<i64>,
    pub payment_method: Option<PaymentMethod>,
    pub category_id: Option<Uuid>,
    pub recipient_id: Option<Uuid>,
    pub source_id: Option<Uuid>,
    /// Case-insensitive substring over notes, category name and counterparty
    /// name.
    pub search: Option<String>,
}

impl LedgerFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn kind(mut self, kind: LedgerKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    #[must_use]
    pub fn amount_range(mut self, min_minor: Option<i64>, max_minor: Option<i64>) -> Self {
        self.amount_min_minor = min_minor;
        self.amount_max_minor = max_minor;
        self
    }

    #[must_use]
    pub fn payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = Some(method);
        self
    }

    #[must_use]
    pub fn category_id(mut self, id: Uuid) -> Self {
        self.category_id = Some(id);
        self
    }

    #[must_use]
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }
}

/// Applies the table-independent filter bounds to a select over one of the
/// two transaction tables.
macro_rules! apply_range_filters {
    ($query:ident, $mod:ident, $filter:expr) => {
        if let Some(from) = $filter.date_from {
            $query = $query.filter($mod::Column::Date.gte(from));
        }
        if let Some(to) = $filter.date_to {
            $query = $query.filter($mod::Column::Date.lte(to));
        }
        if let Some(from) = $filter.time_from {
            $query = $query.filter($mod::Column::Time.gte(from));
        }
        if let Some(to) = $filter.time_to {
            $query = $query.filter($mod::Column::Time.lte(to));
        }
        if let Some(min) = $filter.amount_min_minor {
            $query = $query.filter($mod::Column::AmountMinor.gte(min));
        }
        if let Some(max) = $filter.amount_max_minor {
            $query = $query.filter($mod::Column::AmountMinor.lte(max));
        }
        if let Some(method) = $filter.payment_method {
            $query = $query.filter($mod::Column::PaymentMethod.eq(method.as_str()));
        }
        if let Some(category_id) = $filter.category_id {
            $query = $query.filter($mod::Column::CategoryId.eq(category_id));
        }
    };
}

/// Display fields of a resolved reference row.
struct Resolved {
    name: String,
    icon: Option<String>,
    color: Option<String>,
}

const DELETED_PLACEHOLDER: &str = "(deleted)";

impl Engine {
    /// The caller's transactions matching `filter`, newest first.
    ///
    /// Ties on the same date and time order income before expenses, then by
    /// most recent `created_at`.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &LedgerFilter,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        let wants_expenses = matches!(filter.kind, LedgerKind::Expense | LedgerKind::Both);
        let wants_income = matches!(filter.kind, LedgerKind::Income | LedgerKind::Both);

        with_tx!(self, |db_tx| {
            let mut records = Vec::new();

            if wants_expenses {
                let mut query =
                    expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id));
                apply_range_filters!(query, expenses, filter);
                if let Some(recipient_id) = filter.recipient_id {
                    query = query.filter(expenses::Column::RecipientId.eq(recipient_id));
                }
                for model in query.all(&db_tx).await? {
                    records.push(TransactionRecord::try_from(model)?);
                }
            }
            if wants_income {
                let mut query = income::Entity::find().filter(income::Column::UserId.eq(user_id));
                apply_range_filters!(query, income, filter);
                if let Some(source_id) = filter.source_id {
                    query = query.filter(income::Column::SourceId.eq(source_id));
                }
                for model in query.all(&db_tx).await? {
                    records.push(TransactionRecord::try_from(model)?);
                }
            }

            let income_category_ids = ids_of(&records, TransactionKind::Income, |r| r.category_id);
            let expense_category_ids =
                ids_of(&records, TransactionKind::Expense, |r| r.category_id);
            let source_ids = ids_of(&records, TransactionKind::Income, |r| r.counterparty_id);
            let recipient_ids = ids_of(&records, TransactionKind::Expense, |r| r.counterparty_id);

            let income_categories: HashMap<Uuid, Resolved> = self
                .income_categories_by_ids(&db_tx, income_category_ids)
                .await?
                .into_iter()
                .map(|m| (m.id, resolved(m.name, m.icon, m.color, m.is_active)))
                .collect();
            let expense_categories: HashMap<Uuid, Resolved> = self
                .expense_categories_by_ids(&db_tx, expense_category_ids)
                .await?
                .into_iter()
                .map(|m| (m.id, resolved(m.name, m.icon, m.color, m.is_active)))
                .collect();
            let source_names: HashMap<Uuid, String> = self
                .sources_by_ids(&db_tx, source_ids)
                .await?
                .into_iter()
                .map(|m| (m.id, display_name(m.name, m.is_active)))
                .collect();
            let recipient_names: HashMap<Uuid, String> = self
                .recipients_by_ids(&db_tx, recipient_ids)
                .await?
                .into_iter()
                .map(|m| (m.id, display_name(m.name, m.is_active)))
                .collect();

            let mut entries: Vec<LedgerEntry> = records
                .into_iter()
                .map(|record| {
                    let category = record.category_id.and_then(|id| match record.kind {
                        TransactionKind::Income => income_categories.get(&id),
                        TransactionKind::Expense => expense_categories.get(&id),
                    });
                    let counterparty_name =
                        record.counterparty_id.and_then(|id| match record.kind {
                            TransactionKind::Income => source_names.get(&id).cloned(),
                            TransactionKind::Expense => recipient_names.get(&id).cloned(),
                        });
                    LedgerEntry {
                        id: record.id,
                        kind: record.kind,
                        date: record.date,
                        time: record.time,
                        amount_minor: record.amount_minor,
                        currency: record.currency,
                        category_id: record.category_id,
                        category_name: category.map(|c| c.name.clone()),
                        category_icon: category.and_then(|c| c.icon.clone()),
                        category_color: category.and_then(|c| c.color.clone()),
                        counterparty_id: record.counterparty_id,
                        counterparty_name,
                        payment_method: record.payment_method,
                        transaction_reference: record.transaction_reference,
                        notes: record.notes,
                        tags: record.tags,
                        created_at: record.created_at,
                    }
                })
                .collect();

            if let Some(needle) = filter.search.as_deref() {
                let needle = needle.trim().to_lowercase();
                if !needle.is_empty() {
                    entries.retain(|entry| {
                        contains_ci(entry.notes.as_deref(), &needle)
                            || contains_ci(entry.category_name.as_deref(), &needle)
                            || contains_ci(entry.counterparty_name.as_deref(), &needle)
                    });
                }
            }

            entries.sort_by(|a, b| {
                b.date
                    .cmp(&a.date)
                    .then_with(|| b.time.cmp(&a.time))
                    .then_with(|| kind_rank(a.kind).cmp(&kind_rank(b.kind)))
                    .then_with(|| b.created_at.cmp(&a.created_at))
            });
            Ok(entries)
        })
    }
}

fn ids_of(
    records: &[TransactionRecord],
    kind: TransactionKind,
    pick: impl Fn(&TransactionRecord) -> Option<Uuid>,
) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = records
        .iter()
        .filter(|r| r.kind == kind)
        .filter_map(pick)
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn resolved(name: String, icon: Option<String>, color: Option<String>, is_active: bool) -> Resolved {
    Resolved {
        name: display_name(name, is_active),
        icon,
        color,
    }
}

fn display_name(name: String, is_active: bool) -> String {
    if is_active {
        name
    } else {
        DELETED_PLACEHOLDER.to_string()
    }
}

fn contains_ci(haystack: Option<&str>, lowercase_needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(lowercase_needle))
}

fn kind_rank(kind: TransactionKind) -> u8 {
    match kind {
        TransactionKind::Income => 0,
        TransactionKind::Expense => 1,
    }
}
