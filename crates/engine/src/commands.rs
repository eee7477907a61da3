//! Command structs for engine operations.
//!
//! These types group parameters for write operations (reference entities and
//! transactions), keeping call sites readable and avoiding long argument
//! lists. Patch structs follow partial-update semantics: a `None` field
//! retains the stored value.

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::{PaymentMethod, TransactionKind};

/// Create a category (income or expense, chosen at the call site).
#[derive(Clone, Debug)]
pub struct NewCategoryCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    /// Expense categories only; ignored for income categories.
    pub monthly_budget_limit_minor: Option<i64>,
}

impl NewCategoryCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            icon: None,
            color: None,
            display_order: 0,
            monthly_budget_limit_minor: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    #[must_use]
    pub fn monthly_budget_limit_minor(mut self, limit_minor: i64) -> Self {
        self.monthly_budget_limit_minor = Some(limit_minor);
        self
    }
}

/// Partial update for a category.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    /// Expense categories only; ignored for income categories.
    pub monthly_budget_limit_minor: Option<i64>,
}

impl CategoryPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn display_order(mut self, display_order: i32) -> Self {
        self.display_order = Some(display_order);
        self
    }

    #[must_use]
    pub fn monthly_budget_limit_minor(mut self, limit_minor: i64) -> Self {
        self.monthly_budget_limit_minor = Some(limit_minor);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.display_order.is_none()
            && self.monthly_budget_limit_minor.is_none()
    }
}

/// Create a recipient (expense counterparty).
#[derive(Clone, Debug)]
pub struct NewRecipientCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub payment_identifier: Option<String>,
    pub contact: Option<String>,
    pub is_favorite: bool,
    pub default_category_id: Option<Uuid>,
}

impl NewRecipientCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            icon: None,
            color: None,
            display_order: 0,
            payment_identifier: None,
            contact: None,
            is_favorite: false,
            default_category_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    #[must_use]
    pub fn payment_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.payment_identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    #[must_use]
    pub fn is_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = is_favorite;
        self
    }

    #[must_use]
    pub fn default_category_id(mut self, category_id: Uuid) -> Self {
        self.default_category_id = Some(category_id);
        self
    }
}

/// Partial update for a recipient.
#[derive(Clone, Debug, Default)]
pub struct RecipientPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub payment_identifier: Option<String>,
    pub contact: Option<String>,
    pub is_favorite: Option<bool>,
    pub default_category_id: Option<Uuid>,
}

impl RecipientPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn payment_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.payment_identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    #[must_use]
    pub fn is_favorite(mut self, is_favorite: bool) -> Self {
        self.is_favorite = Some(is_favorite);
        self
    }

    #[must_use]
    pub fn default_category_id(mut self, category_id: Uuid) -> Self {
        self.default_category_id = Some(category_id);
        self
    }
}

/// Create a source (income counterparty).
#[derive(Clone, Debug)]
pub struct NewSourceCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub source_identifier: Option<String>,
    pub contact: Option<String>,
    pub source_type: Option<String>,
    pub default_category_id: Option<Uuid>,
}

impl NewSourceCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            icon: None,
            color: None,
            display_order: 0,
            source_identifier: None,
            contact: None,
            source_type: None,
            default_category_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }

    #[must_use]
    pub fn source_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.source_identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    #[must_use]
    pub fn source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    #[must_use]
    pub fn default_category_id(mut self, category_id: Uuid) -> Self {
        self.default_category_id = Some(category_id);
        self
    }
}

/// Partial update for a source.
#[derive(Clone, Debug, Default)]
pub struct SourcePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: Option<i32>,
    pub source_identifier: Option<String>,
    pub contact: Option<String>,
    pub source_type: Option<String>,
    pub default_category_id: Option<Uuid>,
}

impl SourcePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn source_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.source_identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    #[must_use]
    pub fn source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = Some(source_type.into());
        self
    }

    #[must_use]
    pub fn default_category_id(mut self, category_id: Uuid) -> Self {
        self.default_category_id = Some(category_id);
        self
    }
}

/// Create a transaction in either table.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub kind: TransactionKind,
    pub user_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub amount_minor: i64,
    /// Defaults to the engine home currency when `None`.
    pub currency: Option<String>,
    pub category_id: Option<Uuid>,
    /// Recipient for expenses, source for income.
    pub counterparty_id: Option<Uuid>,
    pub payment_method: PaymentMethod,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn new(
        kind: TransactionKind,
        user_id: impl Into<String>,
        amount_minor: i64,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Self {
        Self {
            kind,
            user_id: user_id.into(),
            date,
            time,
            amount_minor,
            currency: None,
            category_id: None,
            counterparty_id: None,
            payment_method: PaymentMethod::Other,
            transaction_reference: None,
            notes: None,
            tags: Vec::new(),
        }
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn counterparty_id(mut self, counterparty_id: Uuid) -> Self {
        self.counterparty_id = Some(counterparty_id);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = payment_method;
        self
    }

    #[must_use]
    pub fn transaction_reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Update an existing transaction. Unset fields retain stored values.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub kind: TransactionKind,
    pub transaction_id: Uuid,
    pub user_id: String,

    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub amount_minor: Option<i64>,
    pub category_id: Option<Uuid>,
    pub counterparty_id: Option<Uuid>,
    pub payment_method: Option<PaymentMethod>,
    pub transaction_reference: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(kind: TransactionKind, transaction_id: Uuid, user_id: impl Into<String>) -> Self {
        Self {
            kind,
            transaction_id,
            user_id: user_id.into(),
            date: None,
            time: None,
            amount_minor: None,
            category_id: None,
            counterparty_id: None,
            payment_method: None,
            transaction_reference: None,
            notes: None,
            tags: None,
        }
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn time(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn amount_minor(mut self, amount_minor: i64) -> Self {
        self.amount_minor = Some(amount_minor);
        self
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn counterparty_id(mut self, counterparty_id: Uuid) -> Self {
        self.counterparty_id = Some(counterparty_id);
        self
    }

    #[must_use]
    pub fn payment_method(mut self, payment_method: PaymentMethod) -> Self {
        self.payment_method = Some(payment_method);
        self
    }

    #[must_use]
    pub fn transaction_reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }
}
