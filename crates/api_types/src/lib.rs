use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Returns the canonical kind string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Upi,
    CreditCard,
    DebitCard,
    NetBanking,
    Wallet,
    Cash,
    Other,
}

impl PaymentMethod {
    /// Returns the canonical method string used by the engine/database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "upi",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::NetBanking => "net_banking",
            Self::Wallet => "wallet",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: Option<i32>,
        /// Expense categories only; ignored for income categories.
        pub monthly_budget_limit_minor: Option<i64>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: Option<i32>,
        pub monthly_budget_limit_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: i32,
        pub monthly_budget_limit_minor: Option<i64>,
        pub is_default: bool,
        pub is_global: bool,
        /// Number of the caller's transactions using this category.
        pub transaction_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryView>,
    }
}

pub mod recipient {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientNew {
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: Option<i32>,
        /// UPI id, account fragment or similar handle used for SMS matching.
        pub payment_identifier: Option<String>,
        pub contact: Option<String>,
        pub is_favorite: Option<bool>,
        pub default_category_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RecipientUpdate {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: i32,
        pub payment_identifier: Option<String>,
        pub contact: Option<String>,
        pub is_favorite: bool,
        pub default_category_id: Option<Uuid>,
        pub is_default: bool,
        pub is_global: bool,
        pub transaction_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecipientsResponse {
        pub recipients: Vec<RecipientView>,
    }
}

pub mod source {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SourceNew {
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: Option<i32>,
        /// Sender handle used for SMS matching.
        pub source_identifier: Option<String>,
        pub contact: Option<String>,
        /// Free-form, e.g. "employer" or "client".
        pub source_type: Option<String>,
        pub default_category_id: Option<Uuid>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SourceUpdate {
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SourceView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub display_order: i32,
        pub source_identifier: Option<String>,
        pub contact: Option<String>,
        pub source_type: Option<String>,
        pub default_category_id: Option<Uuid>,
        pub is_default: bool,
        pub is_global: bool,
        pub transaction_count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SourcesResponse {
        pub sources: Vec<SourceView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub date: NaiveDate,
        pub time: NaiveTime,
        /// Must be > 0, in minor units (paise).
        pub amount_minor: i64,
        /// Defaults to the server home currency.
        pub currency: Option<String>,
        pub category_id: Option<Uuid>,
        pub recipient_id: Option<Uuid>,
        pub payment_method: Option<PaymentMethod>,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Option<Vec<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub date: NaiveDate,
        pub time: NaiveTime,
        /// Must be > 0, in minor units (paise).
        pub amount_minor: i64,
        /// Defaults to the server home currency.
        pub currency: Option<String>,
        pub category_id: Option<Uuid>,
        pub source_id: Option<Uuid>,
        pub payment_method: Option<PaymentMethod>,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Option<Vec<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub date: Option<NaiveDate>,
        pub time: Option<NaiveTime>,
        pub amount_minor: Option<i64>,
        pub category_id: Option<Uuid>,
        pub recipient_id: Option<Uuid>,
        pub payment_method: Option<PaymentMethod>,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Option<Vec<String>>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub date: Option<NaiveDate>,
        pub time: Option<NaiveTime>,
        pub amount_minor: Option<i64>,
        pub category_id: Option<Uuid>,
        pub source_id: Option<Uuid>,
        pub payment_method: Option<PaymentMethod>,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Option<Vec<String>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub time: NaiveTime,
        pub amount_minor: i64,
        pub currency: String,
        pub category_id: Option<Uuid>,
        /// Recipient for expenses, source for income.
        pub counterparty_id: Option<Uuid>,
        pub payment_method: PaymentMethod,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Vec<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod ledger {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum LedgerKind {
        Income,
        Expense,
        #[default]
        Both,
    }

    /// Query string of `GET /transactions`. All bounds are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct LedgerQuery {
        pub kind: Option<LedgerKind>,
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
        /// Case-insensitive substring over notes and resolved names.
        pub search: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerEntryView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub date: NaiveDate,
        pub time: NaiveTime,
        pub amount_minor: i64,
        pub currency: String,
        pub category_id: Option<Uuid>,
        /// `"(deleted)"` when the category was soft-deleted.
        pub category_name: Option<String>,
        pub category_icon: Option<String>,
        pub category_color: Option<String>,
        pub counterparty_id: Option<Uuid>,
        /// `"(deleted)"` when the counterparty was soft-deleted.
        pub counterparty_name: Option<String>,
        pub payment_method: PaymentMethod,
        pub transaction_reference: Option<String>,
        pub notes: Option<String>,
        pub tags: Vec<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LedgerResponse {
        pub transactions: Vec<LedgerEntryView>,
    }
}

pub mod sms {
    use super::*;

    /// A bank SMS after client-side parsing.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsRecord {
        /// False for OTPs, promotions and balance alerts.
        pub is_transaction: bool,
        /// "credit" or "debit". Anything else is treated as a debit.
        pub transaction_direction: Option<String>,
        /// Decimal major-unit amount, e.g. "150.00".
        pub amount: Option<String>,
        pub payment_identifier: Option<String>,
        pub transaction_reference: Option<String>,
        pub date: Option<NaiveDate>,
        pub time: Option<NaiveTime>,
        pub payment_method: Option<String>,
        /// Sender header of the SMS, e.g. "HDFCBK".
        pub bank_sender: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SmsResponse {
        /// False when the payload was not a transaction.
        pub recorded: bool,
        pub kind: Option<TransactionKind>,
        pub transaction_id: Option<Uuid>,
        pub amount_minor: Option<i64>,
        /// Matched counterparty name, or the raw identifier when unmatched.
        pub counterparty_name: Option<String>,
        pub is_unmatched: Option<bool>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub year: i32,
        pub month: u32,
        pub total_income_minor: i64,
        pub total_expense_minor: i64,
        pub net_minor: i64,
    }
}

pub mod payment {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaymentMethodsResponse {
        /// Methods the user has actually recorded, in canonical order.
        pub payment_methods: Vec<PaymentMethod>,
    }
}
