use sea_orm::{DatabaseConnection, QueryFilter, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expense_categories, income_categories, recipients, sources};

mod categories;
mod entities;
mod ledger;
mod recipients_ops;
mod sms;
mod sources_ops;
mod transactions;

pub use ledger::{LedgerFilter, LedgerKind};
pub use sms::{ParsedSms, SmsOutcome, SmsRecorded};
pub use transactions::MonthlySummary;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Ids of the seeded "catch-all" rows the categorization pipeline falls back
/// to when a counterparty cannot be matched.
///
/// Resolved once at engine build time from [`FallbackConfig`]; never
/// hard-coded.
#[derive(Clone, Copy, Debug)]
pub struct FallbackBuckets {
    pub income_category_id: Uuid,
    pub expense_category_id: Uuid,
    pub recipient_id: Uuid,
    pub source_id: Uuid,
}

/// Names of the default rows used as fallback buckets.
#[derive(Clone, Debug)]
pub struct FallbackConfig {
    pub income_category: String,
    pub expense_category: String,
    pub recipient: String,
    pub source: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            income_category: "Other".to_string(),
            expense_category: "Other".to_string(),
            recipient: "Other".to_string(),
            source: "Other".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    home_currency: String,
    fallbacks: FallbackBuckets,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    pub fn fallbacks(&self) -> FallbackBuckets {
        self.fallbacks
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
pub struct EngineBuilder {
    database: DatabaseConnection,
    home_currency: String,
    fallbacks: FallbackConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            home_currency: "INR".to_string(),
            fallbacks: FallbackConfig::default(),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    pub fn home_currency(mut self, currency: impl Into<String>) -> EngineBuilder {
        self.home_currency = currency.into();
        self
    }

    pub fn fallbacks(mut self, fallbacks: FallbackConfig) -> EngineBuilder {
        self.fallbacks = fallbacks;
        self
    }

    /// Construct `Engine`, resolving the fallback bucket names against the
    /// seeded default rows. Fails fast when a configured name is missing.
    pub async fn build(self) -> ResultEngine<Engine> {
        let income_category_id = income_categories::Entity::find()
            .filter(income_categories::Column::IsDefault.eq(true))
            .filter(Expr::cust("LOWER(name)").eq(self.fallbacks.income_category.to_lowercase()))
            .one(&self.database)
            .await?
            .map(|model| model.id)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "default income category '{}'",
                    self.fallbacks.income_category
                ))
            })?;

        let expense_category_id = expense_categories::Entity::find()
            .filter(expense_categories::Column::IsDefault.eq(true))
            .filter(Expr::cust("LOWER(name)").eq(self.fallbacks.expense_category.to_lowercase()))
            .one(&self.database)
            .await?
            .map(|model| model.id)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "default expense category '{}'",
                    self.fallbacks.expense_category
                ))
            })?;

        let recipient_id = recipients::Entity::find()
            .filter(recipients::Column::IsDefault.eq(true))
            .filter(Expr::cust("LOWER(name)").eq(self.fallbacks.recipient.to_lowercase()))
            .one(&self.database)
            .await?
            .map(|model| model.id)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "default recipient '{}'",
                    self.fallbacks.recipient
                ))
            })?;

        let source_id = sources::Entity::find()
            .filter(sources::Column::IsDefault.eq(true))
            .filter(Expr::cust("LOWER(name)").eq(self.fallbacks.source.to_lowercase()))
            .one(&self.database)
            .await?
            .map(|model| model.id)
            .ok_or_else(|| {
                EngineError::NotFound(format!("default source '{}'", self.fallbacks.source))
            })?;

        Ok(Engine {
            database: self.database,
            home_currency: self.home_currency,
            fallbacks: FallbackBuckets {
                income_category_id,
                expense_category_id,
                recipient_id,
                source_id,
            },
        })
    }
}
