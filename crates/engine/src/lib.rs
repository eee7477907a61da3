//! Core bookkeeping engine: categories, counterparties, the two transaction
//! tables and the unified ledger, plus the SMS recording pipeline.
//!
//! Everything goes through [`Engine`], built with [`Engine::builder`] on top
//! of a `sea_orm` connection to an already migrated database.

mod categories;
pub mod commands;
mod error;
pub mod expense_categories;
pub mod expenses;
pub mod income;
pub mod income_categories;
mod ops;
mod payment_method;
pub mod recipients;
pub mod sources;
mod transactions;
mod util;

pub use categories::{Category, CategoryKind};
pub use error::EngineError;
pub use ops::{
    Engine, EngineBuilder, FallbackBuckets, FallbackConfig, LedgerFilter, LedgerKind,
    MonthlySummary, ParsedSms, SmsOutcome, SmsRecorded,
};
pub use payment_method::PaymentMethod;
pub use recipients::Recipient;
pub use sources::Source;
pub use transactions::{LedgerEntry, TransactionKind, TransactionRecord};
pub use util::{format_amount_minor, parse_amount_minor};

pub type ResultEngine<T> = Result<T, EngineError>;
