//! Category domain types shared by the two category tables.

use sea_orm::entity::prelude::Uuid;
use serde::{Deserialize, Serialize};

use crate::{EngineError, expense_categories, income_categories};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for CategoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid category kind: {other}"
            ))),
        }
    }
}

/// A category as exposed by the engine, regardless of the backing table.
///
/// `monthly_budget_limit_minor` is only ever `Some` for expense categories.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub kind: CategoryKind,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub display_order: i32,
    pub monthly_budget_limit_minor: Option<i64>,
    pub is_default: bool,
    pub is_global: bool,
    pub is_active: bool,
    pub owner: Option<String>,
}

impl From<income_categories::Model> for Category {
    fn from(model: income_categories::Model) -> Self {
        Self {
            id: model.id,
            kind: CategoryKind::Income,
            name: model.name,
            description: model.description,
            icon: model.icon,
            color: model.color,
            display_order: model.display_order,
            monthly_budget_limit_minor: None,
            is_default: model.is_default,
            is_global: model.is_global,
            is_active: model.is_active,
            owner: model.user_id,
        }
    }
}

impl From<expense_categories::Model> for Category {
    fn from(model: expense_categories::Model) -> Self {
        Self {
            id: model.id,
            kind: CategoryKind::Expense,
            name: model.name,
            description: model.description,
            icon: model.icon,
            color: model.color,
            display_order: model.display_order,
            monthly_budget_limit_minor: model.monthly_budget_limit_minor,
            is_default: model.is_default,
            is_global: model.is_global,
            is_active: model.is_active,
            owner: model.user_id,
        }
    }
}
