//! Category CRUD for both category kinds.
//!
//! The two tables differ only in the expense-side budget cap, so the public
//! operations take a [`CategoryKind`] and dispatch to the matching table.

use chrono::Utc;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, CategoryKind, EngineError, ResultEngine, commands::{CategoryPatch, NewCategoryCmd},
    expense_categories, income_categories,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Create a user-owned category. Fails with [`EngineError::DuplicateName`]
    /// when an active visible row already uses the name.
    pub async fn create_category(
        &self,
        kind: CategoryKind,
        cmd: NewCategoryCmd,
    ) -> ResultEngine<Category> {
        match kind {
            CategoryKind::Income => self.create_income_category(cmd).await,
            CategoryKind::Expense => self.create_expense_category(cmd).await,
        }
    }

    /// Partial update of a user-owned category.
    pub async fn update_category(
        &self,
        kind: CategoryKind,
        id: Uuid,
        user_id: &str,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        if patch.is_empty() {
            return Err(EngineError::Validation(
                "nothing to update".to_string(),
            ));
        }
        match kind {
            CategoryKind::Income => self.update_income_category(id, user_id, patch).await,
            CategoryKind::Expense => self.update_expense_category(id, user_id, patch).await,
        }
    }

    /// Soft-delete a user-owned category. Fails with [`EngineError::Conflict`]
    /// while the caller still has transactions in it.
    pub async fn delete_category(
        &self,
        kind: CategoryKind,
        id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        match kind {
            CategoryKind::Income => {
                with_tx!(self, |db_tx| {
                    let model = self.require_income_category_mutable(&db_tx, id, user_id).await?;
                    self.require_income_category_unreferenced(&db_tx, id, user_id)
                        .await?;
                    self.soft_delete_income_category(&db_tx, model).await
                })
            }
            CategoryKind::Expense => {
                with_tx!(self, |db_tx| {
                    let model = self.require_expense_category_mutable(&db_tx, id, user_id).await?;
                    self.require_expense_category_unreferenced(&db_tx, id, user_id)
                        .await?;
                    self.soft_delete_expense_category(&db_tx, model).await
                })
            }
        }
    }

    /// Active categories visible to the user, with the count of the caller's
    /// transactions per category. Ordered by `(display_order, name)`.
    pub async fn list_categories(
        &self,
        kind: CategoryKind,
        user_id: &str,
    ) -> ResultEngine<Vec<(Category, i64)>> {
        match kind {
            CategoryKind::Income => {
                with_tx!(self, |db_tx| {
                    let models = income_categories::Entity::find()
                        .filter(Self::income_category_visible(user_id))
                        .filter(income_categories::Column::IsActive.eq(true))
                        .order_by_asc(income_categories::Column::DisplayOrder)
                        .order_by_asc(income_categories::Column::Name)
                        .all(&db_tx)
                        .await?;
                    let counts = self
                        .reference_counts(&db_tx, "income", "category_id", user_id)
                        .await?;
                    Ok(models
                        .into_iter()
                        .map(|m| {
                            let count = counts.get(&m.id).copied().unwrap_or(0);
                            (Category::from(m), count)
                        })
                        .collect())
                })
            }
            CategoryKind::Expense => {
                with_tx!(self, |db_tx| {
                    let models = expense_categories::Entity::find()
                        .filter(Self::expense_category_visible(user_id))
                        .filter(expense_categories::Column::IsActive.eq(true))
                        .order_by_asc(expense_categories::Column::DisplayOrder)
                        .order_by_asc(expense_categories::Column::Name)
                        .all(&db_tx)
                        .await?;
                    let counts = self
                        .reference_counts(&db_tx, "expenses", "category_id", user_id)
                        .await?;
                    Ok(models
                        .into_iter()
                        .map(|m| {
                            let count = counts.get(&m.id).copied().unwrap_or(0);
                            (Category::from(m), count)
                        })
                        .collect())
                })
            }
        }
    }

    async fn create_income_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(&cmd.name, "category")?;
            if self
                .income_category_name_taken(&db_tx, &cmd.user_id, &name, None)
                .await?
            {
                return Err(EngineError::DuplicateName(name));
            }

            let now = Utc::now();
            let model = income_categories::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(Some(cmd.user_id)),
                name: Set(name),
                description: Set(normalize_optional_text(cmd.description.as_deref())),
                icon: Set(cmd.icon),
                color: Set(cmd.color),
                display_order: Set(cmd.display_order),
                is_default: Set(false),
                is_global: Set(false),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    async fn create_expense_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(&cmd.name, "category")?;
            if self
                .expense_category_name_taken(&db_tx, &cmd.user_id, &name, None)
                .await?
            {
                return Err(EngineError::DuplicateName(name));
            }

            let now = Utc::now();
            let model = expense_categories::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(Some(cmd.user_id)),
                name: Set(name),
                description: Set(normalize_optional_text(cmd.description.as_deref())),
                icon: Set(cmd.icon),
                color: Set(cmd.color),
                display_order: Set(cmd.display_order),
                monthly_budget_limit_minor: Set(cmd.monthly_budget_limit_minor),
                is_default: Set(false),
                is_global: Set(false),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(Category::from(model))
        })
    }

    async fn update_income_category(
        &self,
        id: Uuid,
        user_id: &str,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_income_category_mutable(&db_tx, id, user_id).await?;

            let name = match patch.name.as_deref() {
                Some(new_name) => {
                    let normalized = normalize_required_name(new_name, "category")?;
                    if self
                        .income_category_name_taken(&db_tx, user_id, &normalized, Some(id))
                        .await?
                    {
                        return Err(EngineError::DuplicateName(normalized));
                    }
                    Some(normalized)
                }
                None => None,
            };

            let mut active: income_categories::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = Set(name);
            }
            if let Some(description) = patch.description {
                active.description = Set(normalize_optional_text(Some(&description)));
            }
            if let Some(icon) = patch.icon {
                active.icon = Set(Some(icon));
            }
            if let Some(color) = patch.color {
                active.color = Set(Some(color));
            }
            if let Some(display_order) = patch.display_order {
                active.display_order = Set(display_order);
            }
            active.updated_at = Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }

    async fn update_expense_category(
        &self,
        id: Uuid,
        user_id: &str,
        patch: CategoryPatch,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_expense_category_mutable(&db_tx, id, user_id).await?;

            let name = match patch.name.as_deref() {
                Some(new_name) => {
                    let normalized = normalize_required_name(new_name, "category")?;
                    if self
                        .expense_category_name_taken(&db_tx, user_id, &normalized, Some(id))
                        .await?
                    {
                        return Err(EngineError::DuplicateName(normalized));
                    }
                    Some(normalized)
                }
                None => None,
            };

            let mut active: expense_categories::ActiveModel = model.into();
            if let Some(name) = name {
                active.name = Set(name);
            }
            if let Some(description) = patch.description {
                active.description = Set(normalize_optional_text(Some(&description)));
            }
            if let Some(icon) = patch.icon {
                active.icon = Set(Some(icon));
            }
            if let Some(color) = patch.color {
                active.color = Set(Some(color));
            }
            if let Some(display_order) = patch.display_order {
                active.display_order = Set(display_order);
            }
            if let Some(limit_minor) = patch.monthly_budget_limit_minor {
                active.monthly_budget_limit_minor = Set(Some(limit_minor));
            }
            active.updated_at = Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(Category::from(model))
        })
    }
}
