//! Shared guards for the four reference tables.
//!
//! The tables share one shape and one rule set (visibility, active-only
//! uniqueness, system-row immutability, soft delete), so the per-table
//! methods are macro-generated.

use chrono::Utc;
use sea_orm::{
    ActiveValue, Condition, ConnectionTrait, DatabaseTransaction, PaginatorTrait, QueryFilter,
    prelude::*, sea_query::Expr,
};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, expense_categories, expenses, income, income_categories,
    recipients, sources};

use super::Engine;

/// Generates visibility, lookup, uniqueness, mutation-guard, reference-count
/// and soft-delete methods for one reference table.
macro_rules! impl_reference_guards {
    (
        $mod:ident,
        $label:literal,
        $visible_fn:ident,
        $find_fn:ident,
        $by_ids_fn:ident,
        $taken_fn:ident,
        $require_visible_fn:ident,
        $require_mutable_fn:ident,
        $require_unref_fn:ident,
        $soft_delete_fn:ident,
        $tx_mod:ident, $tx_ref_col:ident
    ) => {
        impl Engine {
            /// Rows a user can see: their own plus globals plus defaults.
            pub(super) fn $visible_fn(user_id: &str) -> Condition {
                Condition::any()
                    .add($mod::Column::UserId.eq(user_id))
                    .add($mod::Column::IsGlobal.eq(true))
                    .add($mod::Column::IsDefault.eq(true))
            }

            pub(super) async fn $find_fn(
                &self,
                db: &DatabaseTransaction,
                id: Uuid,
            ) -> ResultEngine<Option<$mod::Model>> {
                $mod::Entity::find_by_id(id).one(db).await.map_err(Into::into)
            }

            pub(super) async fn $by_ids_fn(
                &self,
                db: &DatabaseTransaction,
                ids: Vec<Uuid>,
            ) -> ResultEngine<Vec<$mod::Model>> {
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                $mod::Entity::find()
                    .filter($mod::Column::Id.is_in(ids))
                    .all(db)
                    .await
                    .map_err(Into::into)
            }

            /// True when an ACTIVE visible row already uses this name,
            /// case-insensitively. `exclude` skips the row being renamed.
            pub(super) async fn $taken_fn(
                &self,
                db: &DatabaseTransaction,
                user_id: &str,
                name: &str,
                exclude: Option<Uuid>,
            ) -> ResultEngine<bool> {
                let mut query = $mod::Entity::find()
                    .filter(Self::$visible_fn(user_id))
                    .filter($mod::Column::IsActive.eq(true))
                    .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()));
                if let Some(id) = exclude {
                    query = query.filter($mod::Column::Id.ne(id));
                }
                Ok(query.one(db).await?.is_some())
            }

            /// The row must exist, be active, and be visible to the user.
            /// Used when a transaction wants to reference it.
            pub(super) async fn $require_visible_fn(
                &self,
                db: &DatabaseTransaction,
                id: Uuid,
                user_id: &str,
            ) -> ResultEngine<$mod::Model> {
                let model = self
                    .$find_fn(db, id)
                    .await?
                    .filter(|m| m.is_active)
                    .ok_or_else(|| EngineError::NotFound(format!("{} {id}", $label)))?;
                let visible = model.user_id.as_deref() == Some(user_id)
                    || model.is_global
                    || model.is_default;
                if !visible {
                    return Err(EngineError::NotFound(format!("{} {id}", $label)));
                }
                Ok(model)
            }

            /// Guards shared by update and delete: the row must exist and be
            /// active, must not be a system row, and must belong to the caller.
            pub(super) async fn $require_mutable_fn(
                &self,
                db: &DatabaseTransaction,
                id: Uuid,
                user_id: &str,
            ) -> ResultEngine<$mod::Model> {
                let model = self
                    .$find_fn(db, id)
                    .await?
                    .filter(|m| m.is_active)
                    .ok_or_else(|| EngineError::NotFound(format!("{} {id}", $label)))?;
                if model.is_default || model.is_global {
                    return Err(EngineError::Forbidden(format!(
                        "{} '{}' is system managed",
                        $label, model.name
                    )));
                }
                if model.user_id.as_deref() != Some(user_id) {
                    return Err(EngineError::Forbidden(format!(
                        "{} '{}' belongs to another user",
                        $label, model.name
                    )));
                }
                Ok(model)
            }

            /// Deletion is blocked while any of the caller's transactions
            /// still references the row.
            pub(super) async fn $require_unref_fn(
                &self,
                db: &DatabaseTransaction,
                id: Uuid,
                user_id: &str,
            ) -> ResultEngine<()> {
                let referenced = $tx_mod::Entity::find()
                    .filter($tx_mod::Column::UserId.eq(user_id))
                    .filter($tx_mod::Column::$tx_ref_col.eq(id))
                    .count(db)
                    .await?;
                if referenced > 0 {
                    return Err(EngineError::Conflict(format!(
                        "{} is referenced by {referenced} transaction(s)",
                        $label
                    )));
                }
                Ok(())
            }

            pub(super) async fn $soft_delete_fn(
                &self,
                db: &DatabaseTransaction,
                model: $mod::Model,
            ) -> ResultEngine<()> {
                let mut active: $mod::ActiveModel = model.into();
                active.is_active = ActiveValue::Set(false);
                active.updated_at = ActiveValue::Set(Utc::now());
                active.update(db).await?;
                Ok(())
            }
        }
    };
}

impl Engine {
    /// Per-reference transaction counts for one of the caller's transaction
    /// tables, keyed by the referenced row id.
    pub(super) async fn reference_counts(
        &self,
        db: &DatabaseTransaction,
        table: &str,
        column: &str,
        user_id: &str,
    ) -> ResultEngine<std::collections::HashMap<Uuid, i64>> {
        let backend = db.get_database_backend();
        let stmt = sea_orm::Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT {column} AS ref_id, COUNT(*) AS cnt \
                 FROM {table} \
                 WHERE user_id = ? AND {column} IS NOT NULL \
                 GROUP BY {column}"
            ),
            vec![user_id.into()],
        );
        let rows = db.query_all(stmt).await?;
        let mut out = std::collections::HashMap::new();
        for row in rows {
            let id: Uuid = row.try_get("", "ref_id")?;
            let cnt: i64 = row.try_get("", "cnt")?;
            out.insert(id, cnt);
        }
        Ok(out)
    }
}

impl_reference_guards!(
    income_categories,
    "income category",
    income_category_visible,
    find_income_category,
    income_categories_by_ids,
    income_category_name_taken,
    require_income_category_visible,
    require_income_category_mutable,
    require_income_category_unreferenced,
    soft_delete_income_category,
    income,
    CategoryId
);

impl_reference_guards!(
    expense_categories,
    "expense category",
    expense_category_visible,
    find_expense_category,
    expense_categories_by_ids,
    expense_category_name_taken,
    require_expense_category_visible,
    require_expense_category_mutable,
    require_expense_category_unreferenced,
    soft_delete_expense_category,
    expenses,
    CategoryId
);

impl_reference_guards!(
    recipients,
    "recipient",
    recipient_visible,
    find_recipient,
    recipients_by_ids,
    recipient_name_taken,
    require_recipient_visible,
    require_recipient_mutable,
    require_recipient_unreferenced,
    soft_delete_recipient,
    expenses,
    RecipientId
);

impl_reference_guards!(
    sources,
    "source",
    source_visible,
    find_source,
    sources_by_ids,
    source_name_taken,
    require_source_visible,
    require_source_mutable,
    require_source_unreferenced,
    soft_delete_source,
    income,
    SourceId
);
