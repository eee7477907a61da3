//! Income source CRUD and identifier lookup.

use chrono::Utc;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Source, commands::{NewSourceCmd, SourcePatch}, sources,
};

use super::{Engine, normalize_optional_text, normalize_required_name, recipients_ops::scope_rank,
    with_tx};

impl Engine {
    pub async fn create_source(&self, cmd: NewSourceCmd) -> ResultEngine<Source> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(&cmd.name, "source")?;
            if self
                .source_name_taken(&db_tx, &cmd.user_id, &name, None)
                .await?
            {
                return Err(EngineError::DuplicateName(name));
            }
            if let Some(category_id) = cmd.default_category_id {
                self.require_income_category_visible(&db_tx, category_id, &cmd.user_id)
                    .await?;
            }

            let now = Utc::now();
            let model = sources::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(Some(cmd.user_id)),
                name: Set(name),
                description: Set(normalize_optional_text(cmd.description.as_deref())),
                icon: Set(cmd.icon),
                color: Set(cmd.color),
                display_order: Set(cmd.display_order),
                source_identifier: Set(normalize_optional_text(cmd.source_identifier.as_deref())),
                contact: Set(cmd.contact),
                source_type: Set(cmd.source_type),
                default_category_id: Set(cmd.default_category_id),
                is_default: Set(false),
                is_global: Set(false),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(Source::from(model))
        })
    }

    pub async fn update_source(
        &self,
        id: Uuid,
        user_id: &str,
        patch: SourcePatch,
    ) -> ResultEngine<Source> {
        with_tx!(self, |db_tx| {
            let model = self.require_source_mutable(&db_tx, id, user_id).await?;

            let name = match patch.name.as_deref() {
                Some(new_name) => {
                    let normalized = normalize_required_name(new_name, "source")?;
                    if self
                        .source_name_taken(&db_tx, user_id, &normalized, Some(id))
                        .await?
                    {
                        return Err(EngineError::DuplicateName(normalized));
                    }
                    Some(normalized)
                }
                None => None,
            };
            if let Some(category_id) = patch.default_category_id {
                self.require_income_category_visible(&db_tx, category_id, user_id)
                    .await?;
            }

            let mut active: sources::ActiveModel = model.into();
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
            if let Some(identifier) = patch.source_identifier {
                active.source_identifier = Set(normalize_optional_text(Some(&identifier)));
            }
            if let Some(contact) = patch.contact {
                active.contact = Set(Some(contact));
            }
            if let Some(source_type) = patch.source_type {
                active.source_type = Set(Some(source_type));
            }
            if let Some(category_id) = patch.default_category_id {
                active.default_category_id = Set(Some(category_id));
            }
            active.updated_at = Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(Source::from(model))
        })
    }

    pub async fn delete_source(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_source_mutable(&db_tx, id, user_id).await?;
            self.require_source_unreferenced(&db_tx, id, user_id).await?;
            self.soft_delete_source(&db_tx, model).await
        })
    }

    /// Active sources visible to the user, with the count of the caller's
    /// income records per source. Ordered by name.
    pub async fn list_sources(&self, user_id: &str) -> ResultEngine<Vec<(Source, i64)>> {
        with_tx!(self, |db_tx| {
            let models = sources::Entity::find()
                .filter(Self::source_visible(user_id))
                .filter(sources::Column::IsActive.eq(true))
                .order_by_asc(sources::Column::Name)
                .all(&db_tx)
                .await?;
            let counts = self
                .reference_counts(&db_tx, "income", "source_id", user_id)
                .await?;
            Ok(models
                .into_iter()
                .map(|m| {
                    let count = counts.get(&m.id).copied().unwrap_or(0);
                    (Source::from(m), count)
                })
                .collect())
        })
    }

    /// Case-insensitive exact match on the source identifier among active
    /// visible rows, with the same scope precedence as recipient lookup.
    pub async fn lookup_source_by_identifier(
        &self,
        identifier: &str,
        user_id: &str,
    ) -> ResultEngine<Option<Source>> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mut models = sources::Entity::find()
            .filter(Self::source_visible(user_id))
            .filter(sources::Column::IsActive.eq(true))
            .filter(Expr::cust("LOWER(source_identifier)").eq(trimmed.to_lowercase()))
            .all(&self.database)
            .await?;

        models.sort_by(|a, b| {
            scope_rank(a.user_id.as_deref(), user_id, a.is_global)
                .cmp(&scope_rank(b.user_id.as_deref(), user_id, b.is_global))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(models.into_iter().next().map(Source::from))
    }
}
