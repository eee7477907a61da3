//! Recipient CRUD and identifier lookup.

use chrono::Utc;
use sea_orm::{ActiveValue::Set, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr};
use uuid::Uuid;

use crate::{
    EngineError, Recipient, ResultEngine, commands::{NewRecipientCmd, RecipientPatch}, recipients,
};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    pub async fn create_recipient(&self, cmd: NewRecipientCmd) -> ResultEngine<Recipient> {
        with_tx!(self, |db_tx| {
            let name = normalize_required_name(&cmd.name, "recipient")?;
            if self
                .recipient_name_taken(&db_tx, &cmd.user_id, &name, None)
                .await?
            {
                return Err(EngineError::DuplicateName(name));
            }
            if let Some(category_id) = cmd.default_category_id {
                self.require_expense_category_visible(&db_tx, category_id, &cmd.user_id)
                    .await?;
            }

            let now = Utc::now();
            let model = recipients::ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(Some(cmd.user_id)),
                name: Set(name),
                description: Set(normalize_optional_text(cmd.description.as_deref())),
                icon: Set(cmd.icon),
                color: Set(cmd.color),
                display_order: Set(cmd.display_order),
                payment_identifier: Set(normalize_optional_text(cmd.payment_identifier.as_deref())),
                contact: Set(cmd.contact),
                is_favorite: Set(cmd.is_favorite),
                default_category_id: Set(cmd.default_category_id),
                is_default: Set(false),
                is_global: Set(false),
                is_active: Set(true),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&db_tx)
            .await?;
            Ok(Recipient::from(model))
        })
    }

    pub async fn update_recipient(
        &self,
        id: Uuid,
        user_id: &str,
        patch: RecipientPatch,
    ) -> ResultEngine<Recipient> {
        with_tx!(self, |db_tx| {
            let model = self.require_recipient_mutable(&db_tx, id, user_id).await?;

            let name = match patch.name.as_deref() {
                Some(new_name) => {
                    let normalized = normalize_required_name(new_name, "recipient")?;
                    if self
                        .recipient_name_taken(&db_tx, user_id, &normalized, Some(id))
                        .await?
                    {
                        return Err(EngineError::DuplicateName(normalized));
                    }
                    Some(normalized)
                }
                None => None,
            };
            if let Some(category_id) = patch.default_category_id {
                self.require_expense_category_visible(&db_tx, category_id, user_id)
                    .await?;
            }

            let mut active: recipients::ActiveModel = model.into();
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
            if let Some(identifier) = patch.payment_identifier {
                active.payment_identifier = Set(normalize_optional_text(Some(&identifier)));
            }
            if let Some(contact) = patch.contact {
                active.contact = Set(Some(contact));
            }
            if let Some(is_favorite) = patch.is_favorite {
                active.is_favorite = Set(is_favorite);
            }
            if let Some(category_id) = patch.default_category_id {
                active.default_category_id = Set(Some(category_id));
            }
            active.updated_at = Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Ok(Recipient::from(model))
        })
    }

    pub async fn delete_recipient(&self, id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_recipient_mutable(&db_tx, id, user_id).await?;
            self.require_recipient_unreferenced(&db_tx, id, user_id)
                .await?;
            self.soft_delete_recipient(&db_tx, model).await
        })
    }

    /// Active recipients visible to the user, with the count of the caller's
    /// expenses per recipient. Ordered by name.
    pub async fn list_recipients(&self, user_id: &str) -> ResultEngine<Vec<(Recipient, i64)>> {
        with_tx!(self, |db_tx| {
            let models = recipients::Entity::find()
                .filter(Self::recipient_visible(user_id))
                .filter(recipients::Column::IsActive.eq(true))
                .order_by_asc(recipients::Column::Name)
                .all(&db_tx)
                .await?;
            let counts = self
                .reference_counts(&db_tx, "expenses", "recipient_id", user_id)
                .await?;
            Ok(models
                .into_iter()
                .map(|m| {
                    let count = counts.get(&m.id).copied().unwrap_or(0);
                    (Recipient::from(m), count)
                })
                .collect())
        })
    }

    /// Case-insensitive exact match on the payment identifier among active
    /// visible rows.
    ///
    /// When several scopes match, the caller's own row wins over a global
    /// one, and a global one over a default; remaining ties break by name.
    /// Never an error: a miss is `None`.
    pub async fn lookup_recipient_by_identifier(
        &self,
        identifier: &str,
        user_id: &str,
    ) -> ResultEngine<Option<Recipient>> {
        let trimmed = identifier.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let mut models = recipients::Entity::find()
            .filter(Self::recipient_visible(user_id))
            .filter(recipients::Column::IsActive.eq(true))
            .filter(Expr::cust("LOWER(payment_identifier)").eq(trimmed.to_lowercase()))
            .all(&self.database)
            .await?;

        models.sort_by(|a, b| {
            scope_rank(a.user_id.as_deref(), user_id, a.is_global)
                .cmp(&scope_rank(b.user_id.as_deref(), user_id, b.is_global))
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(models.into_iter().next().map(Recipient::from))
    }
}

/// Owned rows sort before globals, globals before defaults.
pub(super) fn scope_rank(owner: Option<&str>, user_id: &str, is_global: bool) -> u8 {
    if owner == Some(user_id) {
        0
    } else if is_global {
        1
    } else {
        2
    }
}
