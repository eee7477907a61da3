//! Recipient API endpoints.

use api_types::recipient::{RecipientNew, RecipientUpdate, RecipientView, RecipientsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser};
use engine::{Recipient, commands::{NewRecipientCmd, RecipientPatch}};

fn view(recipient: Recipient, transaction_count: i64) -> RecipientView {
    RecipientView {
        id: recipient.id,
        name: recipient.name,
        description: recipient.description,
        icon: recipient.icon,
        color: recipient.color,
        display_order: recipient.display_order,
        payment_identifier: recipient.payment_identifier,
        contact: recipient.contact,
        is_favorite: recipient.is_favorite,
        default_category_id: recipient.default_category_id,
        is_default: recipient.is_default,
        is_global: recipient.is_global,
        transaction_count,
    }
}

pub async fn list(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<RecipientsResponse>, ServerError> {
    let recipients = state
        .engine
        .list_recipients(&account.id)
        .await?
        .into_iter()
        .map(|(recipient, count)| view(recipient, count))
        .collect();
    Ok(Json(RecipientsResponse { recipients }))
}

pub async fn create(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<RecipientNew>,
) -> Result<(StatusCode, Json<RecipientView>), ServerError> {
    let mut cmd = NewRecipientCmd::new(&account.id, payload.name);
    cmd.description = payload.description;
    cmd.icon = payload.icon;
    cmd.color = payload.color;
    cmd.display_order = payload.display_order.unwrap_or(0);
    cmd.payment_identifier = payload.payment_identifier;
    cmd.contact = payload.contact;
    cmd.is_favorite = payload.is_favorite.unwrap_or(false);
    cmd.default_category_id = payload.default_category_id;

    let recipient = state.engine.create_recipient(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(recipient, 0))))
}

pub async fn update(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipientUpdate>,
) -> Result<Json<RecipientView>, ServerError> {
    let patch = RecipientPatch {
        name: payload.name,
        description: payload.description,
        icon: payload.icon,
        color: payload.color,
        display_order: payload.display_order,
        payment_identifier: payload.payment_identifier,
        contact: payload.contact,
        is_favorite: payload.is_favorite,
        default_category_id: payload.default_category_id,
    };

    let recipient = state.engine.update_recipient(id, &account.id, patch).await?;
    let count = state
        .engine
        .list_recipients(&account.id)
        .await?
        .into_iter()
        .find(|(r, _)| r.id == id)
        .map(|(_, count)| count)
        .unwrap_or(0);
    Ok(Json(view(recipient, count)))
}

pub async fn delete(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_recipient(id, &account.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
