//! Income source API endpoints.

use api_types::source::{SourceNew, SourceUpdate, SourceView, SourcesResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser};
use engine::{Source, commands::{NewSourceCmd, SourcePatch}};

fn view(source: Source, transaction_count: i64) -> SourceView {
    SourceView {
        id: source.id,
        name: source.name,
        description: source.description,
        icon: source.icon,
        color: source.color,
        display_order: source.display_order,
        source_identifier: source.source_identifier,
        contact: source.contact,
        source_type: source.source_type,
        default_category_id: source.default_category_id,
        is_default: source.is_default,
        is_global: source.is_global,
        transaction_count,
    }
}

pub async fn list(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<SourcesResponse>, ServerError> {
    let sources = state
        .engine
        .list_sources(&account.id)
        .await?
        .into_iter()
        .map(|(source, count)| view(source, count))
        .collect();
    Ok(Json(SourcesResponse { sources }))
}

pub async fn create(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<SourceNew>,
) -> Result<(StatusCode, Json<SourceView>), ServerError> {
    let mut cmd = NewSourceCmd::new(&account.id, payload.name);
    cmd.description = payload.description;
    cmd.icon = payload.icon;
    cmd.color = payload.color;
    cmd.display_order = payload.display_order.unwrap_or(0);
    cmd.source_identifier = payload.source_identifier;
    cmd.contact = payload.contact;
    cmd.source_type = payload.source_type;
    cmd.default_category_id = payload.default_category_id;

    let source = state.engine.create_source(cmd).await?;
    Ok((StatusCode::CREATED, Json(view(source, 0))))
}

pub async fn update(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SourceUpdate>,
) -> Result<Json<SourceView>, ServerError> {
    let patch = SourcePatch {
        name: payload.name,
        description: payload.description,
        icon: payload.icon,
        color: payload.color,
        display_order: payload.display_order,
        source_identifier: payload.source_identifier,
        contact: payload.contact,
        source_type: payload.source_type,
        default_category_id: payload.default_category_id,
    };

    let source = state.engine.update_source(id, &account.id, patch).await?;
    let count = state
        .engine
        .list_sources(&account.id)
        .await?
        .into_iter()
        .find(|(s, _)| s.id == id)
        .map(|(_, count)| count)
        .unwrap_or(0);
    Ok(Json(view(source, count)))
}

pub async fn delete(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_source(id, &account.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
