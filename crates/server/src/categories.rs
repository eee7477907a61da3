//! Category API endpoints.
//!
//! The `{kind}` path segment selects the income or expense table.

use api_types::category::{CategoriesResponse, CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user::AuthUser};
use engine::{Category, CategoryKind, commands::{CategoryPatch, NewCategoryCmd}};

fn parse_kind(kind: &str) -> Result<CategoryKind, ServerError> {
    CategoryKind::try_from(kind).map_err(ServerError::Engine)
}

fn api_kind(kind: CategoryKind) -> api_types::TransactionKind {
    match kind {
        CategoryKind::Income => api_types::TransactionKind::Income,
        CategoryKind::Expense => api_types::TransactionKind::Expense,
    }
}

fn view(category: Category, transaction_count: i64) -> CategoryView {
    CategoryView {
        id: category.id,
        kind: api_kind(category.kind),
        name: category.name,
        description: category.description,
        icon: category.icon,
        color: category.color,
        display_order: category.display_order,
        monthly_budget_limit_minor: category.monthly_budget_limit_minor,
        is_default: category.is_default,
        is_global: category.is_global,
        transaction_count,
    }
}

pub async fn list(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(kind): Path<String>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let kind = parse_kind(&kind)?;
    let categories = state
        .engine
        .list_categories(kind, &account.id)
        .await?
        .into_iter()
        .map(|(category, count)| view(category, count))
        .collect();
    Ok(Json(CategoriesResponse { categories }))
}

pub async fn create(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(kind): Path<String>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let kind = parse_kind(&kind)?;
    let mut cmd = NewCategoryCmd::new(&account.id, payload.name);
    cmd.description = payload.description;
    cmd.icon = payload.icon;
    cmd.color = payload.color;
    cmd.display_order = payload.display_order.unwrap_or(0);
    cmd.monthly_budget_limit_minor = payload.monthly_budget_limit_minor;

    let category = state.engine.create_category(kind, cmd).await?;
    Ok((StatusCode::CREATED, Json(view(category, 0))))
}

pub async fn update(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let kind = parse_kind(&kind)?;
    let patch = CategoryPatch {
        name: payload.name,
        description: payload.description,
        icon: payload.icon,
        color: payload.color,
        display_order: payload.display_order,
        monthly_budget_limit_minor: payload.monthly_budget_limit_minor,
    };

    let category = state.engine.update_category(kind, id, &account.id, patch).await?;
    let counts = state
        .engine
        .list_categories(kind, &account.id)
        .await?
        .into_iter()
        .find(|(c, _)| c.id == id)
        .map(|(_, count)| count)
        .unwrap_or(0);
    Ok(Json(view(category, counts)))
}

pub async fn delete(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ServerError> {
    let kind = parse_kind(&kind)?;
    state.engine.delete_category(kind, id, &account.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
