//! Monthly summary endpoint.

use api_types::stats::{MonthlySummary, MonthlySummaryQuery};
use axum::{Extension, Json, extract::{Query, State}};

use crate::{ServerError, server::ServerState, user::AuthUser};

pub async fn monthly_summary(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlySummaryQuery>,
) -> Result<Json<MonthlySummary>, ServerError> {
    let summary = state
        .engine
        .monthly_summary(&account.id, query.year, query.month)
        .await?;

    Ok(Json(MonthlySummary {
        year: query.year,
        month: query.month,
        total_income_minor: summary.total_income_minor,
        total_expense_minor: summary.total_expense_minor,
        net_minor: summary.net_minor(),
    }))
}
