//! Payment methods endpoint.

use api_types::payment::PaymentMethodsResponse;
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, transactions::map_method_out, user::AuthUser};

/// Methods the user has actually recorded, not the full enum.
pub async fn list(
    Extension(account): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<PaymentMethodsResponse>, ServerError> {
    let payment_methods = state
        .engine
        .used_payment_methods(&account.id)
        .await?
        .into_iter()
        .map(map_method_out)
        .collect();
    Ok(Json(PaymentMethodsResponse { payment_methods }))
}
