use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{run, run_with_listener, spawn_with_listener};

mod categories;
mod payment_methods;
mod recipients;
mod server;
mod sms;
mod sources;
mod statistics;
mod transactions;
mod user;

pub mod types {
    pub mod category {
        pub use api_types::category::{CategoriesResponse, CategoryNew, CategoryUpdate, CategoryView};
    }

    pub mod recipient {
        pub use api_types::recipient::{RecipientNew, RecipientUpdate, RecipientView, RecipientsResponse};
    }

    pub mod source {
        pub use api_types::source::{SourceNew, SourceUpdate, SourceView, SourcesResponse};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            ExpenseNew, ExpenseUpdate, IncomeNew, IncomeUpdate, TransactionView,
        };
    }

    pub mod ledger {
        pub use api_types::ledger::{LedgerEntryView, LedgerKind, LedgerQuery, LedgerResponse};
    }

    pub mod sms {
        pub use api_types::sms::{SmsRecord, SmsResponse};
    }

    pub mod stats {
        pub use api_types::stats::{MonthlySummary, MonthlySummaryQuery};
    }

    pub mod payment {
        pub use api_types::payment::PaymentMethodsResponse;
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) => StatusCode::BAD_REQUEST,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::DuplicateName(_) | EngineError::Conflict(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_validation_maps_to_400() {
        let res = ServerError::from(EngineError::Validation("bad".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::NotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res = ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_duplicate_maps_to_409() {
        let res = ServerError::from(EngineError::DuplicateName("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::Conflict("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
