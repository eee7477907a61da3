use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{categories, payment_methods, recipients, sms, sources, statistics, transactions, user};
use engine::Engine;

static SESSION_HEADER: axum::http::HeaderName =
    axum::http::HeaderName::from_static("x-session-token");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

/// `TypedHeader` for the session token header.
///
/// Every request must carry an "x-session-token" entry in the header.
#[derive(Debug)]
struct SessionToken(String);

impl Header for SessionToken {
    fn name() -> &'static axum::http::HeaderName {
        &SESSION_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        if value.is_empty() {
            return Err(AxumError::invalid());
        }

        Ok(SessionToken(value.to_string()))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        match axum::http::HeaderValue::from_str(&self.0) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-session-token header"),
        }
    }
}

async fn auth(
    token: Option<TypedHeader<SessionToken>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // A request without the header is an auth failure, not a bad request.
    let TypedHeader(SessionToken(token)) = token.ok_or(StatusCode::UNAUTHORIZED)?;

    let session = user::sessions::Entity::find_by_id(&token)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if !session.is_active || session.expires_at <= Utc::now() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let account = user::users::Entity::find_by_id(&session.user_id)
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    request.extensions_mut().insert(account);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/transactions", get(transactions::list))
        .route("/expenses", post(transactions::expense_new))
        .route(
            "/expenses/{id}",
            axum::routing::patch(transactions::expense_update).delete(transactions::expense_delete),
        )
        .route("/income", post(transactions::income_new))
        .route(
            "/income/{id}",
            axum::routing::patch(transactions::income_update).delete(transactions::income_delete),
        )
        .route(
            "/categories/{kind}",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{kind}/{id}",
            axum::routing::patch(categories::update).delete(categories::delete),
        )
        .route("/recipients", get(recipients::list).post(recipients::create))
        .route(
            "/recipients/{id}",
            axum::routing::patch(recipients::update).delete(recipients::delete),
        )
        .route("/sources", get(sources::list).post(sources::create))
        .route(
            "/sources/{id}",
            axum::routing::patch(sources::update).delete(sources::delete),
        )
        .route("/payment-methods", get(payment_methods::list))
        .route("/sms/record", post(sms::record))
        .route("/summary/monthly", get(statistics::monthly_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, header};
    use chrono::Duration;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database};
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    async fn test_router() -> Router {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("connect in-memory db");
        migration::Migrator::up(&db, None).await.expect("migrate");

        let now = Utc::now();
        user::users::ActiveModel {
            id: Set("u1".to_string()),
            username: Set("asha".to_string()),
            password: Set("secret".to_string()),
            created_at: Set(now),
        }
        .insert(&db)
        .await
        .expect("seed user");
        user::sessions::ActiveModel {
            token: Set(TOKEN.to_string()),
            user_id: Set("u1".to_string()),
            created_at: Set(now),
            expires_at: Set(now + Duration::hours(1)),
            is_active: Set(true),
        }
        .insert(&db)
        .await
        .expect("seed session");

        let engine = Engine::builder()
            .database(db.clone())
            .build()
            .await
            .expect("build engine");

        router(ServerState {
            engine: Arc::new(engine),
            db,
        })
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let app = test_router().await;
        let res = app
            .oneshot(
                HttpRequest::get("/transactions")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_handlers() {
        let app = test_router().await;
        let res = app
            .oneshot(
                HttpRequest::get("/transactions")
                    .header(&SESSION_HEADER, TOKEN)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn expense_roundtrip_over_http() {
        let app = test_router().await;

        let res = app
            .clone()
            .oneshot(
                HttpRequest::post("/expenses")
                    .header(&SESSION_HEADER, TOKEN)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "date": "2026-02-10",
                            "time": "12:30:00",
                            "amount_minor": 15000,
                            "payment_method": "upi",
                            "notes": "lunch"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::CREATED);

        let res = app
            .oneshot(
                HttpRequest::get("/transactions")
                    .header(&SESSION_HEADER, TOKEN)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.into_body().collect().await.expect("body").to_bytes();
        let parsed: serde_json::Value = serde_json::from_slice(&body).expect("json");
        let entries = parsed["transactions"].as_array().expect("array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["amount_minor"], 15000);
        assert_eq!(entries[0]["kind"], "expense");
    }

    #[tokio::test]
    async fn unknown_category_kind_is_rejected() {
        let app = test_router().await;
        let res = app
            .oneshot(
                HttpRequest::get("/categories/misc")
                    .header(&SESSION_HEADER, TOKEN)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
