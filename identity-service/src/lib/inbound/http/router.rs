use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::authenticate::authenticate;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::refresh::refresh;
use super::middleware::authenticate as auth_middleware;
use crate::domain::session::service::SessionService;
use crate::domain::user::service::UserService;
use crate::outbound::repositories::PostgresRefreshTokenRepository;
use crate::outbound::repositories::PostgresUserRepository;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService<PostgresUserRepository, PostgresRefreshTokenRepository>>,
    pub session_service:
        Arc<SessionService<PostgresUserRepository, PostgresRefreshTokenRepository>>,
    pub cookie_domain: String,
}

pub fn create_router(
    user_service: Arc<UserService<PostgresUserRepository, PostgresRefreshTokenRepository>>,
    session_service: Arc<SessionService<PostgresUserRepository, PostgresRefreshTokenRepository>>,
    cookie_domain: String,
) -> Router {
    let state = AppState {
        user_service,
        session_service,
        cookie_domain,
    };

    let public_routes = Router::new()
        .route("/", get(health))
        .route("/user/login", post(login))
        .route("/user/logout", get(logout))
        .route("/user/create", post(create_user))
        .route("/authenticate", get(authenticate))
        .route("/refresh", get(refresh));

    let protected_routes = Router::new()
        .route("/users", get(list_users))
        .route("/user/delete/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "message": format!("Server is running OK: {}", Utc::now().to_rfc3339()),
    }))
}
