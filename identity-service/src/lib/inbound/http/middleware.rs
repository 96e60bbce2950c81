use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::router::AppState;

/// Extension type to store authenticated user info in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub login: String,
}

/// Middleware that verifies the caller's access token and adds its identity
/// payload to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&req)?;

    let subject = state
        .session_service
        .authenticate(&token)
        .await
        .map_err(|e| {
            tracing::warn!("Access token validation failed: {}", e);
            unauthorized("Invalid or expired token")
        })?;

    let user_id = UserId::from_string(&subject.id).map_err(|e| {
        tracing::error!("Failed to parse user ID from token: {}", e);
        unauthorized("Invalid token format")
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id,
        login: subject.login,
    });

    Ok(next.run(req).await)
}

fn extract_token(req: &Request) -> Result<String, Response> {
    // Bearer header takes precedence; browser callers fall back to the
    // access-token cookie set at login.
    if let Some(header) = req.headers().get(http::header::AUTHORIZATION) {
        let auth_str = header
            .to_str()
            .map_err(|_| unauthorized("Invalid Authorization header"))?;

        return match auth_str.strip_prefix("Bearer ") {
            Some(token) => Ok(token.to_string()),
            None => Err(unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>",
            )),
        };
    }

    let jar = CookieJar::from_headers(req.headers());
    jar.get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| unauthorized("Access token not found"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
