use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::clear_cookie;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    // The only rejected request is one carrying no refresh token at all; the
    // store is not consulted for it.
    let Some(cookie) = jar.get(REFRESH_COOKIE) else {
        return ApiError::BadRequest("Missing refresh token".to_string()).into_response();
    };
    let refresh_token = cookie.value().to_string();

    let result = state.session_service.logout(&refresh_token).await;

    // Both artifacts are cleared regardless of the store outcome.
    let jar = jar
        .add(clear_cookie(ACCESS_COOKIE, &state.cookie_domain))
        .add(clear_cookie(REFRESH_COOKIE, &state.cookie_domain));

    match result {
        Ok(()) => (
            jar,
            ApiSuccess::new(
                StatusCode::OK,
                LogoutResponseData {
                    message: "Logged out".to_string(),
                },
            ),
        )
            .into_response(),
        Err(err) => (jar, ApiError::from(err)).into_response(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}
