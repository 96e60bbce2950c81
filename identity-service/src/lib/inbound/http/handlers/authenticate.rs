use axum::extract::State;
use axum::http::StatusCode;
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::router::AppState;

/// Verify the caller's access token and echo back its identity payload.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<ApiSuccess<AuthenticateResponseData>, ApiError> {
    let token = jar
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Access token not found".to_string()))?;

    let subject = state.session_service.authenticate(&token).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        AuthenticateResponseData {
            user: (&subject).into(),
        },
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticateResponseData {
    pub user: UserData,
}
