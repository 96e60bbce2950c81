use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::errors::LoginError;
use crate::domain::user::models::Login;
use crate::inbound::http::cookies::token_cookie;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequestBody>,
) -> Result<(CookieJar, ApiSuccess<SessionResponseData>), ApiError> {
    // A refresh token the caller still holds from a previous session gets
    // discarded as part of the login.
    let presented = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());
    let command = body.try_into_command(presented)?;

    let outcome = state.session_service.login(command).await?;

    let jar = jar
        .add(token_cookie(
            ACCESS_COOKIE,
            &outcome.tokens.access_token,
            &state.cookie_domain,
        ))
        .add(token_cookie(
            REFRESH_COOKIE,
            &outcome.tokens.refresh_token,
            &state.cookie_domain,
        ));

    Ok((
        jar,
        ApiSuccess::new(
            StatusCode::OK,
            SessionResponseData {
                user: (&outcome.user).into(),
                token: TokenData {
                    access_token: outcome.tokens.access_token,
                    refresh_token: Some(outcome.tokens.refresh_token),
                },
            },
        ),
    ))
}

/// HTTP request body for a login attempt (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    login: String,
    password: String,
}

#[derive(Debug, Clone, Error)]
enum ParseLoginRequestError {
    #[error("Invalid login: {0}")]
    Login(#[from] LoginError),

    #[error("Missing required fields")]
    MissingPassword,
}

impl LoginRequestBody {
    fn try_into_command(
        self,
        presented_refresh_token: Option<String>,
    ) -> Result<LoginCommand, ParseLoginRequestError> {
        if self.password.is_empty() {
            return Err(ParseLoginRequestError::MissingPassword);
        }
        let login = Login::new(self.login)?;
        Ok(LoginCommand {
            login,
            password: self.password,
            presented_refresh_token,
        })
    }
}

impl From<ParseLoginRequestError> for ApiError {
    fn from(err: ParseLoginRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

/// Token artifacts delivered in the response body, mirroring the cookies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionResponseData {
    pub user: UserData,
    pub token: TokenData,
}
