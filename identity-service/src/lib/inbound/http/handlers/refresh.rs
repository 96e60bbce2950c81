use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;

use super::login::SessionResponseData;
use super::login::TokenData;
use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshOutcome;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::cookies::clear_cookie;
use crate::inbound::http::cookies::token_cookie;
use crate::inbound::http::cookies::ACCESS_COOKIE;
use crate::inbound::http::cookies::REFRESH_COOKIE;
use crate::inbound::http::router::AppState;

pub async fn refresh(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(cookie) = jar.get(REFRESH_COOKIE) else {
        return ApiError::BadRequest("Missing refresh token".to_string()).into_response();
    };
    let refresh_token = cookie.value().to_string();

    match state.session_service.refresh(&refresh_token).await {
        // Expiry-triggered rotation: both artifacts are replaced.
        Ok(RefreshOutcome::Rotated { user, tokens }) => {
            let jar = jar
                .add(token_cookie(
                    ACCESS_COOKIE,
                    &tokens.access_token,
                    &state.cookie_domain,
                ))
                .add(token_cookie(
                    REFRESH_COOKIE,
                    &tokens.refresh_token,
                    &state.cookie_domain,
                ));
            (
                jar,
                ApiSuccess::new(
                    StatusCode::OK,
                    SessionResponseData {
                        user: (&user).into(),
                        token: TokenData {
                            access_token: tokens.access_token,
                            refresh_token: Some(tokens.refresh_token),
                        },
                    },
                ),
            )
                .into_response()
        }

        // Still-valid token: only the access artifact is renewed.
        Ok(RefreshOutcome::AccessOnly {
            subject,
            access_token,
        }) => {
            let jar = jar.add(token_cookie(
                ACCESS_COOKIE,
                &access_token,
                &state.cookie_domain,
            ));
            (
                jar,
                ApiSuccess::new(
                    StatusCode::OK,
                    SessionResponseData {
                        user: (&subject).into(),
                        token: TokenData {
                            access_token,
                            refresh_token: None,
                        },
                    },
                ),
            )
                .into_response()
        }

        // The session set was revoked; the caller's artifacts are cleared.
        Err(err @ SessionError::SecurityWipe(_)) => {
            let jar = jar
                .add(clear_cookie(ACCESS_COOKIE, &state.cookie_domain))
                .add(clear_cookie(REFRESH_COOKIE, &state.cookie_domain));
            (jar, ApiError::from(err)).into_response()
        }

        Err(err) => ApiError::from(err).into_response(),
    }
}
