//! Token delivery cookies.
//!
//! Both artifacts travel as domain-scoped cookies that scripts cannot read,
//! are only sent over secure transport, and allow cross-site sends
//! (`HttpOnly`, `Secure`, `SameSite=None`).

use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::SameSite;
use time::Duration;

/// Cookie name for the access token.
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refresh_token";

/// Build a token-carrying cookie.
pub fn token_cookie(name: &'static str, token: &str, domain: &str) -> Cookie<'static> {
    Cookie::build((name, token.to_string()))
        .domain(domain.to_string())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .build()
}

/// Build an expired cookie that clears the named token.
pub fn clear_cookie(name: &'static str, domain: &str) -> Cookie<'static> {
    Cookie::build((name, String::new()))
        .domain(domain.to_string())
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(Duration::ZERO)
        .build()
}
