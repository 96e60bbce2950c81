use auth::TokenSubject;

use crate::domain::user::models::Login;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Stored refresh-token record.
///
/// The signed token string is its own key; the record only ties it to the
/// owning user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: UserId,
}

/// Freshly minted access/refresh pair handed to the transport layer.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Command to log a user in.
///
/// `presented_refresh_token` is the refresh token the caller already holds,
/// if any (re-login while a session is still open); it is discarded from the
/// store best-effort before the new pair is issued.
#[derive(Debug)]
pub struct LoginCommand {
    pub login: Login,
    pub password: String,
    pub presented_refresh_token: Option<String>,
}

/// Successful login: the authenticated user plus a fresh token pair.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

/// Outcome of a successful refresh.
///
/// Rotation only happens on the expired-token path; a still-valid refresh
/// token yields a new access token without touching the stored record.
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// The presented token had expired; it was rotated out for a new pair.
    Rotated { user: User, tokens: TokenPair },
    /// The presented token is still valid; only a new access token is minted.
    AccessOnly {
        subject: TokenSubject,
        access_token: String,
    },
}
