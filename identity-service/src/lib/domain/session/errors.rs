use thiserror::Error;

/// Top-level error for the auth/session state machine.
///
/// `SecurityWipe` is not folded into `Forbidden`: a refresh token that
/// verifies (or expired verifiably) but is unknown to the store means the
/// token was reused after rotation, the store was tampered with, or the
/// record was deleted out of band. All sessions for the affected user are
/// revoked before this error is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Unknown login or wrong password. Deliberately one variant: the caller
    /// must not learn which part of the credential failed.
    #[error("User not found or invalid credentials")]
    InvalidCredentials,

    #[error("Access token is missing, expired, or invalid")]
    Unauthenticated,

    #[error("Refresh token is invalid")]
    Forbidden,

    #[error("Refresh token verifies but is unknown to the store; all refresh tokens for user {0} have been revoked")]
    SecurityWipe(String),

    #[error("Refresh token was already rotated by a concurrent request")]
    RotationConflict,

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Token error: {0}")]
    Token(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}
