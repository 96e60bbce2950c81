use async_trait::async_trait;
use auth::TokenSubject;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::RefreshOutcome;
use crate::domain::session::models::RefreshTokenRecord;
use crate::domain::user::models::UserId;

/// Port for the auth/session service.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Validate credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown login or wrong password (identical outcome)
    /// * `Persistence` - The new refresh-token record could not be stored;
    ///   no tokens are returned
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, SessionError>;

    /// Verify an access token and return its identity payload.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is expired or invalid (access tokens are
    ///   never recovered; the caller must refresh)
    async fn authenticate(&self, access_token: &str) -> Result<TokenSubject, SessionError>;

    /// Run the refresh state machine for a presented refresh token.
    ///
    /// # Errors
    /// * `Forbidden` - Token signature does not verify
    /// * `SecurityWipe` - Token verifies (or expired verifiably) but is absent
    ///   from the store; every record for the affected user was deleted
    /// * `RotationConflict` - A concurrent refresh rotated the token first
    /// * `Persistence` - Store operation failed
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, SessionError>;

    /// Close the session owning `refresh_token`.
    ///
    /// Idempotent: a token with no stored record is not an error.
    ///
    /// # Errors
    /// * `Persistence` - Store operation failed
    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError>;
}

/// Persistence operations for refresh-token records.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a new record linking `token` to its owner.
    ///
    /// # Errors
    /// * `Persistence` - Database operation failed (including duplicate token)
    async fn insert(&self, token: &str, user_id: &UserId) -> Result<(), SessionError>;

    /// Look up a record by exact token string.
    ///
    /// # Errors
    /// * `Persistence` - Database operation failed
    async fn find_by_token(&self, token: &str)
        -> Result<Option<RefreshTokenRecord>, SessionError>;

    /// Delete the record for `token`. Idempotent.
    ///
    /// # Errors
    /// * `Persistence` - Database operation failed
    async fn delete_by_token(&self, token: &str) -> Result<(), SessionError>;

    /// Delete every record owned by `user_id`. Idempotent.
    ///
    /// # Errors
    /// * `Persistence` - Database operation failed
    async fn delete_all_for_user(&self, user_id: &UserId) -> Result<(), SessionError>;

    /// Atomically replace `old_token` with `new_token` for `user_id`.
    ///
    /// The delete and insert run in one transaction keyed on the old token
    /// string; rotation is at-most-once per token.
    ///
    /// # Returns
    /// `true` if the old record was deleted and the new one inserted;
    /// `false` if the old record was already gone (a concurrent rotation won)
    ///
    /// # Errors
    /// * `Persistence` - Database operation failed
    async fn rotate(
        &self,
        old_token: &str,
        new_token: &str,
        user_id: &UserId,
    ) -> Result<bool, SessionError>;
}
