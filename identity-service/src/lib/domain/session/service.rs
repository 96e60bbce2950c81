use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenError;
use auth::TokenSigner;
use auth::TokenSubject;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginOutcome;
use crate::domain::session::models::RefreshOutcome;
use crate::domain::session::models::TokenPair;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// The auth service: orchestrates the user directory, the refresh-token
/// store, and the two token signers to implement login, verification,
/// refresh-with-rotation, and logout.
///
/// Stateless between calls; the injected stores are the only suspension
/// points and the signers are read-only after construction.
pub struct SessionService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: Arc<RT>,
    password_hasher: PasswordHasher,
    access_signer: TokenSigner,
    refresh_signer: TokenSigner,
}

fn subject_for(user: &User) -> TokenSubject {
    TokenSubject {
        id: user.id.to_string(),
        login: user.login.as_str().to_string(),
        metadata: user.metadata.clone(),
    }
}

impl<UR, RT> SessionService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `users` - User directory persistence implementation
    /// * `refresh_tokens` - Refresh-token store implementation
    /// * `access_signer` - Signer for the access token domain
    /// * `refresh_signer` - Signer for the refresh token domain
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<RT>,
        access_signer: TokenSigner,
        refresh_signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            password_hasher: PasswordHasher::new(),
            access_signer,
            refresh_signer,
        }
    }

    fn mint_pair(&self, subject: &TokenSubject) -> Result<TokenPair, SessionError> {
        let access_token = self
            .access_signer
            .issue(subject)
            .map_err(|e| SessionError::Token(e.to_string()))?;
        let refresh_token = self
            .refresh_signer
            .issue(subject)
            .map_err(|e| SessionError::Token(e.to_string()))?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Best-effort removal of a refresh token the caller still holds from a
    /// previous session. Failure is logged and never fails the login.
    async fn discard_presented_token(&self, presented: &str, user_id: &UserId) {
        match self.refresh_tokens.find_by_token(presented).await {
            Ok(Some(record)) if record.user_id == *user_id => {
                if let Err(e) = self.refresh_tokens.delete_by_token(presented).await {
                    tracing::warn!(
                        user_id = %user_id,
                        error = %e,
                        "Failed to discard previous refresh token"
                    );
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Failed to look up presented refresh token");
            }
        }
    }

    /// Revoke every refresh token for `user_id` and produce the security
    /// event to report. A wipe that itself fails surfaces as the underlying
    /// persistence error instead.
    async fn wipe_sessions(&self, user_id: UserId) -> SessionError {
        tracing::warn!(
            user_id = %user_id,
            "Refresh token verifies but has no stored record; revoking all sessions for user"
        );
        match self.refresh_tokens.delete_all_for_user(&user_id).await {
            Ok(()) => SessionError::SecurityWipe(user_id.to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl<UR, RT> SessionServicePort for SessionService<UR, RT>
where
    UR: UserRepository,
    RT: RefreshTokenRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, SessionError> {
        // Lookup by login, then verify the digest. Unknown login and wrong
        // password take the same exit.
        let user = self
            .users
            .find_by_login(&command.login)
            .await
            .map_err(|e| SessionError::Persistence(e.to_string()))?
            .ok_or(SessionError::InvalidCredentials)?;

        let credentials_match = self
            .password_hasher
            .verify(&command.password, &user.password_hash)?;
        if !credentials_match {
            return Err(SessionError::InvalidCredentials);
        }

        if let Some(presented) = command.presented_refresh_token.as_deref() {
            self.discard_presented_token(presented, &user.id).await;
        }

        let subject = subject_for(&user);
        let tokens = self.mint_pair(&subject)?;

        // Fatal: the caller must never receive a refresh token that was not
        // durably recorded, since refresh depends on store presence.
        self.refresh_tokens
            .insert(&tokens.refresh_token, &user.id)
            .await?;

        Ok(LoginOutcome { user, tokens })
    }

    async fn authenticate(&self, access_token: &str) -> Result<TokenSubject, SessionError> {
        // Access tokens are never recovered or rotated; expired and invalid
        // collapse into the same outcome.
        match self.access_signer.verify(access_token) {
            Ok(claims) => Ok(claims.subject()),
            Err(_) => Err(SessionError::Unauthenticated),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, SessionError> {
        let verified = self.refresh_signer.verify(refresh_token);
        let stored = self.refresh_tokens.find_by_token(refresh_token).await?;

        match (verified, stored) {
            // Forged, malformed, or wrong-domain token. No store mutation.
            (Err(TokenError::Invalid(reason)), _)
            | (Err(TokenError::EncodingFailed(reason)), _) => {
                tracing::debug!(reason = %reason, "Rejected invalid refresh token");
                Err(SessionError::Forbidden)
            }

            // Expired and unknown to the store: the unverified payload is
            // trusted only far enough to know whose sessions to revoke.
            (Err(TokenError::Expired), None) => {
                let claims = self
                    .refresh_signer
                    .decode_unverified(refresh_token)
                    .map_err(|_| SessionError::Forbidden)?;
                let user_id =
                    UserId::from_string(&claims.sub).map_err(|_| SessionError::Forbidden)?;
                Err(self.wipe_sessions(user_id).await)
            }

            // Expired but present: the normal expiry-triggered rotation.
            (Err(TokenError::Expired), Some(record)) => {
                let user = self
                    .users
                    .find_by_id(&record.user_id)
                    .await
                    .map_err(|e| SessionError::Persistence(e.to_string()))?;
                let Some(user) = user else {
                    // Orphaned record: the owner no longer exists.
                    return Err(self.wipe_sessions(record.user_id).await);
                };

                let subject = subject_for(&user);
                let tokens = self.mint_pair(&subject)?;

                let rotated = self
                    .refresh_tokens
                    .rotate(refresh_token, &tokens.refresh_token, &user.id)
                    .await?;
                if !rotated {
                    return Err(SessionError::RotationConflict);
                }

                Ok(RefreshOutcome::Rotated { user, tokens })
            }

            // Verifiably valid yet unknown: reuse after rotation, store
            // tampering, or out-of-band deletion.
            (Ok(claims), None) => {
                let user_id =
                    UserId::from_string(&claims.sub).map_err(|_| SessionError::Forbidden)?;
                Err(self.wipe_sessions(user_id).await)
            }

            // Valid and present: access-only renewal. The refresh token is
            // not rotated on this path.
            (Ok(claims), Some(_)) => {
                let subject = claims.subject();
                let access_token = self
                    .access_signer
                    .issue(&subject)
                    .map_err(|e| SessionError::Token(e.to_string()))?;
                Ok(RefreshOutcome::AccessOnly {
                    subject,
                    access_token,
                })
            }
        }
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), SessionError> {
        // Idempotent: a token with no stored record is not an error.
        self.refresh_tokens.delete_by_token(refresh_token).await
    }
}
